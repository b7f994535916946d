//! Command line arguments and their resolution into runtime settings.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use presenter_core::app_state::DisplayOptions;
use presenter_core::config::ScreenConfig;
use presenter_core::error::{PresenterError, Result};
use presenter_core::items::{
    DEFAULT_ITEM_KEY, DEFAULT_LINE_SPACING, HorizontalAlignment, ItemDefaults, ItemsState,
    MAX_LINE_SPACING, VerticalAlignment,
};
use presenter_core::render::{ButtonHints, HintLabel, RenderOptions};
use presenter_core::roles::{ButtonRoles, Role};

/// Font used when `--font-default` is not given.
pub const DEFAULT_FONT_PATH: &str = "/mnt/SDCARD/.system/res/BPreplayBold-unhinted.otf";

/// Show a full-screen message or a list of messages and report the button
/// the user pressed through the exit status.
#[derive(Parser, Debug)]
#[command(name = "presenter")]
#[command(version)]
pub struct Args {
    /// Message to display. Takes precedence over --file
    #[arg(long)]
    pub message: Option<String>,

    /// JSON item document to display ("-" reads standard input)
    #[arg(long)]
    pub file: Option<String>,

    /// Key of the item array inside the JSON document
    #[arg(long, default_value = DEFAULT_ITEM_KEY)]
    pub item_key: String,

    /// Button bound to the action role (A, B, X or Y)
    #[arg(long, default_value = "")]
    pub action_button: String,
    #[arg(long, default_value = "ACTION")]
    pub action_text: String,
    #[arg(long)]
    pub action_show: bool,

    /// Button bound to the confirm role (A, B, X or Y)
    #[arg(long, default_value = "")]
    pub confirm_button: String,
    #[arg(long, default_value = "SELECT")]
    pub confirm_text: String,
    #[arg(long)]
    pub confirm_show: bool,

    /// Button bound to the cancel role (A, B, X or Y)
    #[arg(long, default_value = "")]
    pub cancel_button: String,
    #[arg(long, default_value = "BACK")]
    pub cancel_text: String,
    #[arg(long)]
    pub cancel_show: bool,

    /// Button bound to the inaction role (A, B, X or Y)
    #[arg(long, default_value = "")]
    pub inaction_button: String,
    #[arg(long, default_value = "OTHER")]
    pub inaction_text: String,
    #[arg(long)]
    pub inaction_show: bool,

    /// Default background color (#RRGGBB)
    #[arg(long)]
    pub background_color: Option<String>,

    /// Default background image (PNG, JPEG or BMP)
    #[arg(long)]
    pub background_image: Option<PathBuf>,

    /// TrueType/OpenType font file
    #[arg(long, alias = "font", default_value = DEFAULT_FONT_PATH)]
    pub font_default: PathBuf,

    /// Body font size in logical pixels
    #[arg(long, alias = "font-size", default_value_t = 16)]
    pub font_size_default: u16,

    /// Vertical alignment: top, middle or bottom
    #[arg(long, default_value = "middle")]
    pub message_alignment: String,

    /// Horizontal alignment: left, center or right
    #[arg(long, default_value = "center")]
    pub horizontal_alignment: String,

    /// Spacing between wrapped lines in logical pixels
    #[arg(long, default_value_t = DEFAULT_LINE_SPACING)]
    pub line_spacing: u32,

    /// Draw a pill behind every line of text
    #[arg(long)]
    pub show_pill: bool,

    /// Seconds before exiting with status 124 (0 waits forever, negative
    /// ignores input)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub timeout: i64,

    /// Show the remaining seconds of --timeout
    #[arg(long)]
    pub show_time_left: bool,

    /// Exit with status 0 when moving past the last item
    #[arg(long)]
    pub quit_after_last_item: bool,

    /// Do not wrap around at the first and last item
    #[arg(long)]
    pub no_wrap: bool,

    /// Keep the previous frame when an item has no background
    #[arg(long)]
    pub preserve_framebuffer: bool,

    /// Animate a spinner after the text
    #[arg(long)]
    pub show_spinner: bool,

    /// Framebuffer width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Framebuffer height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Logical-to-pixel scale factor
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: u32,

    /// Window title on desktop builds
    #[arg(long, default_value = "presenter")]
    pub window_title: String,
}

/// Where the items come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Message(String),
    /// A file path, or `-` for standard input.
    File(String),
}

/// Everything the main loop needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Source,
    pub item_key: String,
    pub defaults: ItemDefaults,
    pub roles: ButtonRoles,
    pub hints: ButtonHints,
    pub display: DisplayOptions,
    pub preserve_framebuffer: bool,
    pub show_spinner: bool,
    pub screen: ScreenConfig,
    pub font_path: PathBuf,
    /// Body font size in logical pixels.
    pub font_size: u16,
}

/// An empty alignment string selects the default.
fn parse_alignment<T>(value: &str) -> Result<T>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    if value.is_empty() {
        return Ok(T::default());
    }
    value
        .parse()
        .map_err(|e: T::Err| PresenterError::Config(e.to_string()))
}

impl Args {
    /// Validate the arguments. Fails before any platform resource is used.
    pub fn resolve(&self) -> Result<Settings> {
        let source = match (&self.message, &self.file) {
            (Some(message), _) => Source::Message(message.clone()),
            (None, Some(file)) if !file.is_empty() => Source::File(file.clone()),
            _ => {
                return Err(PresenterError::Config(
                    "no message or file provided".to_string(),
                ));
            },
        };

        if self.line_spacing > MAX_LINE_SPACING {
            return Err(PresenterError::Config(format!(
                "line spacing {} exceeds {MAX_LINE_SPACING}",
                self.line_spacing
            )));
        }

        let roles = ButtonRoles::parse(
            &self.action_button,
            &self.confirm_button,
            &self.cancel_button,
            &self.inaction_button,
        )?;

        let defaults = ItemDefaults {
            background_color: self.background_color.clone().filter(|c| !c.is_empty()),
            background_image: self
                .background_image
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            show_pill: self.show_pill,
            alignment: parse_alignment::<VerticalAlignment>(&self.message_alignment)?,
            horizontal_alignment: parse_alignment::<HorizontalAlignment>(
                &self.horizontal_alignment,
            )?,
            line_spacing: self.line_spacing,
        };

        // An empty label falls back to the role's default text.
        let label = |role: Role, text: &str, show: bool| HintLabel {
            text: if text.is_empty() {
                role.default_text().to_string()
            } else {
                text.to_string()
            },
            show,
        };
        let hints = ButtonHints {
            action: label(Role::Action, &self.action_text, self.action_show),
            confirm: label(Role::Confirm, &self.confirm_text, self.confirm_show),
            cancel: label(Role::Cancel, &self.cancel_text, self.cancel_show),
            inaction: label(Role::Inaction, &self.inaction_text, self.inaction_show),
        };

        let screen = ScreenConfig {
            width: self.width,
            height: self.height,
            scale: self.scale,
            window_title: self.window_title.clone(),
            ..ScreenConfig::default()
        };

        Ok(Settings {
            source,
            item_key: self.item_key.clone(),
            defaults,
            roles,
            hints,
            display: DisplayOptions {
                timeout_seconds: self.timeout,
                quit_after_last_item: self.quit_after_last_item,
                no_wrap: self.no_wrap,
                show_time_left: self.show_time_left,
            },
            preserve_framebuffer: self.preserve_framebuffer,
            show_spinner: self.show_spinner,
            screen,
            font_path: self.font_default.clone(),
            font_size: self.font_size_default,
        })
    }
}

impl Settings {
    /// Load the items named by the source.
    pub fn load_items(&self) -> Result<ItemsState> {
        match &self.source {
            Source::Message(text) => Ok(ItemsState::from_message(text, &self.defaults)),
            Source::File(path) => ItemsState::load(path, &self.item_key, &self.defaults),
        }
    }

    /// Render options; the spinner clock starts at `started`.
    pub fn render_options(&self, started: std::time::Instant) -> RenderOptions {
        RenderOptions {
            preserve_framebuffer: self.preserve_framebuffer,
            spinner: self
                .show_spinner
                .then(|| presenter_core::render::Spinner::new(started)),
        }
    }
}
