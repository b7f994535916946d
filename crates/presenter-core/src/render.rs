//! Render orchestrator: composes one dialog frame from the presenter state.
//!
//! Draw order, back to front:
//!
//! 1. background fill (skipped when preserving the framebuffer and the item
//!    defines no background)
//! 2. background image
//! 3. trailing button group (cancel / confirm)
//! 4. countdown
//! 5. wrapped text, with optional pills
//! 6. scrollbar
//! 7. leading button group (inaction / action)
//! 8. spinner

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_state::Presenter;
use crate::backend::{Color, SdiBackend, TextureId, WEIGHT_BOLD};
use crate::config::ScreenConfig;
use crate::error::{PresenterError, Result};
use crate::image::{FitRect, fit_rect, load_image, scale_area_average};
use crate::input::Button;
use crate::items::{HorizontalAlignment, VerticalAlignment};
use crate::layout::{TextMeasurer, wrap};
use crate::roles::{ButtonRoles, Role};
use crate::scroll::{SCROLLBAR_MIN_THUMB, SCROLLBAR_PADDING, SCROLLBAR_WIDTH};

const TEXT_COLOR: Color = Color::WHITE;
const PILL_COLOR: Color = Color::BLACK;
const GROUP_COLOR: Color = Color::rgb(38, 38, 38);
const BUTTON_FACE_COLOR: Color = Color::rgb(200, 200, 200);
const BUTTON_LABEL_COLOR: Color = Color::rgb(38, 38, 38);
const SCROLLBAR_TRACK_COLOR: Color = Color::rgba(100, 100, 100, 128);
const SCROLLBAR_THUMB_COLOR: Color = Color::rgba(200, 200, 200, 192);

/// Spinner glyph size in logical units.
const SPINNER_FONT_SIZE: u16 = 20;
/// Gap between the last line and the spinner, in logical units.
const SPINNER_GAP: u32 = 10;
/// Spinner inset from the bottom-right corner when there is no text.
const SPINNER_CORNER_INSET: u32 = 30;

// -------------------------------------------------------------------
// Options
// -------------------------------------------------------------------

/// Busy indicator cycling through `| / - \`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spinner {
    started: Instant,
}

impl Spinner {
    pub const FRAMES: [&'static str; 4] = ["|", "/", "-", "\\"];
    pub const FRAME_MS: u128 = 100;

    pub fn new(started: Instant) -> Self {
        Self { started }
    }

    /// Glyph to show at `now`.
    pub fn frame(&self, now: Instant) -> &'static str {
        let ticks = now.saturating_duration_since(self.started).as_millis() / Self::FRAME_MS;
        Self::FRAMES[(ticks % Self::FRAMES.len() as u128) as usize]
    }
}

/// Frame-level rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Leave the previous frame in place when the item has no background.
    pub preserve_framebuffer: bool,
    pub spinner: Option<Spinner>,
}

impl RenderOptions {
    /// Frames must be drawn continuously while the spinner animates.
    pub fn animating(&self) -> bool {
        self.spinner.is_some()
    }
}

/// Text and visibility of one button hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintLabel {
    pub text: String,
    pub show: bool,
}

/// Hint labels for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonHints {
    pub action: HintLabel,
    pub confirm: HintLabel,
    pub cancel: HintLabel,
    pub inaction: HintLabel,
}

impl Default for ButtonHints {
    fn default() -> Self {
        let hidden = |role: Role| HintLabel {
            text: role.default_text().to_string(),
            show: false,
        };
        Self {
            action: hidden(Role::Action),
            confirm: hidden(Role::Confirm),
            cancel: hidden(Role::Cancel),
            inaction: hidden(Role::Inaction),
        }
    }
}

impl ButtonHints {
    pub fn label(&self, role: Role) -> &HintLabel {
        match role {
            Role::Action => &self.action,
            Role::Confirm => &self.confirm,
            Role::Cancel => &self.cancel,
            Role::Inaction => &self.inaction,
        }
    }

    fn visible<'a>(&'a self, roles: &ButtonRoles, role: Role) -> Option<(Button, &'a str)> {
        let label = self.label(role);
        let button = roles.button(role)?;
        label.show.then_some((button, label.text.as_str()))
    }

    /// Hints drawn at the bottom-right: cancel then confirm.
    pub fn trailing<'a>(&'a self, roles: &ButtonRoles) -> Vec<(Button, &'a str)> {
        [Role::Cancel, Role::Confirm]
            .into_iter()
            .filter_map(|role| self.visible(roles, role))
            .collect()
    }

    /// Hints drawn at the bottom-left: inaction then action.
    pub fn leading<'a>(&'a self, roles: &ButtonRoles) -> Vec<(Button, &'a str)> {
        [Role::Inaction, Role::Action]
            .into_iter()
            .filter_map(|role| self.visible(roles, role))
            .collect()
    }
}

// -------------------------------------------------------------------
// Measurement
// -------------------------------------------------------------------

/// [`TextMeasurer`] backed by an [`SdiBackend`] at a fixed font size.
pub struct BackendMeasurer<'a> {
    backend: &'a dyn SdiBackend,
    font_size: u16,
    weight: u16,
}

impl<'a> BackendMeasurer<'a> {
    pub fn new(backend: &'a dyn SdiBackend, font_size: u16, weight: u16) -> Self {
        Self {
            backend,
            font_size,
            weight,
        }
    }
}

impl TextMeasurer for BackendMeasurer<'_> {
    fn measure_text(&self, text: &str) -> u32 {
        self.backend
            .measure_text_weighted(text, self.font_size, self.weight)
    }

    fn line_height(&self) -> u32 {
        self.backend.measure_text_height(self.font_size)
    }
}

// -------------------------------------------------------------------
// Renderer
// -------------------------------------------------------------------

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Copy)]
struct CachedImage {
    tex: TextureId,
    rect: FitRect,
}

/// Placement of the last drawn line, used to anchor the spinner.
#[derive(Debug, Clone, Copy)]
struct LineBox {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

/// Draws dialog frames onto a backend.
pub struct Renderer {
    screen: ScreenConfig,
    /// Body font size in logical units.
    font_size: u16,
    hints: ButtonHints,
    options: RenderOptions,
    images: HashMap<PathBuf, CachedImage>,
    /// Paths that failed to decode or upload; never retried.
    failed_images: HashSet<PathBuf>,
}

impl Renderer {
    pub fn new(
        screen: ScreenConfig,
        font_size: u16,
        hints: ButtonHints,
        options: RenderOptions,
    ) -> Self {
        Self {
            screen,
            font_size,
            hints,
            options,
            images: HashMap::new(),
            failed_images: HashSet::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }

    fn px(&self, logical: u32) -> u32 {
        self.screen.scale1(logical)
    }

    fn ipx(&self, logical: u32) -> i32 {
        self.px(logical) as i32
    }

    /// Draw a full frame and present it.
    pub fn draw_frame(
        &mut self,
        backend: &mut dyn SdiBackend,
        presenter: &mut Presenter,
        now: Instant,
    ) -> Result<()> {
        self.draw_background(backend, presenter)?;

        let trailing = self.hints.trailing(&presenter.roles);
        self.draw_button_group(backend, &trailing, true)?;

        let countdown_h = match presenter.time_left(now) {
            Some(seconds) => self.draw_countdown(backend, seconds)?,
            None => 0,
        };

        let last_line = self.draw_text_block(backend, presenter, countdown_h)?;

        let viewport_top = self.ipx(self.screen.padding) + countdown_h as i32;
        self.draw_scrollbar(backend, presenter, viewport_top)?;

        let leading = self.hints.leading(&presenter.roles);
        self.draw_button_group(backend, &leading, false)?;

        if let Some(spinner) = self.options.spinner {
            self.draw_spinner(backend, spinner.frame(now), last_line)?;
        }

        backend.swap_buffers()?;
        presenter.mark_drawn();
        Ok(())
    }

    /// Destroy every cached texture.
    pub fn release(&mut self, backend: &mut dyn SdiBackend) -> Result<()> {
        for (_, image) in self.images.drain() {
            backend.destroy_texture(image.tex)?;
        }
        Ok(())
    }

    fn draw_background(&mut self, backend: &mut dyn SdiBackend, presenter: &Presenter) -> Result<()> {
        let item = presenter.selected_item();
        if self.options.preserve_framebuffer && !item.has_background() {
            return Ok(());
        }

        let color = match item.background_color.as_deref() {
            None => Color::BLACK,
            Some(hex) => Color::from_hex(hex).unwrap_or_else(|| {
                log::warn!("invalid background color '{hex}', using black");
                Color::BLACK
            }),
        };
        backend.clear(color.with_alpha(255))?;

        if let (true, Some(path)) = (item.image_exists, item.background_image.as_deref()) {
            self.draw_background_image(backend, path)?;
        }
        Ok(())
    }

    fn draw_background_image(&mut self, backend: &mut dyn SdiBackend, path: &Path) -> Result<()> {
        if self.failed_images.contains(path) {
            return Ok(());
        }
        let cached = self.images.get(path).copied();
        let image = match cached {
            Some(image) => image,
            None => match self.upload_image(backend, path) {
                Ok(image) => {
                    self.images.insert(path.to_path_buf(), image);
                    image
                },
                Err(e) => {
                    log::warn!("skipping background image: {e}");
                    self.failed_images.insert(path.to_path_buf());
                    return Ok(());
                },
            },
        };
        let r = image.rect;
        backend.blit(image.tex, r.x, r.y, r.w, r.h)
    }

    fn upload_image(&self, backend: &mut dyn SdiBackend, path: &Path) -> Result<CachedImage> {
        let image = load_image(path)?;
        let rect = fit_rect(
            image.width,
            image.height,
            self.screen.width,
            self.screen.height,
            self.screen.padding,
        )
        .ok_or_else(|| PresenterError::Image(format!("{}: empty image", path.display())))?;

        let image = if !backend.supports_scaling() && (rect.w, rect.h) != (image.width, image.height)
        {
            scale_area_average(&image, rect.w, rect.h)
        } else {
            image
        };
        log::debug!(
            "uploading {} as {}x{} texture",
            path.display(),
            image.width,
            image.height
        );
        let tex = backend.load_texture(image.width, image.height, &image.pixels)?;
        Ok(CachedImage { tex, rect })
    }

    /// Draw the countdown and return the vertical space it takes.
    fn draw_countdown(&self, backend: &mut dyn SdiBackend, seconds: u64) -> Result<u32> {
        let text = if seconds == 1 {
            "Time left: 1 second".to_string()
        } else {
            format!("Time left: {seconds} seconds")
        };
        let font = self.screen.font_px(self.screen.font_size_small);
        let pad = self.ipx(self.screen.padding);
        backend.draw_text(&text, pad, pad, font, TEXT_COLOR)?;
        Ok(backend.measure_text_height(font) + self.px(self.screen.padding))
    }

    fn draw_text_block(
        &self,
        backend: &mut dyn SdiBackend,
        presenter: &mut Presenter,
        countdown_h: u32,
    ) -> Result<Option<LineBox>> {
        let font = self.screen.font_px(self.font_size);
        let item = presenter.items.selected_item();
        let wrapped = wrap(
            &item.text,
            self.screen.max_line_width(),
            &BackendMeasurer::new(&*backend, font, WEIGHT_BOLD),
        );

        let spacing = self.px(item.line_spacing);
        let content_h = wrapped.content_height(spacing);
        let pad = self.px(self.screen.padding);
        let viewport_h = self.screen.height.saturating_sub(2 * pad + countdown_h);
        presenter.scroll.recompute(content_h, viewport_h);
        let scroll = presenter.scroll;

        let screen_w = self.screen.width as i32;
        let screen_h = self.screen.height as i32;
        let mut base_y = (pad + countdown_h) as i32;
        if !scroll.needs_scroll {
            match item.alignment {
                VerticalAlignment::Top => {},
                VerticalAlignment::Middle => base_y = (screen_h - content_h as i32) / 2,
                VerticalAlignment::Bottom => {
                    base_y = screen_h - content_h as i32 - (pad + countdown_h) as i32;
                },
            }
        }
        let mut y = base_y.saturating_sub(to_i32(scroll.position));

        let scrollbar_room = self.ipx(SCROLLBAR_WIDTH) + 2 * self.ipx(SCROLLBAR_PADDING);
        let mut last = None;
        for line in &wrapped.lines {
            let w = line.width as i32;
            let mut x = match item.horizontal_alignment {
                HorizontalAlignment::Left => self.ipx(2 * self.screen.padding),
                HorizontalAlignment::Center => (screen_w - w) / 2,
                HorizontalAlignment::Right => screen_w - w - self.ipx(2 * self.screen.padding),
            };
            if scroll.needs_scroll {
                x = x.min(screen_w - w - scrollbar_room);
            }
            // Glyphs sit one unscaled padding unit below the line slot.
            let text_y = y + self.screen.padding as i32;

            if item.show_pill {
                let pill_h = self.px(self.screen.pill_size);
                backend.fill_rounded_rect(
                    x - self.ipx(2 * self.screen.padding),
                    text_y - self.ipx(self.screen.padding),
                    line.width + self.px(4 * self.screen.padding),
                    pill_h,
                    (pill_h / 2) as u16,
                    PILL_COLOR,
                )?;
            }
            backend.draw_text_weighted(&line.text, x, text_y, font, WEIGHT_BOLD, TEXT_COLOR)?;

            last = Some(LineBox {
                x,
                y: text_y,
                w: line.width,
                h: wrapped.line_height,
            });
            y = y.saturating_add(to_i32(wrapped.line_height.saturating_add(spacing)));
        }
        Ok(last)
    }

    fn draw_scrollbar(
        &self,
        backend: &mut dyn SdiBackend,
        presenter: &Presenter,
        viewport_top: i32,
    ) -> Result<()> {
        let Some(bar) = presenter
            .scroll
            .scrollbar(viewport_top, self.px(SCROLLBAR_MIN_THUMB))
        else {
            return Ok(());
        };
        let w = self.px(SCROLLBAR_WIDTH);
        let x = self.screen.width as i32 - w as i32 - self.ipx(SCROLLBAR_PADDING);
        backend.fill_rect(x, bar.track_y, w, bar.track_h, SCROLLBAR_TRACK_COLOR)?;
        backend.fill_rect(x, bar.thumb_y, w, bar.thumb_h, SCROLLBAR_THUMB_COLOR)
    }

    fn hint_width(&self, backend: &dyn SdiBackend, text: &str) -> u32 {
        let font = self.screen.font_px(self.screen.font_size_small);
        self.px(self.screen.button_size)
            + self.px(self.screen.button_margin)
            + backend.measure_text(text, font)
    }

    fn draw_button_group(
        &self,
        backend: &mut dyn SdiBackend,
        hints: &[(Button, &str)],
        align_right: bool,
    ) -> Result<()> {
        if hints.is_empty() {
            return Ok(());
        }
        let margin = self.px(self.screen.button_margin);
        let pill_h = self.px(self.screen.pill_size);
        let widths: Vec<u32> = hints
            .iter()
            .map(|(_, text)| self.hint_width(&*backend, text))
            .collect();
        let group_w = widths.iter().map(|w| w + margin).sum::<u32>() + margin;

        let pad = self.ipx(self.screen.padding);
        let mut x = if align_right {
            self.screen.width as i32 - pad - group_w as i32
        } else {
            pad
        };
        let y = self.screen.height as i32 - pad - pill_h as i32;
        backend.fill_rounded_rect(x, y, group_w, pill_h, (pill_h / 2) as u16, GROUP_COLOR)?;

        let center_y = y + pill_h as i32 / 2;
        let button_size = self.px(self.screen.button_size);
        let tiny = self.screen.font_px(self.screen.font_size_tiny);
        let small = self.screen.font_px(self.screen.font_size_small);
        x += margin as i32;
        for ((button, text), hint_w) in hints.iter().zip(widths) {
            let radius = button_size / 2;
            let cx = x + radius as i32;
            backend.fill_circle(cx, center_y, radius as u16, BUTTON_FACE_COLOR)?;

            let label = button.label();
            let label_w = backend.measure_text(label, tiny) as i32;
            let label_h = backend.measure_text_height(tiny) as i32;
            backend.draw_text(
                label,
                cx - label_w / 2,
                center_y - label_h / 2,
                tiny,
                BUTTON_LABEL_COLOR,
            )?;

            let text_h = backend.measure_text_height(small) as i32;
            backend.draw_text(
                text,
                x + (button_size + margin) as i32,
                center_y - text_h / 2,
                small,
                TEXT_COLOR,
            )?;
            x += (hint_w + margin) as i32;
        }
        Ok(())
    }

    fn draw_spinner(
        &self,
        backend: &mut dyn SdiBackend,
        glyph: &str,
        last_line: Option<LineBox>,
    ) -> Result<()> {
        let font = self.screen.font_px(SPINNER_FONT_SIZE);
        let glyph_h = backend.measure_text_height(font) as i32;
        let (x, y, line_h) = match last_line {
            Some(line) if line.w > 0 => (
                line.x + line.w as i32 + self.ipx(SPINNER_GAP),
                line.y,
                line.h as i32,
            ),
            _ => (
                self.screen.width as i32 - self.ipx(SPINNER_CORNER_INSET),
                self.screen.height as i32 - self.ipx(SPINNER_CORNER_INSET),
                0,
            ),
        };
        backend.draw_text(glyph, x, y + (line_h - glyph_h) / 2, font, TEXT_COLOR)
    }
}
