//! Items model: the pages a dialog presents and how they are loaded.
//!
//! Items come either from a single `--message` string or from a JSON
//! document (a file, or standard input when the source is `-`):
//!
//! ```json
//! {
//!   "items": [
//!     { "text": "Hello", "background_color": "#102030", "show_pill": true,
//!       "alignment": "top", "horizontal_alignment": "left", "line_spacing": 4 }
//!   ],
//!   "selected": 0
//! }
//! ```
//!
//! Loading is all-or-nothing: any invalid field aborts with a load error.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PresenterError, Result};

/// Source name that selects standard input.
pub const STDIN_SOURCE: &str = "-";

/// Upper bound on a document read from standard input.
pub const MAX_STDIN_BYTES: u64 = 4 * 1024 * 1024;

/// Default JSON key holding the item array.
pub const DEFAULT_ITEM_KEY: &str = "items";

/// Default spacing between wrapped lines, in logical units.
pub const DEFAULT_LINE_SPACING: u32 = 10;

/// Largest accepted line spacing, in logical units.
pub const MAX_LINE_SPACING: u32 = 1000;

// -------------------------------------------------------------------
// Alignment
// -------------------------------------------------------------------

/// A string that does not name a variant of an enumerated option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}'")]
pub struct InvalidValue {
    pub kind: &'static str,
    pub value: String,
}

/// Vertical placement of the text block when it fits in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl FromStr for VerticalAlignment {
    type Err = InvalidValue;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(InvalidValue {
                kind: "alignment",
                value: s.to_string(),
            }),
        }
    }
}

/// Horizontal placement of each wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for HorizontalAlignment {
    type Err = InvalidValue;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(InvalidValue {
                kind: "horizontal_alignment",
                value: s.to_string(),
            }),
        }
    }
}

// -------------------------------------------------------------------
// Item
// -------------------------------------------------------------------

/// One page of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub text: String,
    /// `#RRGGBB` fill color, if the item defines one.
    pub background_color: Option<String>,
    pub background_image: Option<PathBuf>,
    /// Whether `background_image` exists on disk. Only ever flips to true.
    pub image_exists: bool,
    pub show_pill: bool,
    pub alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
    /// Spacing between wrapped lines, in logical units.
    pub line_spacing: u32,
}

impl Item {
    /// Re-check whether the background image has appeared on disk.
    ///
    /// Returns `true` only on the transition from missing to present.
    pub fn refresh_image_exists(&mut self) -> bool {
        if self.image_exists {
            return false;
        }
        match &self.background_image {
            Some(path) if path.exists() => {
                log::debug!("background image appeared: {}", path.display());
                self.image_exists = true;
                true
            },
            _ => false,
        }
    }

    /// Whether the item explicitly defines any background.
    pub fn has_background(&self) -> bool {
        self.background_color.is_some() || self.background_image.is_some()
    }
}

/// Values used for every field an item does not set itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefaults {
    pub background_color: Option<String>,
    pub background_image: Option<PathBuf>,
    pub show_pill: bool,
    pub alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
    pub line_spacing: u32,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            background_color: None,
            background_image: None,
            show_pill: false,
            alignment: VerticalAlignment::Middle,
            horizontal_alignment: HorizontalAlignment::Center,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl ItemDefaults {
    fn item(&self, text: String) -> Item {
        Item {
            text,
            background_color: self.background_color.clone(),
            image_exists: image_exists(self.background_image.as_deref()),
            background_image: self.background_image.clone(),
            show_pill: self.show_pill,
            alignment: self.alignment,
            horizontal_alignment: self.horizontal_alignment,
            line_spacing: self.line_spacing,
        }
    }
}

fn image_exists(path: Option<&Path>) -> bool {
    path.is_some_and(Path::exists)
}

/// Item as it appears in the JSON document.
#[derive(Debug, Deserialize)]
struct RawItem {
    text: String,
    background_color: Option<String>,
    background_image: Option<PathBuf>,
    show_pill: Option<bool>,
    alignment: Option<String>,
    horizontal_alignment: Option<String>,
    line_spacing: Option<i64>,
}

impl RawItem {
    fn resolve(self, index: usize, defaults: &ItemDefaults) -> Result<Item> {
        let mut item = defaults.item(self.text);
        if let Some(color) = self.background_color {
            item.background_color = Some(color);
        }
        if let Some(path) = self.background_image {
            item.image_exists = path.exists();
            item.background_image = Some(path);
        }
        if let Some(show_pill) = self.show_pill {
            item.show_pill = show_pill;
        }
        if let Some(alignment) = self.alignment {
            item.alignment = alignment
                .parse()
                .map_err(|e| PresenterError::Load(format!("item {index}: {e}")))?;
        }
        if let Some(alignment) = self.horizontal_alignment {
            item.horizontal_alignment = alignment
                .parse()
                .map_err(|e| PresenterError::Load(format!("item {index}: {e}")))?;
        }
        if let Some(spacing) = self.line_spacing {
            item.line_spacing = u32::try_from(spacing)
                .ok()
                .filter(|&s| s <= MAX_LINE_SPACING)
                .ok_or_else(|| {
                    PresenterError::Load(format!("item {index}: invalid line_spacing {spacing}"))
                })?;
        }
        Ok(item)
    }
}

// -------------------------------------------------------------------
// ItemsState
// -------------------------------------------------------------------

/// The loaded items and the current selection. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsState {
    items: Vec<Item>,
    selected: usize,
}

impl ItemsState {
    /// Build a single-item state from a literal message.
    pub fn from_message(text: &str, defaults: &ItemDefaults) -> Self {
        Self {
            items: vec![defaults.item(text.to_string())],
            selected: 0,
        }
    }

    /// Build a state from already constructed items.
    pub fn from_items(items: Vec<Item>, selected: usize) -> Result<Self> {
        if items.is_empty() {
            return Err(PresenterError::Load("no items to display".into()));
        }
        let selected = selected.min(items.len() - 1);
        Ok(Self { items, selected })
    }

    /// Load items from a JSON file, or from standard input when `source`
    /// is `-`.
    pub fn load(source: &str, item_key: &str, defaults: &ItemDefaults) -> Result<Self> {
        let document = if source == STDIN_SOURCE {
            read_capped(std::io::stdin().lock(), MAX_STDIN_BYTES)?
        } else {
            std::fs::read_to_string(source)
                .map_err(|e| PresenterError::Load(format!("{source}: {e}")))?
        };
        log::debug!("loaded {} bytes from {source}", document.len());
        Self::from_json_str(&document, item_key, defaults)
    }

    /// Parse a JSON document (comments allowed) into items.
    pub fn from_json_str(document: &str, item_key: &str, defaults: &ItemDefaults) -> Result<Self> {
        let root: Value = serde_json::from_str(&strip_json_comments(document))?;
        let Value::Object(mut root) = root else {
            return Err(PresenterError::Load("document root is not an object".into()));
        };

        let raw_items = match root.remove(item_key) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(PresenterError::Load(format!("'{item_key}' is not an array")));
            },
            None => return Err(PresenterError::Load(format!("missing '{item_key}' array"))),
        };
        if raw_items.is_empty() {
            return Err(PresenterError::Load(format!("'{item_key}' array is empty")));
        }

        let items = raw_items
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<RawItem>(value)
                    .map_err(|e| PresenterError::Load(format!("item {index}: {e}")))?
                    .resolve(index, defaults)
            })
            .collect::<Result<Vec<_>>>()?;

        let selected = match root.get("selected") {
            None | Some(Value::Null) => 0,
            Some(v) => {
                let requested = v.as_f64().ok_or_else(|| {
                    PresenterError::Load(format!("invalid selected value {v}"))
                })?;
                clamp_index(requested, items.len())
            },
        };

        log::debug!("parsed {} items, selected {selected}", items.len());
        Ok(Self { items, selected })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Set the selection, clamped into range.
    pub fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.items.len() - 1);
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    pub fn selected_item(&self) -> &Item {
        &self.items[self.selected]
    }

    pub fn selected_item_mut(&mut self) -> &mut Item {
        &mut self.items[self.selected]
    }
}

fn clamp_index(requested: f64, count: usize) -> usize {
    if requested.is_nan() || requested < 0.0 {
        0
    } else {
        (requested as usize).min(count - 1)
    }
}

/// Read a whole stream into a string, failing once it exceeds `limit` bytes.
pub fn read_capped(reader: impl Read, limit: u64) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut buf)
        .map_err(|e| PresenterError::Load(format!("failed to read input: {e}")))?;
    if buf.len() as u64 > limit {
        return Err(PresenterError::Load(format!("input exceeds {limit} bytes")));
    }
    String::from_utf8(buf).map_err(|e| PresenterError::Load(format!("input is not UTF-8: {e}")))
}

/// Remove `//` and `/* */` comments that appear outside string literals.
pub fn strip_json_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                },
                '"' => in_string = false,
                _ => {},
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            },
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            },
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                // Keep tokens on either side of the comment apart.
                out.push(' ');
            },
            _ => out.push(ch),
        }
    }
    out
}
