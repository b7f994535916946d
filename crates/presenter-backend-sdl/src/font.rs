//! TrueType font cache.
//!
//! Fonts are opened lazily per (pixel size, weight) from a single font file.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sdl2::ttf::{Font, FontStyle, Sdl2TtfContext};

use presenter_types::backend::WEIGHT_BOLD;
use presenter_types::error::{PresenterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FontKey {
    px: u16,
    bold: bool,
}

impl FontKey {
    fn new(px: u16, weight: u16) -> Self {
        Self {
            px: px.max(1),
            bold: weight >= WEIGHT_BOLD,
        }
    }
}

/// Fonts opened from one file at the sizes the renderer asks for.
pub(crate) struct FontCache {
    ttf: &'static Sdl2TtfContext,
    path: PathBuf,
    fonts: RefCell<HashMap<FontKey, Font<'static, 'static>>>,
}

impl FontCache {
    /// Initialize SDL2_ttf and check that `path` can be opened as a font.
    pub(crate) fn open(path: &Path, initial_px: u16) -> Result<Self> {
        if !path.exists() {
            return Err(PresenterError::Resource(format!(
                "font not found: {}",
                path.display()
            )));
        }
        let ttf = sdl2::ttf::init().map_err(|e| PresenterError::Backend(e.to_string()))?;
        // The TTF context must outlive every font; it lives until process exit.
        let ttf: &'static Sdl2TtfContext = Box::leak(Box::new(ttf));

        let cache = Self {
            ttf,
            path: path.to_path_buf(),
            fonts: RefCell::new(HashMap::new()),
        };
        cache.ensure(FontKey::new(initial_px, WEIGHT_BOLD))?;
        log::debug!("font opened: {}", path.display());
        Ok(cache)
    }

    fn ensure(&self, key: FontKey) -> Result<()> {
        if self.fonts.borrow().contains_key(&key) {
            return Ok(());
        }
        let mut font = self.ttf.load_font(&self.path, key.px).map_err(|e| {
            PresenterError::Resource(format!("{}: {e}", self.path.display()))
        })?;
        if key.bold {
            font.set_style(FontStyle::BOLD);
        }
        self.fonts.borrow_mut().insert(key, font);
        Ok(())
    }

    /// Run `f` with the font for `px` and `weight`, opening it on first use.
    pub(crate) fn with_font<R>(
        &self,
        px: u16,
        weight: u16,
        f: impl FnOnce(&Font<'static, 'static>) -> R,
    ) -> Result<R> {
        let key = FontKey::new(px, weight);
        self.ensure(key)?;
        let fonts = self.fonts.borrow();
        let font = fonts
            .get(&key)
            .ok_or_else(|| PresenterError::Resource(format!("font size {px} unavailable")))?;
        Ok(f(font))
    }

    pub(crate) fn loaded(&self) -> usize {
        self.fonts.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_weight_threshold() {
        assert!(!FontKey::new(32, 400).bold);
        assert!(FontKey::new(32, WEIGHT_BOLD).bold);
        assert!(FontKey::new(32, 900).bold);
    }

    #[test]
    fn key_never_zero_sized() {
        assert_eq!(FontKey::new(0, 400).px, 1);
    }

    #[test]
    fn missing_font_is_resource_error() {
        let err = match FontCache::open(Path::new("/no/such/font.ttf"), 32) {
            Ok(_) => panic!("missing font opened"),
            Err(e) => e,
        };
        assert!(matches!(err, PresenterError::Resource(_)), "{err}");
    }
}
