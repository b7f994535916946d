//! Backend trait definitions.
//!
//! Every platform implements these traits. The core state machine and render
//! orchestrator dispatch all drawing and input through trait boundaries --
//! they never call platform-specific APIs.
//!
//! The `SdiBackend` trait provides core rendering methods (required) and a
//! few extended primitives with default implementations that backends can
//! override for native rendering.

use std::time::Duration;

use crate::error::Result;
use crate::input::InputEvent;

pub use crate::color::Color;

/// Opaque handle to a loaded texture in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Font weight used for regular text.
pub const WEIGHT_REGULAR: u16 = 400;
/// Font weight used for item text.
pub const WEIGHT_BOLD: u16 = 700;

/// Interval used by the default [`SdiBackend::sync`].
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Rendering backend trait.
///
/// # Core Methods (required)
///
/// `init`, `clear`, `blit`, `fill_rect`, `draw_text`, `swap_buffers`,
/// `load_texture`, `destroy_texture`, `measure_text`, and `shutdown`.
///
/// # Extended Primitives (optional, with defaults)
///
/// Default implementations approximate using the core methods so a minimal
/// framebuffer backend keeps working.
pub trait SdiBackend {
    // -----------------------------------------------------------------------
    // Core methods (required -- no default implementations)
    // -----------------------------------------------------------------------

    /// Initialize the rendering subsystem.
    fn init(&mut self, width: u32, height: u32) -> Result<()>;

    /// Clear the screen to a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Blit a texture at the given position and size.
    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw text with its top-left corner at the given position.
    /// `font_size` is in pixels; backends may approximate.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color)
    -> Result<()>;

    /// Present the current frame to the display.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Load raw RGBA pixel data as a texture. Returns a handle for later blit.
    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId>;

    /// Destroy a previously loaded texture.
    fn destroy_texture(&mut self, tex: TextureId) -> Result<()>;

    /// Measure the width of a text string at the given font size.
    fn measure_text(&self, text: &str, font_size: u16) -> u32;

    /// Shut down the rendering subsystem and release resources.
    fn shutdown(&mut self) -> Result<()>;

    // -----------------------------------------------------------------------
    // Extended: Shapes
    // -----------------------------------------------------------------------

    /// Draw a filled rectangle with rounded corners.
    ///
    /// If `radius` exceeds half the smaller dimension, it is clamped. A
    /// radius of 0 is equivalent to `fill_rect`.
    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        _radius: u16,
        color: Color,
    ) -> Result<()> {
        // Default: fall back to sharp-cornered fill_rect.
        self.fill_rect(x, y, w, h, color)
    }

    /// Draw a filled circle.
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: u16, color: Color) -> Result<()> {
        let r = radius as i32;
        self.fill_rect(cx - r, cy - r, radius as u32 * 2, radius as u32 * 2, color)
    }

    // -----------------------------------------------------------------------
    // Extended: Text
    // -----------------------------------------------------------------------

    /// Height of one rendered line of text at the given font size.
    fn measure_text_height(&self, font_size: u16) -> u32 {
        (font_size as f32 * 1.2) as u32
    }

    /// Draw text with a font weight hint.
    ///
    /// `weight`: 100 (thin) to 900 (black), 400 = normal, 700 = bold.
    /// Backends with a single face ignore the weight.
    fn draw_text_weighted(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        weight: u16,
        color: Color,
    ) -> Result<()> {
        let _ = weight;
        self.draw_text(text, x, y, font_size, color)
    }

    /// Measure text drawn with [`SdiBackend::draw_text_weighted`].
    fn measure_text_weighted(&self, text: &str, font_size: u16, weight: u16) -> u32 {
        let _ = weight;
        self.measure_text(text, font_size)
    }

    // -----------------------------------------------------------------------
    // Extended: Frame pacing and capabilities
    // -----------------------------------------------------------------------

    /// Whether `blit` scales textures to the destination size.
    ///
    /// Backends that copy pixels 1:1 return `false`; the renderer then
    /// resamples images on the CPU before uploading them.
    fn supports_scaling(&self) -> bool {
        true
    }

    /// Wait for the next frame when nothing was drawn.
    fn sync(&mut self) {
        std::thread::sleep(FRAME_INTERVAL);
    }
}

/// Input backend trait.
///
/// Maps platform-specific input to the platform-agnostic `InputEvent` enum.
pub trait InputBackend {
    /// Poll for pending input events. Never blocks.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}
