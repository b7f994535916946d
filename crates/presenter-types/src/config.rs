//! Screen geometry and layout metrics.
//!
//! Metrics are expressed in logical units and converted to pixels with
//! [`ScreenConfig::scale1`], matching how handheld firmwares describe a
//! 320x240 layout that is rendered at 2x on a 640x480 panel.

/// Fixed framebuffer geometry and the padding/size metrics derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Logical-to-pixel multiplier.
    pub scale: u32,
    /// Base padding in logical units.
    pub padding: u32,
    /// Extra horizontal padding reserved next to button hints.
    pub button_padding: u32,
    /// Height of a pill (text background or button group) in logical units.
    pub pill_size: u32,
    /// Diameter of a button glyph inside a hint, in logical units.
    pub button_size: u32,
    /// Gap between button hints, in logical units.
    pub button_margin: u32,
    /// Font size for hints and the countdown, in logical units.
    pub font_size_small: u16,
    /// Font size for the button letter inside a hint, in logical units.
    pub font_size_tiny: u16,
    /// Window title (desktop backends only).
    pub window_title: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            scale: 2,
            padding: 10,
            button_padding: 12,
            pill_size: 30,
            button_size: 20,
            button_margin: 5,
            font_size_small: 12,
            font_size_tiny: 10,
            window_title: "presenter".to_string(),
        }
    }
}

impl ScreenConfig {
    /// Convert logical units to pixels.
    pub fn scale1(&self, logical: u32) -> u32 {
        logical.saturating_mul(self.scale)
    }

    /// Convert a logical font size to a pixel font size.
    pub fn font_px(&self, logical: u16) -> u16 {
        logical.saturating_mul(self.scale as u16)
    }

    /// Horizontal padding on each side of the text block.
    pub fn message_padding(&self) -> u32 {
        self.scale1(self.padding + self.button_padding)
    }

    /// Maximum rendered width of a wrapped line.
    pub fn max_line_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.message_padding())
    }
}
