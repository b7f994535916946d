//! Shared test utilities for presenter-core tests.
//!
//! Provides a [`MockBackend`] that records all draw calls for assertion.

use crate::backend::{Color, SdiBackend, TextureId};
use crate::error::Result;

/// Width of one character as measured by the mock.
pub const MOCK_GLYPH_WIDTH: u32 = 8;

/// A recorded draw call from the mock backend.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    Clear(Color),
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    FillRoundedRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    FillCircle {
        cx: i32,
        cy: i32,
        radius: u16,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    },
    Blit {
        tex: TextureId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    LoadTexture {
        width: u32,
        height: u32,
    },
    Swap,
}

/// A mock backend that records all draw calls for test assertions.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    pub scaling: bool,
    next_texture: u64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            scaling: true,
            next_texture: 1,
        }
    }

    /// A backend whose blits copy pixels 1:1.
    pub fn without_scaling() -> Self {
        Self {
            scaling: false,
            ..Self::new()
        }
    }

    /// Count of `FillRect` calls.
    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }

    /// Count of `LoadTexture` calls.
    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::LoadTexture { .. }))
            .count()
    }

    /// Return text draw calls as `(text, x, y, font_size)` tuples in draw
    /// order.
    pub fn text_positions(&self) -> Vec<(&str, i32, i32, u16)> {
        self.calls
            .iter()
            .filter_map(|c| {
                if let DrawCall::DrawText {
                    text,
                    x,
                    y,
                    font_size,
                    ..
                } = c
                {
                    Some((text.as_str(), *x, *y, *font_size))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| {
            if let DrawCall::DrawText { text, .. } = c {
                text.contains(needle)
            } else {
                false
            }
        })
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&DrawCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    /// Index of the first `DrawText` containing `needle`.
    pub fn text_index(&self, needle: &str) -> Option<usize> {
        self.position(|c| matches!(c, DrawCall::DrawText { text, .. } if text.contains(needle)))
    }
}

impl SdiBackend for MockBackend {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Clear(color));
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        _radius: u16,
        color: Color,
    ) -> Result<()> {
        self.calls
            .push(DrawCall::FillRoundedRect { x, y, w, h, color });
        Ok(())
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: u16, _color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillCircle { cx, cy, radius });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Swap);
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, _rgba_data: &[u8]) -> Result<TextureId> {
        self.calls.push(DrawCall::LoadTexture { width, height });
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        Ok(id)
    }

    fn destroy_texture(&mut self, _tex: TextureId) -> Result<()> {
        Ok(())
    }

    fn measure_text(&self, text: &str, _font_size: u16) -> u32 {
        text.chars().count() as u32 * MOCK_GLYPH_WIDTH
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    fn supports_scaling(&self) -> bool {
        self.scaling
    }

    fn sync(&mut self) {}
}
