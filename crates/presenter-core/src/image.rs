//! Background image decoding, fitting and software scaling.

use std::path::Path;

use crate::error::{PresenterError, Result};

/// Decoded image data (RGBA pixels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

/// Destination rectangle of a fitted image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Decode an image file into RGBA pixels.
///
/// The format is detected from the file contents. PNG, JPEG and BMP are
/// supported.
pub fn load_image(path: &Path) -> Result<DecodedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| PresenterError::Image(format!("{}: {e}", path.display())))?;
    decode_image(&bytes).map_err(|e| match e {
        PresenterError::Image(msg) => PresenterError::Image(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Decode an in-memory image into RGBA pixels.
///
/// Palette, grayscale and 16-bit images are normalized to 8-bit RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| PresenterError::Image(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Fit an image inside the screen minus `padding` on every side, keeping
/// its aspect ratio, and center it on the screen.
///
/// An image smaller than the box in both dimensions is scaled by the
/// larger ratio instead, filling the box. An image exactly the size of the
/// screen is placed at the origin unscaled.
pub fn fit_rect(
    img_w: u32,
    img_h: u32,
    screen_w: u32,
    screen_h: u32,
    padding: u32,
) -> Option<FitRect> {
    if img_w == 0 || img_h == 0 {
        return None;
    }
    if img_w == screen_w && img_h == screen_h {
        return Some(FitRect {
            x: 0,
            y: 0,
            w: screen_w,
            h: screen_h,
        });
    }

    let box_w = screen_w.saturating_sub(2 * padding) as f32;
    let box_h = screen_h.saturating_sub(2 * padding) as f32;
    let scale_x = box_w / img_w as f32;
    let scale_y = box_h / img_h as f32;
    let scale = if (img_w as f32) < box_w && (img_h as f32) < box_h {
        scale_x.max(scale_y)
    } else {
        scale_x.min(scale_y)
    };

    let w = (img_w as f32 * scale) as u32;
    let h = (img_h as f32 * scale) as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some(FitRect {
        x: (screen_w as i32 - w as i32) / 2,
        y: (screen_h as i32 - h as i32) / 2,
        w,
        h,
    })
}

/// Resample to `width` x `height` by averaging the source pixels that
/// fall into each destination pixel.
pub fn scale_area_average(image: &DecodedImage, width: u32, height: u32) -> DecodedImage {
    let (src_w, src_h) = (image.width as usize, image.height as usize);
    let (dst_w, dst_h) = (width as usize, height as usize);
    let mut pixels = vec![0u8; dst_w * dst_h * 4];

    if src_w == 0 || src_h == 0 {
        return DecodedImage {
            width,
            height,
            pixels,
        };
    }

    for y in 0..dst_h {
        let y1 = y * src_h / dst_h;
        let y2 = ((y + 1) * src_h / dst_h).max(y1 + 1).min(src_h);
        for x in 0..dst_w {
            let x1 = x * src_w / dst_w;
            let x2 = ((x + 1) * src_w / dst_w).max(x1 + 1).min(src_w);

            let mut sum = [0u32; 4];
            for sy in y1..y2 {
                let row = sy * src_w;
                for sx in x1..x2 {
                    let i = (row + sx) * 4;
                    for (c, total) in sum.iter_mut().enumerate() {
                        *total += image.pixels[i + c] as u32;
                    }
                }
            }

            let n = ((x2 - x1) * (y2 - y1)) as u32;
            let o = (y * dst_w + x) * 4;
            for (c, total) in sum.iter().enumerate() {
                pixels[o + c] = (total / n) as u8;
            }
        }
    }

    DecodedImage {
        width,
        height,
        pixels,
    }
}
