//! SDL2 backend for presenter.
//!
//! Implements `SdiBackend` and `InputBackend` using SDL2 and SDL2_ttf. Used
//! for desktop development and on handheld Linux firmwares (via SDL2's
//! kmsdrm or fbdev video drivers).

mod font;
pub mod input;

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use sdl2::controller::GameController;
use sdl2::event::Event;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, GameControllerSubsystem};

use presenter_types::backend::{Color, InputBackend, SdiBackend, TextureId, WEIGHT_REGULAR};
use presenter_types::error::{PresenterError, Result};
use presenter_types::input::InputEvent;

use crate::font::FontCache;
use crate::input::{RepeatTracker, map_sdl_event};

fn backend_err(e: impl ToString) -> PresenterError {
    PresenterError::Backend(e.to_string())
}

/// SDL2 rendering and input backend.
///
/// # Safety
///
/// `textures` is declared before `texture_creator` so that Rust's drop order
/// (declaration order) destroys all textures before the creator they borrow from.
/// The `Texture<'static>` lifetime is erased via transmute in `load_texture()` --
/// this is sound because the `TextureCreator` always outlives the textures.
pub struct SdlBackend {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    textures: HashMap<u64, Texture<'static>>,
    texture_creator: TextureCreator<WindowContext>,
    next_texture_id: u64,
    fonts: FontCache,
    controller_subsystem: Option<GameControllerSubsystem>,
    controllers: Vec<GameController>,
    repeats: RepeatTracker,
}

impl SdlBackend {
    /// Create a window of `width` x `height` and open the font at `font_path`.
    ///
    /// `initial_px` is the pixel size opened up front, so a missing or
    /// unreadable font fails here rather than mid-frame.
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        font_path: &Path,
        initial_px: u16,
    ) -> Result<Self> {
        let sdl = sdl2::init().map_err(backend_err)?;
        let video = sdl.video().map_err(backend_err)?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(backend_err)?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(backend_err)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(backend_err)?;
        let fonts = FontCache::open(font_path, initial_px)?;

        let controller_subsystem = match sdl.game_controller() {
            Ok(gc) => Some(gc),
            Err(e) => {
                log::warn!("game controllers unavailable: {e}");
                None
            },
        };

        let mut backend = Self {
            canvas,
            event_pump,
            textures: HashMap::new(),
            texture_creator,
            next_texture_id: 1,
            fonts,
            controller_subsystem,
            controllers: Vec::new(),
            repeats: RepeatTracker::new(),
        };
        backend.open_controllers();

        log::info!("SDL2 backend initialized: {width}x{height}");
        Ok(backend)
    }

    /// Open every attached joystick SDL recognizes as a game controller.
    fn open_controllers(&mut self) {
        let Some(gc) = &self.controller_subsystem else {
            return;
        };
        let count = match gc.num_joysticks() {
            Ok(n) => n,
            Err(e) => {
                log::warn!("cannot enumerate joysticks: {e}");
                return;
            },
        };
        self.controllers.clear();
        for index in 0..count {
            if !gc.is_game_controller(index) {
                continue;
            }
            match gc.open(index) {
                Ok(pad) => {
                    log::info!("controller opened: {}", pad.name());
                    self.controllers.push(pad);
                },
                Err(e) => log::warn!("cannot open controller {index}: {e}"),
            }
        }
    }

    /// Set the SDL draw color with optional blend mode.
    fn set_color(&mut self, color: Color) {
        if color.a < 255 {
            self.canvas.set_blend_mode(BlendMode::Blend);
        } else {
            self.canvas.set_blend_mode(BlendMode::None);
        }
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
    }

    fn span(&mut self, x1: i32, x2: i32, y: i32) {
        let _ = self.canvas.draw_line(Point::new(x1, y), Point::new(x2, y));
    }
}

impl SdiBackend for SdlBackend {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas
            .set_draw_color(sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a));
        self.canvas.clear();
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| backend_err(format!("texture not found: {}", tex.0)))?;
        self.canvas
            .copy(texture, None, Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_color(color);
        self.canvas
            .fill_rect(Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        self.draw_text_weighted(text, x, y, font_size, WEIGHT_REGULAR, color)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        if width == 0 || height == 0 {
            return Err(backend_err(format!("empty texture: {width}x{height}")));
        }
        let row = width as usize * 4;
        let expected = row * height as usize;
        if rgba_data.len() != expected {
            return Err(backend_err(format!(
                "texture data size mismatch: expected {expected}, got {}",
                rgba_data.len()
            )));
        }

        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
            .map_err(backend_err)?;

        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (src, dst) in rgba_data.chunks_exact(row).zip(buffer.chunks_mut(pitch)) {
                    dst[..row].copy_from_slice(src);
                }
            })
            .map_err(backend_err)?;

        texture.set_blend_mode(BlendMode::Blend);

        // SAFETY: The texture borrows from self.texture_creator which lives in the
        // same struct. `textures` is declared before `texture_creator`, so Rust drops
        // textures first. The erased lifetime is therefore always valid.
        let texture: Texture<'static> = unsafe { std::mem::transmute(texture) };

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        Ok(TextureId(id))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.textures.remove(&tex.0);
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size: u16) -> u32 {
        self.measure_text_weighted(text, font_size, WEIGHT_REGULAR)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.textures.clear();
        self.controllers.clear();
        self.repeats.clear();
        log::info!("SDL2 backend shut down ({} fonts cached)", self.fonts.loaded());
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended: Shape Primitives
    // -------------------------------------------------------------------

    fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        radius: u16,
        color: Color,
    ) -> Result<()> {
        if radius == 0 || w == 0 || h == 0 {
            return self.fill_rect(x, y, w, h, color);
        }
        let r = (radius as u32).min(w / 2).min(h / 2) as i32;
        self.set_color(color);

        // Center body rect.
        if h > r as u32 * 2 {
            let _ = self
                .canvas
                .fill_rect(Rect::new(x, y + r, w, h - r as u32 * 2));
        }

        // Corner caps using midpoint circle horizontal spans.
        let left = x + r;
        let right = x + w as i32 - 1 - r;
        let top = y + r;
        let bottom = y + h as i32 - 1 - r;
        let mut cx = 0i32;
        let mut cy = r;
        let mut d = 1 - r;
        while cx <= cy {
            self.span(left - cy, right + cy, top - cx);
            self.span(left - cx, right + cx, top - cy);
            self.span(left - cy, right + cy, bottom + cx);
            self.span(left - cx, right + cx, bottom + cy);

            cx += 1;
            if d < 0 {
                d += 2 * cx + 1;
            } else {
                cy -= 1;
                d += 2 * (cx - cy) + 1;
            }
        }
        Ok(())
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: u16, color: Color) -> Result<()> {
        let r = radius as i32;
        self.set_color(color);

        let mut x = 0i32;
        let mut y = r;
        let mut d = 1 - r;
        while x <= y {
            self.span(cx - y, cx + y, cy + x);
            if x != 0 {
                self.span(cx - y, cx + y, cy - x);
            }
            if x != y {
                self.span(cx - x, cx + x, cy + y);
                self.span(cx - x, cx + x, cy - y);
            }
            x += 1;
            if d < 0 {
                d += 2 * x + 1;
            } else {
                y -= 1;
                d += 2 * (x - y) + 1;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended: Text System
    // -------------------------------------------------------------------

    fn measure_text_height(&self, font_size: u16) -> u32 {
        self.fonts
            .with_font(font_size, WEIGHT_REGULAR, |font| font.height().max(0) as u32)
            .unwrap_or_else(|e| {
                log::warn!("{e}");
                font_size as u32
            })
    }

    fn draw_text_weighted(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        weight: u16,
        color: Color,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let sdl_color = sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a);
        let surface = self
            .fonts
            .with_font(font_size, weight, |font| font.render(text).blended(sdl_color))?
            .map_err(backend_err)?;
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(backend_err)?;
        self.canvas
            .copy(
                &texture,
                None,
                Rect::new(x, y, surface.width(), surface.height()),
            )
            .map_err(backend_err)
    }

    fn measure_text_weighted(&self, text: &str, font_size: u16, weight: u16) -> u32 {
        if text.is_empty() {
            return 0;
        }
        match self.fonts.with_font(font_size, weight, |font| font.size_of(text)) {
            Ok(Ok((w, _))) => w,
            Ok(Err(e)) => {
                log::warn!("cannot measure '{text}': {e}");
                0
            },
            Err(e) => {
                log::warn!("{e}");
                0
            },
        }
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let now = Instant::now();
        let mut events = Vec::new();
        let mut rescan = false;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::ControllerDeviceAdded { .. } | Event::ControllerDeviceRemoved { .. } => {
                    rescan = true;
                },
                other => {
                    if let Some(e) = map_sdl_event(other, &mut self.repeats, now) {
                        events.push(e);
                    }
                },
            }
        }
        if rescan {
            self.repeats.clear();
            self.open_controllers();
        }
        events.extend(self.repeats.due(now));
        events
    }
}
