//! presenter entry point.
//!
//! Shows a full-screen message (or a list of messages paged with left and
//! right), waits for a button, prints the confirmed item's 1-based index
//! and exits with a status naming the action taken.

mod cli;
mod signals;

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Args;
use presenter_backend_sdl::SdlBackend;
use presenter_core::app_state::Presenter;
use presenter_core::backend::{InputBackend, SdiBackend};
use presenter_core::error::PresenterError;
use presenter_core::exit::ExitCode;
use presenter_core::render::Renderer;
use presenter_core::scroll::SCROLL_STEP;
use presenter_core::signal::AdvanceFlag;

/// How a finished run ended.
struct Outcome {
    code: ExitCode,
    answer: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::Error
            } else {
                ExitCode::Success
            };
            process::exit(code.code());
        },
    };

    let code = match run(&args) {
        Ok(outcome) => {
            if let Some(answer) = outcome.answer {
                println!("{answer}");
            }
            outcome.code
        },
        Err(err) => {
            log::error!("{err:#}");
            exit_code_for_error(&err)
        },
    };
    log::debug!("exiting with {}", code.code());
    process::exit(code.code());
}

/// Load errors exit with `ParseError`; everything else with `Error`.
fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<PresenterError>() {
        Some(e) if e.is_load_error() => ExitCode::ParseError,
        _ => ExitCode::Error,
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let settings = args.resolve()?;
    let items = settings.load_items()?;
    log::info!("loaded {} item(s)", items.count());

    let advance = AdvanceFlag::new();
    signals::register_advance(&advance).context("registering SIGUSR1")?;
    signals::spawn_terminator().context("installing signal handlers")?;

    let screen = settings.screen.clone();
    let mut backend = SdlBackend::new(
        &screen.window_title,
        screen.width,
        screen.height,
        &settings.font_path,
        screen.font_px(settings.font_size),
    )?;
    backend.init(screen.width, screen.height)?;

    let started = Instant::now();
    let mut presenter = Presenter::new(
        items,
        settings.roles,
        settings.display,
        advance,
        started,
    )
    .with_scroll_step(screen.scale1(SCROLL_STEP));
    let mut renderer = Renderer::new(
        screen,
        settings.font_size,
        settings.hints.clone(),
        settings.render_options(started),
    );

    while presenter.is_running() {
        let events = backend.poll_events();
        presenter.handle_events(&events);
        if !presenter.is_running() {
            break;
        }

        if presenter.needs_redraw() || renderer.options().animating() {
            renderer.draw_frame(&mut backend, &mut presenter, Instant::now())?;
        } else {
            backend.sync();
        }

        presenter.tick(Instant::now());
    }

    Ok(finish(&presenter, &mut renderer, &mut backend))
}

/// Record the outcome, then release the backend. Teardown failures are
/// logged and never change the outcome.
fn finish(presenter: &Presenter, renderer: &mut Renderer, backend: &mut dyn SdiBackend) -> Outcome {
    let outcome = Outcome {
        code: presenter.exit_code().unwrap_or(ExitCode::Success),
        answer: presenter.answer(),
    };
    if let Err(e) = renderer.release(backend) {
        log::warn!("releasing textures: {e}");
    }
    if let Err(e) = backend.shutdown() {
        log::warn!("backend shutdown: {e}");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use presenter_core::backend::{Color, TextureId};
    use presenter_core::error::Result as PresenterResult;
    use presenter_core::input::{Button, InputEvent};
    use presenter_core::items::{ItemDefaults, ItemsState};
    use presenter_core::roles::ButtonRoles;

    /// Backend whose teardown always fails.
    struct BrokenTeardown {
        shutdown_called: bool,
    }

    impl SdiBackend for BrokenTeardown {
        fn init(&mut self, _width: u32, _height: u32) -> PresenterResult<()> {
            Ok(())
        }
        fn clear(&mut self, _color: Color) -> PresenterResult<()> {
            Ok(())
        }
        fn blit(&mut self, _tex: TextureId, _x: i32, _y: i32, _w: u32, _h: u32) -> PresenterResult<()> {
            Ok(())
        }
        fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: Color) -> PresenterResult<()> {
            Ok(())
        }
        fn draw_text(
            &mut self,
            _text: &str,
            _x: i32,
            _y: i32,
            _font_size: u16,
            _color: Color,
        ) -> PresenterResult<()> {
            Ok(())
        }
        fn swap_buffers(&mut self) -> PresenterResult<()> {
            Ok(())
        }
        fn load_texture(&mut self, _width: u32, _height: u32, _rgba: &[u8]) -> PresenterResult<TextureId> {
            Ok(TextureId(1))
        }
        fn destroy_texture(&mut self, _tex: TextureId) -> PresenterResult<()> {
            Err(PresenterError::Backend("destroy failed".into()))
        }
        fn measure_text(&self, text: &str, _font_size: u16) -> u32 {
            text.len() as u32 * 8
        }
        fn shutdown(&mut self) -> PresenterResult<()> {
            self.shutdown_called = true;
            Err(PresenterError::Backend("shutdown failed".into()))
        }
        fn sync(&mut self) {}
    }

    #[test]
    fn answer_survives_failed_teardown() {
        let defaults = ItemDefaults::default();
        let items = ItemsState::from_items(
            vec![
                ItemsState::from_message("a", &defaults).selected_item().clone(),
                ItemsState::from_message("b", &defaults).selected_item().clone(),
            ],
            1,
        )
        .unwrap();
        let mut presenter = Presenter::new(
            items,
            ButtonRoles::parse("", "A", "", "").unwrap(),
            Default::default(),
            AdvanceFlag::new(),
            Instant::now(),
        );
        presenter.handle_events(&[InputEvent::ButtonRelease(Button::A)]);

        let mut renderer = Renderer::new(
            presenter_core::config::ScreenConfig::default(),
            16,
            Default::default(),
            Default::default(),
        );
        let mut backend = BrokenTeardown {
            shutdown_called: false,
        };
        let outcome = finish(&presenter, &mut renderer, &mut backend);
        assert!(backend.shutdown_called);
        assert_eq!(outcome.code, ExitCode::Confirm);
        assert_eq!(outcome.answer, Some(2));
    }

    #[test]
    fn load_errors_map_to_parse_error() {
        let err = anyhow::Error::from(PresenterError::Load("bad".into()));
        assert_eq!(exit_code_for_error(&err), ExitCode::ParseError);

        let json = serde_json_error();
        assert_eq!(exit_code_for_error(&json), ExitCode::ParseError);
    }

    #[test]
    fn other_errors_map_to_error() {
        for e in [
            PresenterError::Config("dup".into()),
            PresenterError::Resource("font".into()),
            PresenterError::Backend("sdl".into()),
        ] {
            assert_eq!(exit_code_for_error(&anyhow::Error::from(e)), ExitCode::Error);
        }
        let plain = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for_error(&plain), ExitCode::Error);
    }

    #[test]
    fn context_keeps_error_kind() {
        let err = anyhow::Error::from(PresenterError::Load("bad".into())).context("loading");
        assert_eq!(exit_code_for_error(&err), ExitCode::ParseError);
    }

    fn serde_json_error() -> anyhow::Error {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let settings = Args::try_parse_from(["presenter", "--file", path.to_str().unwrap()])
            .unwrap()
            .resolve()
            .unwrap();
        anyhow::Error::from(settings.load_items().unwrap_err())
    }
}
