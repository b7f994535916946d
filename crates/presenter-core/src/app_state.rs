//! Dialog state machine.
//!
//! [`Presenter`] owns the loaded items, the scroll state and the role
//! bindings. Each loop iteration feeds it the polled input events with
//! [`Presenter::handle_events`] and the current time with
//! [`Presenter::tick`]; the renderer reads it and clears the dirty flag.

use std::time::{Duration, Instant};

use crate::exit::ExitCode;
use crate::input::{Button, InputEvent};
use crate::items::{Item, ItemsState};
use crate::roles::{ButtonRoles, Role};
use crate::scroll::{SCROLL_STEP, ScrollState};
use crate::signal::AdvanceFlag;

/// Behavior switches taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    /// Seconds before quitting with [`ExitCode::Timeout`]. Zero disables
    /// the timeout; a negative value makes the dialog display-only.
    pub timeout_seconds: i64,
    pub quit_after_last_item: bool,
    pub no_wrap: bool,
    pub show_time_left: bool,
}

impl DisplayOptions {
    /// Input is ignored entirely.
    pub fn display_only(&self) -> bool {
        self.timeout_seconds < 0
    }

    fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds as u64))
    }
}

/// Whether the main loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Quitting(ExitCode),
}

/// Navigation direction for left/right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Previous,
    Next,
}

/// The dialog's mutable state.
#[derive(Debug)]
pub struct Presenter {
    pub items: ItemsState,
    pub scroll: ScrollState,
    pub roles: ButtonRoles,
    pub options: DisplayOptions,
    advance: AdvanceFlag,
    redraw: bool,
    run_state: RunState,
    answer: Option<usize>,
    started: Instant,
    shown_time_left: Option<u64>,
    scroll_step: u32,
}

impl Presenter {
    pub fn new(
        items: ItemsState,
        roles: ButtonRoles,
        options: DisplayOptions,
        advance: AdvanceFlag,
        started: Instant,
    ) -> Self {
        Self {
            items,
            scroll: ScrollState::default(),
            roles,
            options,
            advance,
            redraw: true,
            run_state: RunState::Running,
            answer: None,
            started,
            shown_time_left: None,
            scroll_step: SCROLL_STEP,
        }
    }

    /// Set the pixel distance of one up/down step.
    pub fn with_scroll_step(mut self, pixels: u32) -> Self {
        self.scroll_step = pixels;
        self
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Exit status once the dialog has finished.
    pub fn exit_code(&self) -> Option<ExitCode> {
        match self.run_state {
            RunState::Running => None,
            RunState::Quitting(code) => Some(code),
        }
    }

    /// 1-based index of the item that was confirmed.
    pub fn answer(&self) -> Option<usize> {
        self.answer
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Called by the renderer after a frame has been drawn.
    pub fn mark_drawn(&mut self) {
        self.redraw = false;
    }

    pub fn selected_item(&self) -> &Item {
        self.items.selected_item()
    }

    fn quit(&mut self, code: ExitCode) {
        log::info!("quitting with {code:?}");
        self.redraw = false;
        self.run_state = RunState::Quitting(code);
    }

    /// Re-check whether the selected item's background image appeared.
    pub fn refresh_image(&mut self) {
        if self.items.selected_item_mut().refresh_image_exists() {
            self.redraw = true;
        }
    }

    /// Process one iteration's worth of input.
    pub fn handle_events(&mut self, events: &[InputEvent]) {
        if !self.is_running() {
            return;
        }
        self.refresh_image();

        if self.options.display_only() {
            return;
        }

        if self.advance.take() {
            log::debug!("advance requested");
            self.advance_selection();
            if !self.is_running() {
                return;
            }
        }

        for event in events {
            self.handle_event(event);
            if !self.is_running() {
                return;
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Quit => self.quit(ExitCode::Error),
            InputEvent::ButtonRelease(button) => {
                if let Some(role) = self.roles.role_for(button) {
                    self.fire(role);
                }
            },
            InputEvent::ButtonPress(button) => self.handle_direction(button, false),
            InputEvent::ButtonRepeat(button) => self.handle_direction(button, true),
        }
    }

    fn fire(&mut self, role: Role) {
        if role == Role::Confirm {
            self.answer = Some(self.items.selected() + 1);
        }
        self.quit(role.exit_code());
    }

    fn handle_direction(&mut self, button: Button, repeat: bool) {
        match button {
            Button::Up => self.step_scroll(-1),
            Button::Down => self.step_scroll(1),
            Button::Left => self.navigate(Direction::Previous, repeat),
            Button::Right => self.navigate(Direction::Next, repeat),
            _ => {},
        }
    }

    fn step_scroll(&mut self, sign: i32) {
        if self.scroll.scroll_by(sign * self.scroll_step as i32) {
            self.redraw = true;
        }
    }

    fn select(&mut self, index: usize) {
        self.items.set_selected(index);
        self.scroll.reset();
        self.redraw = true;
    }

    fn advance_selection(&mut self) {
        let next = self.items.selected() + 1;
        if next <= self.items.last_index() {
            self.select(next);
        } else if self.options.quit_after_last_item {
            self.quit(ExitCode::Success);
        } else {
            self.select(0);
        }
    }

    fn navigate(&mut self, direction: Direction, repeat: bool) {
        let selected = self.items.selected();
        let last = self.items.last_index();
        let at_boundary = match direction {
            Direction::Previous => selected == 0,
            Direction::Next => selected == last,
        };

        if !at_boundary {
            match direction {
                Direction::Previous => self.select(selected - 1),
                Direction::Next => self.select(selected + 1),
            }
            return;
        }

        // Holding the button never wraps past the ends.
        if repeat {
            return;
        }
        if direction == Direction::Next && self.options.quit_after_last_item {
            self.quit(ExitCode::Success);
            return;
        }
        if self.options.no_wrap {
            return;
        }
        match direction {
            Direction::Previous => self.select(last),
            Direction::Next => self.select(0),
        }
    }

    /// Whole seconds left before the timeout, when the countdown is shown.
    pub fn time_left(&self, now: Instant) -> Option<u64> {
        if !self.options.show_time_left {
            return None;
        }
        let timeout = self.options.timeout()?;
        let elapsed = now.saturating_duration_since(self.started).as_secs();
        Some(timeout.as_secs().saturating_sub(elapsed))
    }

    /// Advance time: expire the timeout and refresh the countdown.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_running() {
            return;
        }
        let Some(timeout) = self.options.timeout() else {
            return;
        };
        if now.saturating_duration_since(self.started) >= timeout {
            self.quit(ExitCode::Timeout);
            return;
        }
        let remaining = self.time_left(now);
        if remaining.is_some() && remaining != self.shown_time_left {
            self.shown_time_left = remaining;
            self.redraw = true;
        }
    }
}
