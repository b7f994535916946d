//! SDL2 event to `InputEvent` mapping.
//!
//! Keyboards report repeats through SDL's own key repeat. Game controllers
//! do not, so held controller buttons are repeated by [`RepeatTracker`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use sdl2::controller::Button as PadButton;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use presenter_types::input::{Button, InputEvent};

/// Hold time before a controller button starts repeating.
pub const REPEAT_DELAY: Duration = Duration::from_millis(300);
/// Interval between repeats of a held controller button.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Keyboard layout used on desktop builds.
pub fn map_keycode(key: Keycode) -> Option<Button> {
    match key {
        Keycode::Up => Some(Button::Up),
        Keycode::Down => Some(Button::Down),
        Keycode::Left => Some(Button::Left),
        Keycode::Right => Some(Button::Right),
        Keycode::Return | Keycode::A => Some(Button::A),
        Keycode::Escape | Keycode::Backspace | Keycode::B => Some(Button::B),
        Keycode::X => Some(Button::X),
        Keycode::Y => Some(Button::Y),
        Keycode::Space => Some(Button::Start),
        Keycode::Tab => Some(Button::Select),
        Keycode::M | Keycode::Home => Some(Button::Menu),
        _ => None,
    }
}

/// Controller layout. SDL reports buttons by position on an Xbox-style pad.
pub fn map_pad_button(button: PadButton) -> Option<Button> {
    match button {
        PadButton::DPadUp => Some(Button::Up),
        PadButton::DPadDown => Some(Button::Down),
        PadButton::DPadLeft => Some(Button::Left),
        PadButton::DPadRight => Some(Button::Right),
        PadButton::A => Some(Button::A),
        PadButton::B => Some(Button::B),
        PadButton::X => Some(Button::X),
        PadButton::Y => Some(Button::Y),
        PadButton::Start => Some(Button::Start),
        PadButton::Back => Some(Button::Select),
        PadButton::Guide => Some(Button::Menu),
        _ => None,
    }
}

/// Map one SDL2 event. Controller presses and releases update `repeats`.
pub fn map_sdl_event(event: Event, repeats: &mut RepeatTracker, now: Instant) -> Option<InputEvent> {
    match event {
        Event::Quit { .. }
        | Event::Window {
            win_event: WindowEvent::Close,
            ..
        } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(key),
            repeat,
            ..
        } => map_keycode(key).map(|b| {
            if repeat {
                InputEvent::ButtonRepeat(b)
            } else {
                InputEvent::ButtonPress(b)
            }
        }),
        Event::KeyUp {
            keycode: Some(key), ..
        } => map_keycode(key).map(InputEvent::ButtonRelease),
        Event::ControllerButtonDown { button, .. } => map_pad_button(button).map(|b| {
            repeats.press(b, now);
            InputEvent::ButtonPress(b)
        }),
        Event::ControllerButtonUp { button, .. } => map_pad_button(button).map(|b| {
            repeats.release(b);
            InputEvent::ButtonRelease(b)
        }),
        _ => None,
    }
}

/// Synthesizes repeat events for held buttons.
#[derive(Debug, Default)]
pub struct RepeatTracker {
    /// Held buttons and the time of their next repeat.
    held: HashMap<Button, Instant>,
}

impl RepeatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button, now: Instant) {
        self.held.insert(button, now + REPEAT_DELAY);
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Repeat events due at `now`. Each held button repeats at most once
    /// per call.
    pub fn due(&mut self, now: Instant) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for (button, next) in &mut self.held {
            if now >= *next {
                events.push(InputEvent::ButtonRepeat(*button));
                *next = now + REPEAT_INTERVAL;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::keyboard::Mod;

    fn key_down(key: Keycode, repeat: bool) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(key),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat,
        }
    }

    fn key_up(key: Keycode) -> Event {
        Event::KeyUp {
            timestamp: 0,
            window_id: 0,
            keycode: Some(key),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: false,
        }
    }

    #[test]
    fn arrows_map_to_dpad() {
        assert_eq!(map_keycode(Keycode::Up), Some(Button::Up));
        assert_eq!(map_keycode(Keycode::Down), Some(Button::Down));
        assert_eq!(map_keycode(Keycode::Left), Some(Button::Left));
        assert_eq!(map_keycode(Keycode::Right), Some(Button::Right));
    }

    #[test]
    fn face_button_keys() {
        assert_eq!(map_keycode(Keycode::Return), Some(Button::A));
        assert_eq!(map_keycode(Keycode::Escape), Some(Button::B));
        assert_eq!(map_keycode(Keycode::X), Some(Button::X));
        assert_eq!(map_keycode(Keycode::Y), Some(Button::Y));
        assert_eq!(map_keycode(Keycode::F5), None);
    }

    #[test]
    fn pad_buttons() {
        assert_eq!(map_pad_button(PadButton::DPadLeft), Some(Button::Left));
        assert_eq!(map_pad_button(PadButton::B), Some(Button::B));
        assert_eq!(map_pad_button(PadButton::Guide), Some(Button::Menu));
        assert_eq!(map_pad_button(PadButton::LeftShoulder), None);
    }

    #[test]
    fn key_repeat_flag_becomes_repeat_event() {
        let mut repeats = RepeatTracker::new();
        let now = Instant::now();
        assert_eq!(
            map_sdl_event(key_down(Keycode::Right, false), &mut repeats, now),
            Some(InputEvent::ButtonPress(Button::Right))
        );
        assert_eq!(
            map_sdl_event(key_down(Keycode::Right, true), &mut repeats, now),
            Some(InputEvent::ButtonRepeat(Button::Right))
        );
        assert_eq!(
            map_sdl_event(key_up(Keycode::Right), &mut repeats, now),
            Some(InputEvent::ButtonRelease(Button::Right))
        );
    }

    #[test]
    fn quit_and_window_close() {
        let mut repeats = RepeatTracker::new();
        let now = Instant::now();
        assert_eq!(
            map_sdl_event(Event::Quit { timestamp: 0 }, &mut repeats, now),
            Some(InputEvent::Quit)
        );
        let close = Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::Close,
        };
        assert_eq!(map_sdl_event(close, &mut repeats, now), Some(InputEvent::Quit));
    }

    #[test]
    fn controller_press_arms_repeat() {
        let mut repeats = RepeatTracker::new();
        let t0 = Instant::now();
        let down = Event::ControllerButtonDown {
            timestamp: 0,
            which: 0,
            button: PadButton::DPadRight,
        };
        assert_eq!(
            map_sdl_event(down, &mut repeats, t0),
            Some(InputEvent::ButtonPress(Button::Right))
        );
        assert!(repeats.due(t0 + REPEAT_DELAY / 2).is_empty());
        assert_eq!(
            repeats.due(t0 + REPEAT_DELAY),
            vec![InputEvent::ButtonRepeat(Button::Right)]
        );

        let up = Event::ControllerButtonUp {
            timestamp: 0,
            which: 0,
            button: PadButton::DPadRight,
        };
        map_sdl_event(up, &mut repeats, t0);
        assert!(repeats.due(t0 + REPEAT_DELAY * 10).is_empty());
    }

    #[test]
    fn repeat_interval_after_delay() {
        let mut repeats = RepeatTracker::new();
        let t0 = Instant::now();
        repeats.press(Button::Down, t0);
        let first = t0 + REPEAT_DELAY;
        assert_eq!(repeats.due(first).len(), 1);
        assert!(repeats.due(first + REPEAT_INTERVAL / 2).is_empty());
        assert_eq!(repeats.due(first + REPEAT_INTERVAL).len(), 1);
    }

    #[test]
    fn clear_drops_held_buttons() {
        let mut repeats = RepeatTracker::new();
        let t0 = Instant::now();
        repeats.press(Button::Up, t0);
        repeats.clear();
        assert!(repeats.due(t0 + REPEAT_DELAY).is_empty());
    }
}
