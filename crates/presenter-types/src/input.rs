//! Platform-agnostic input event types.
//!
//! Every backend maps its native input to these enums. The core state
//! machine never sees raw platform input.

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A button went down this frame.
    ButtonPress(Button),
    /// A button is being held and the platform's key repeat fired.
    ButtonRepeat(Button),
    /// A button was released this frame.
    ButtonRelease(Button),
    /// User requested quit (window close, etc.).
    Quit,
}

/// Buttons of a handheld console pad.
///
/// `A`, `B`, `X` and `Y` are the face buttons that can carry a dialog role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    Menu,
}

impl Button {
    /// Face buttons, in the order role bindings are checked.
    pub const FACE: [Button; 4] = [Button::A, Button::B, Button::X, Button::Y];

    /// Short label drawn inside a button hint.
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::A => "A",
            Self::B => "B",
            Self::X => "X",
            Self::Y => "Y",
            Self::Start => "START",
            Self::Select => "SELECT",
            Self::Menu => "MENU",
        }
    }
}
