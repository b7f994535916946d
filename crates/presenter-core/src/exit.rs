//! Process exit statuses reported to the calling script.

/// Outcome of a presenter run, encoded as the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    Success,
    Error,
    Menu,
    Start,
    Inaction,
    Action,
    Cancel,
    Confirm,
    ParseError,
    SerializeError,
    Timeout,
    KeyboardInterrupt,
    Sigterm,
}

impl ExitCode {
    /// Numeric process exit status.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Error => 1,
            Self::Menu => 3,
            Self::Start => 6,
            Self::Inaction => 11,
            Self::Action => 12,
            Self::Cancel => 13,
            Self::Confirm => 14,
            Self::ParseError => 20,
            Self::SerializeError => 21,
            Self::Timeout => 124,
            Self::KeyboardInterrupt => 130,
            Self::Sigterm => 143,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}
