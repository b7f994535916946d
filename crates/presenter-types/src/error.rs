//! Error types for presenter.

/// Errors produced by the presenter crates.
#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    /// The item source could not be read or is not a valid item document.
    #[error("load error: {0}")]
    Load(String),

    /// Invalid command line configuration (button roles, alignment, ...).
    #[error("config error: {0}")]
    Config(String),

    /// A required resource such as a font could not be opened.
    #[error("resource error: {0}")]
    Resource(String),

    #[error("backend error: {0}")]
    Backend(String),

    /// An image could not be decoded. Never fatal at draw time.
    #[error("image error: {0}")]
    Image(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PresenterError {
    /// Whether this error was raised while loading the item source.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Json(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PresenterError>;
