//! presenter core framework.
//!
//! Platform-agnostic dialog engine: loads items, wraps their text into
//! lines, tracks scrolling, runs the input state machine, and orders the
//! draw calls for each frame. All I/O goes through the backend traits
//! re-exported from `presenter-types`.

// Re-exports from presenter-types (foundation types and traits).
pub use presenter_types::backend;
pub use presenter_types::color;
pub use presenter_types::config;
pub use presenter_types::error;
pub use presenter_types::input;

pub mod app_state;
pub mod exit;
pub mod image;
pub mod items;
pub mod layout;
pub mod render;
pub mod roles;
pub mod scroll;
pub mod signal;

#[cfg(test)]
pub(crate) mod test_utils;
