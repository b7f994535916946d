//! Foundation types and traits for presenter.
//!
//! This crate contains the platform-agnostic types shared by every presenter
//! crate: colors, input events, backend trait definitions, screen metrics,
//! and error types.

pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
