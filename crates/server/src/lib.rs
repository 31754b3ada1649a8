//! Bankfront server: configuration, router assembly and the session commands

pub mod app;
pub mod commands;
pub mod config;
pub mod error;

pub use app::{build_app, build_state};
pub use config::Settings;
pub use error::{Result, ServerError};
