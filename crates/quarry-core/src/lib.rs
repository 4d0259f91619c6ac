//! # quarry-core
//!
//! Error types, settings, and logging setup shared by the quarry crates.
//! This crate has no SQL knowledge of its own.
//!
//! ## Modules
//!
//! - [`error`] - The [`QuarryError`] enum and result alias
//! - [`settings`] - Compiler settings (target platform, quoting, placeholders)
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{QuarryError, QuarryResult};
pub use settings::{ParameterStyle, Settings};
