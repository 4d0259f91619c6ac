//! Core error types for quarry.
//!
//! Every failure the compiler can produce is a variant of [`QuarryError`].
//! Errors are surfaced synchronously to the immediate caller; compilation is
//! deterministic, so nothing in quarry retries.

use thiserror::Error;

/// The primary error type for quarry.
///
/// The variants follow the failure taxonomy of the compiler:
///
/// - unsafe operations (quoting a value list without driver-level escaping)
/// - invalid structure (a malformed statement or result row)
/// - sequencing (an operation invoked out of its required order)
/// - parameter binding and configuration failures
#[derive(Error, Debug)]
pub enum QuarryError {
    // ── Quoting ──────────────────────────────────────────────────────

    /// A value could not be quoted safely because no driver-level escaping
    /// is available.
    #[error("Unsafe quoting: {0}")]
    UnsafeQuoting(String),

    // ── Statement structure ──────────────────────────────────────────

    /// A statement, expression, or result row has an unsupported shape.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// An operation was invoked out of its required order.
    #[error("Sequencing error: {0}")]
    Sequencing(String),

    // ── Parameters ───────────────────────────────────────────────────

    /// A parameter name was bound twice during one compilation.
    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl QuarryError {
    /// Returns `true` if this error signals a missing driver-level escaping
    /// facility rather than bad input data.
    pub const fn is_unsafe_quoting(&self) -> bool {
        matches!(self, Self::UnsafeQuoting(_))
    }
}

/// A convenience type alias for `Result<T, QuarryError>`.
pub type QuarryResult<T> = Result<T, QuarryError>;
