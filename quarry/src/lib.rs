//! # quarry
//!
//! A dialect-aware SQL statement compiler.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `quarry` for everything, or on the individual crates
//! for finer-grained control.
//!
//! ```
//! use quarry::db::{Platform, Predicate, Select, SqlCompiler};
//!
//! let select = Select::new()
//!     .from("foo")
//!     .columns(["bar"])
//!     .and_where(Predicate::equal_to("baz", 1))
//!     .limit(5)
//!     .offset(10);
//! let compiled = SqlCompiler::new(Platform::sql_server()).compile_select(&select).unwrap();
//! assert!(compiled.sql.contains("ROW_NUMBER() OVER (ORDER BY (SELECT 1))"));
//! assert_eq!(compiled.parameters.len(), 4);
//! ```

/// Error types, settings, and logging setup.
pub use quarry_core as core;

/// Platforms, quoting, statements, and the compiler.
#[cfg(feature = "db")]
pub use quarry_db as db;

// Third-party re-exports.
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

pub use quarry_core::{QuarryError, QuarryResult, Settings};
