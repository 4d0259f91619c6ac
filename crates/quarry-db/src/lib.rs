//! # quarry-db
//!
//! Platform-aware SQL compilation. Statements are built as plain values
//! ([`Select`](query::Select), [`Column`](ddl::Column), predicate sets) and
//! compiled for a target [`Platform`](platform::Platform), either as a
//! prepared statement with bound parameters or as a standalone SQL string with
//! values quoted inline.
//!
//! ## Architecture
//!
//! Every statement reduces to expression data: format templates with `%s`
//! slots, each slot filled by an argument tagged as an identifier, a value, a
//! literal, or a nested SELECT. A [`RenderContext`](query::RenderContext)
//! walks that data, quoting identifiers and either binding or inlining values.
//! Platforms whose SQL differs structurally (SQL Server LIMIT/OFFSET, MySQL
//! column attributes) get a decorator that borrows the statement and renders
//! it their way.
//!
//! ## Module Overview
//!
//! - [`value`] - The platform-agnostic [`Value`](value::Value) enum
//! - [`platform`] - Platforms and the quoting engine
//! - [`diagnostics`] - Warnings collected while quoting inline
//! - [`parameters`] - The parameter binder
//! - [`query`] - Expressions, predicates, SELECT, decorators, and the compiler
//! - [`ddl`] - Column definitions and CREATE TABLE
//! - [`result_set`] - Buffered and forward-only result sets

// too_many_lines: render_parts walks every clause in one place
// result_large_err: QuarryError is used consistently across the crate
// format_push_string: format! with push_str reads clearer for SQL assembly
#![allow(clippy::too_many_lines)]
#![allow(clippy::result_large_err)]
#![allow(clippy::format_push_string)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::use_self)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::float_cmp)]

pub mod ddl;
pub mod diagnostics;
pub mod parameters;
pub mod platform;
pub mod query;
pub mod result_set;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use ddl::{Column, ColumnType, CreateTable};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use parameters::{ParameterBinder, ParameterContainer};
pub use platform::{Escaper, IdentifierChain, Platform, PlatformKind};
pub use query::{
    Argument, CompiledSql, Expression, ExpressionData, ExpressionPart, InlineSql, JoinType,
    OrderBy, Predicate, PredicateSet, Quantifier, Select, SelectColumn, SqlCompiler, SqlStatement,
    TableSource, ValueKind,
};
pub use result_set::{CursorItem, FromValue, ResultSet, Row};
pub use value::Value;
