//! Statement building and compilation.
//!
//! - [`expression`] - Template/argument triples and raw expressions
//! - [`predicate`] - WHERE/HAVING predicates and predicate sets
//! - [`select`] - The SELECT statement model
//! - [`render`] - Rendering expression data for one platform
//! - [`decorator`] - Platform-specific statement rewrites
//! - [`compiler`] - Prepared and inline compilation entry points
//!
//! # Examples
//!
//! ```
//! use quarry_db::platform::Platform;
//! use quarry_db::query::{Argument, Predicate, PredicateSet, Select, SqlCompiler};
//!
//! let filter = PredicateSet::new()
//!     .equal_to("status", "open")
//!     .nest(PredicateSet::new().is_null("closed_at").or(Predicate::greater_than("priority", 3)))
//!     .expression("age > ?", vec![Argument::value(21)]);
//!
//! let select = Select::new().from("tickets").columns(["id"]).and_where(Predicate::Set(filter));
//! let compiled = SqlCompiler::new(Platform::sqlite()).compile_select(&select).unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     r#"SELECT "tickets"."id" AS "id" FROM "tickets" WHERE ("status" = ? AND ("closed_at" IS NULL OR "priority" > ?) AND age > ?)"#
//! );
//! assert_eq!(compiled.parameters.len(), 3);
//! ```

pub mod compiler;
pub mod decorator;
pub mod expression;
pub mod predicate;
pub mod render;
pub mod select;

pub use compiler::{CompiledSql, InlineSql, SqlCompiler};
pub use expression::{Argument, Expression, ExpressionData, ExpressionPart, Operand, ValueKind};
pub use predicate::{Combination, ComparisonOp, In, Predicate, PredicateSet, ValueSet};
pub use render::{RenderContext, SqlStatement};
pub use select::{
    Join, JoinCondition, JoinType, OrderBy, Quantifier, Select, SelectColumn, SelectPart,
    TableSource,
};
