//! The statement compiler.
//!
//! [`SqlCompiler`] turns any [`SqlStatement`] into either a prepared
//! statement ([`CompiledSql`]: SQL with placeholders plus the bound
//! parameters) or a standalone SQL string with values quoted inline
//! ([`InlineSql`], for logging and diagnostics).
//!
//! SELECT statements are routed through the platform's decorator, so the
//! same [`Select`] compiles to `LIMIT ? OFFSET ?` on PostgreSQL and to a
//! `ROW_NUMBER()` window on SQL Server.

use quarry_core::logging::compile_span;
use quarry_core::QuarryError;

use super::predicate::PredicateSet;
use super::render::{RenderContext, SqlStatement};
use super::select::Select;
use crate::ddl::{Column, CreateTable};
use crate::diagnostics::Diagnostics;
use crate::parameters::ParameterContainer;
use crate::platform::Platform;
use crate::value::Value;

/// A prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub parameters: ParameterContainer,
}

impl CompiledSql {
    /// The bound values in placeholder order.
    pub fn positional(&self) -> Vec<Value> {
        self.parameters.positional()
    }
}

/// A statement with every value quoted inline.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineSql {
    pub sql: String,
    /// Values quoted without a native escaper.
    pub diagnostics: Diagnostics,
}

impl InlineSql {
    /// Returns `true` if every value was quoted safely.
    pub fn is_safe(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A predicate set as a standalone statement, rendered with the `where`
/// parameter prefix.
struct PredicateStatement<'p>(&'p PredicateSet);

impl SqlStatement for PredicateStatement<'_> {
    fn statement_name(&self) -> &'static str {
        "predicate"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        ctx.render_data(&self.0.expression_data()?, "where")
    }
}

/// Compiles statements for one platform.
#[derive(Debug, Clone)]
pub struct SqlCompiler {
    platform: Platform,
}

impl SqlCompiler {
    /// Creates a compiler targeting `platform`.
    pub const fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Returns the target platform.
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Compiles a statement, binding its values.
    pub fn compile(&self, statement: &dyn SqlStatement) -> Result<CompiledSql, QuarryError> {
        let span = compile_span(self.platform.name(), statement.statement_name());
        let _guard = span.enter();

        let mut parameters = ParameterContainer::new();
        let mut ctx = RenderContext::prepared(&self.platform, &mut parameters);
        let sql = statement.render(&mut ctx)?;
        tracing::debug!(sql = %sql, parameters = parameters.len(), "compiled statement");
        Ok(CompiledSql { sql, parameters })
    }

    /// Renders a statement with its values quoted inline.
    pub fn sql_string(&self, statement: &dyn SqlStatement) -> Result<InlineSql, QuarryError> {
        let span = compile_span(self.platform.name(), statement.statement_name());
        let _guard = span.enter();

        let mut diagnostics = Diagnostics::new();
        let mut ctx = RenderContext::inline(&self.platform, &mut diagnostics);
        let sql = statement.render(&mut ctx)?;
        if !diagnostics.is_empty() {
            tracing::debug!(count = diagnostics.len(), "inline values quoted without escaper");
        }
        Ok(InlineSql { sql, diagnostics })
    }

    /// Compiles a SELECT. Same as [`compile`](Self::compile); the platform's
    /// decorator applies either way.
    pub fn compile_select(&self, select: &Select) -> Result<CompiledSql, QuarryError> {
        self.compile(select)
    }

    /// Renders a SELECT inline. Same as [`sql_string`](Self::sql_string).
    pub fn select_sql_string(&self, select: &Select) -> Result<InlineSql, QuarryError> {
        self.sql_string(select)
    }

    /// Compiles a predicate set as a WHERE-clause body.
    pub fn compile_predicate(
        &self,
        predicate: impl Into<PredicateSet>,
    ) -> Result<CompiledSql, QuarryError> {
        let set = predicate.into();
        self.compile(&PredicateStatement(&set))
    }

    /// Renders a single column definition.
    pub fn compile_column(&self, column: &Column) -> Result<InlineSql, QuarryError> {
        self.sql_string(column)
    }

    /// Renders a CREATE TABLE statement.
    pub fn compile_create_table(&self, table: &CreateTable) -> Result<InlineSql, QuarryError> {
        self.sql_string(table)
    }
}
