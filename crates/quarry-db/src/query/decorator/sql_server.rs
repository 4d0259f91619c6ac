//! LIMIT/OFFSET emulation for SQL Server.
//!
//! SQL Server has no `LIMIT`/`OFFSET` clause usable without an `ORDER BY`, so
//! a limited statement is rewritten into a derived table numbered with
//! `ROW_NUMBER()` and filtered by row number:
//!
//! ```text
//! SELECT <aliases> FROM (
//!     SELECT <columns>, ROW_NUMBER() OVER (ORDER BY <order | (SELECT 1)>) AS [__QUARRY_ROW_NUMBER]
//!     FROM ...
//! ) AS [QUARRY_LIMIT_OFFSET_EMULATION]
//! WHERE [QUARRY_LIMIT_OFFSET_EMULATION].[__QUARRY_ROW_NUMBER] BETWEEN <offset>+1 AND <limit>+<offset>
//! ```
//!
//! Prepared statements bind `offset`, `limit` and `offsetForSum`, in that order.

use quarry_core::QuarryError;

use crate::query::render::{RenderContext, SqlStatement};
use crate::query::select::{RenderedColumn, Select};

/// Name of the derived table wrapping the numbered rows.
pub const DERIVED_TABLE: &str = "QUARRY_LIMIT_OFFSET_EMULATION";

/// Name of the synthesized row-number column.
pub const ROW_NUMBER_COLUMN: &str = "__QUARRY_ROW_NUMBER";

/// Deterministic no-op ordering for the window when the statement has none.
const NO_OP_ORDER: &str = "(SELECT 1)";

/// Renders a [`Select`] for SQL Server.
#[derive(Debug, Clone, Copy)]
pub struct SqlServerSelectDecorator<'s> {
    select: &'s Select,
}

impl<'s> SqlServerSelectDecorator<'s> {
    /// Wraps `select` without copying it.
    pub const fn new(select: &'s Select) -> Self {
        Self { select }
    }

    /// Returns the wrapped statement.
    pub const fn subject(&self) -> &'s Select {
        self.select
    }
}

impl SqlStatement for SqlServerSelectDecorator<'_> {
    fn statement_name(&self) -> &'static str {
        "select"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        let limit = self.select.limit_value();
        let offset = self.select.offset_value();
        if limit.is_none() && offset.is_none() {
            return self.select.render_generic(ctx);
        }

        let parts = self.select.render_parts(ctx)?;
        let platform = ctx.platform();
        let derived = platform.quote_identifier(DERIVED_TABLE);
        let row_number = platform.quote_identifier(ROW_NUMBER_COLUMN);

        let outer_columns = if parts.columns.iter().any(RenderedColumn::is_star) {
            "*".to_string()
        } else {
            parts
                .columns
                .iter()
                .map(|c| c.alias.as_ref().unwrap_or(&c.sql).as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut inner = String::from("SELECT ");
        if let Some(quantifier) = parts.quantifier {
            inner.push_str(quantifier);
            inner.push(' ');
        }
        inner.push_str(&parts.column_list());
        inner.push_str(&format!(
            ", ROW_NUMBER() OVER (ORDER BY {}) AS {row_number}",
            parts.order.as_deref().unwrap_or(NO_OP_ORDER)
        ));
        inner.push_str(&parts.source_clauses());

        let offset = offset.unwrap_or(0);
        let bounds = match limit {
            Some(limit) => {
                let lower = ctx.render_count("offset", offset)?;
                let count = ctx.render_count("limit", limit)?;
                let upper_offset = ctx.render_count("offsetForSum", offset)?;
                format!("BETWEEN {lower}+1 AND {count}+{upper_offset}")
            }
            None => format!("> {}", ctx.render_count("offset", offset)?),
        };

        let sql = format!(
            "SELECT {outer_columns} FROM ( {inner} ) AS {derived} WHERE {derived}{}{row_number} {bounds}",
            platform.identifier_separator()
        );
        tracing::trace!(sql = %sql, "emulated limit/offset");
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::parameters::ParameterContainer;
    use crate::platform::Platform;
    use crate::query::expression::Expression;
    use crate::query::predicate::Predicate;
    use crate::query::select::{Quantifier, SelectColumn};
    use crate::value::Value;

    const EMULATION_TAIL_PREPARED: &str = " ) AS [QUARRY_LIMIT_OFFSET_EMULATION] WHERE [QUARRY_LIMIT_OFFSET_EMULATION].[__QUARRY_ROW_NUMBER] BETWEEN ?+1 AND ?+?";
    const EMULATION_TAIL_INLINE: &str = " ) AS [QUARRY_LIMIT_OFFSET_EMULATION] WHERE [QUARRY_LIMIT_OFFSET_EMULATION].[__QUARRY_ROW_NUMBER] BETWEEN 10+1 AND 5+10";

    fn prepared(select: &Select) -> (String, ParameterContainer) {
        let platform = Platform::sql_server();
        let mut params = ParameterContainer::new();
        let mut ctx = RenderContext::prepared(&platform, &mut params);
        let sql = SqlServerSelectDecorator::new(select).render(&mut ctx).unwrap();
        (sql, params)
    }

    fn inline(select: &Select) -> String {
        let platform = Platform::sql_server();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = RenderContext::inline(&platform, &mut diagnostics);
        SqlServerSelectDecorator::new(select).render(&mut ctx).unwrap()
    }

    fn assert_limit_params(params: &ParameterContainer) {
        let named: Vec<(&str, &Value)> = params.iter().collect();
        assert_eq!(
            named,
            vec![
                ("offset", &Value::Int(10)),
                ("limit", &Value::Int(5)),
                ("offsetForSum", &Value::Int(10)),
            ]
        );
    }

    #[test]
    fn test_ordered_columns() {
        let select = Select::new()
            .from("foo")
            .columns(["bar", "baz"])
            .order("bar")
            .limit(5)
            .offset(10);
        let head = "SELECT [bar], [baz] FROM ( SELECT [foo].[bar] AS [bar], [foo].[baz] AS [baz], ROW_NUMBER() OVER (ORDER BY [bar] ASC) AS [__QUARRY_ROW_NUMBER] FROM [foo]";

        let (sql, params) = prepared(&select);
        assert_eq!(sql, format!("{head}{EMULATION_TAIL_PREPARED}"));
        assert_limit_params(&params);
        assert_eq!(inline(&select), format!("{head}{EMULATION_TAIL_INLINE}"));
    }

    #[test]
    fn test_aliased_column_without_order() {
        let select = Select::new()
            .from("foo")
            .columns([SelectColumn::name("bar"), SelectColumn::aliased("bam", "baz")])
            .limit(5)
            .offset(10);
        let head = "SELECT [bar], [bam] FROM ( SELECT [foo].[bar] AS [bar], [foo].[baz] AS [bam], ROW_NUMBER() OVER (ORDER BY (SELECT 1)) AS [__QUARRY_ROW_NUMBER] FROM [foo]";

        let (sql, params) = prepared(&select);
        assert_eq!(sql, format!("{head}{EMULATION_TAIL_PREPARED}"));
        assert_limit_params(&params);
        assert_eq!(inline(&select), format!("{head}{EMULATION_TAIL_INLINE}"));
    }

    #[test]
    fn test_star_columns() {
        let select = Select::new().from("foo").order("bar").limit(5).offset(10);
        let head = "SELECT * FROM ( SELECT [foo].*, ROW_NUMBER() OVER (ORDER BY [bar] ASC) AS [__QUARRY_ROW_NUMBER] FROM [foo]";

        let (sql, params) = prepared(&select);
        assert_eq!(sql, format!("{head}{EMULATION_TAIL_PREPARED}"));
        assert_limit_params(&params);
        assert_eq!(inline(&select), format!("{head}{EMULATION_TAIL_INLINE}"));
    }

    #[test]
    fn test_no_limit_passes_through() {
        let select = Select::new().from("foo");
        let (sql, params) = prepared(&select);
        assert_eq!(sql, "SELECT [foo].* FROM [foo]");
        assert!(params.is_empty());
        assert_eq!(inline(&select), "SELECT [foo].* FROM [foo]");
    }

    #[test]
    fn test_expression_column_is_verbatim() {
        let select = Select::new()
            .from("foo")
            .columns([Expression::new("DISTINCT(bar) as bar")])
            .limit(5)
            .offset(10);
        let head = "SELECT DISTINCT(bar) as bar FROM ( SELECT DISTINCT(bar) as bar, ROW_NUMBER() OVER (ORDER BY (SELECT 1)) AS [__QUARRY_ROW_NUMBER] FROM [foo]";

        let (sql, params) = prepared(&select);
        assert_eq!(sql, format!("{head}{EMULATION_TAIL_PREPARED}"));
        assert_limit_params(&params);
        assert_eq!(inline(&select), format!("{head}{EMULATION_TAIL_INLINE}"));
    }

    #[test]
    fn test_where_values_bind_before_limits() {
        let select = Select::new()
            .from("foo")
            .quantifier(Quantifier::Distinct)
            .columns(["bar"])
            .and_where(Predicate::equal_to("kind", "a"))
            .limit(5)
            .offset(10);
        let (sql, params) = prepared(&select);
        assert!(sql.starts_with(
            "SELECT [bar] FROM ( SELECT DISTINCT [foo].[bar] AS [bar], ROW_NUMBER()"
        ));
        assert!(sql.contains("FROM [foo] WHERE [kind] = ? )"));
        assert_eq!(
            params.names().collect::<Vec<_>>(),
            vec!["where1", "offset", "limit", "offsetForSum"]
        );
    }

    #[test]
    fn test_limit_without_offset() {
        let select = Select::new().from("foo").limit(5);
        let sql = inline(&select);
        assert!(sql.ends_with("BETWEEN 0+1 AND 5+0"));
    }

    #[test]
    fn test_offset_without_limit() {
        let select = Select::new().from("foo").offset(10);
        let (sql, params) = prepared(&select);
        assert!(sql.ends_with("[QUARRY_LIMIT_OFFSET_EMULATION].[__QUARRY_ROW_NUMBER] > ?"));
        assert_eq!(params.get("offset"), Some(&Value::Int(10)));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_subject_is_untouched() {
        let select = Select::new().from("foo").limit(5).offset(10);
        let before = select.clone();
        let decorator = SqlServerSelectDecorator::new(&select);
        let _ = inline(decorator.subject());
        assert_eq!(select, before);
    }
}
