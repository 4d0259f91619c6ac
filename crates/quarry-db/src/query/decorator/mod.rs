//! Platform-specific statement rewrites.
//!
//! A decorator borrows a statement and renders it differently for one
//! platform. [`decorate`] picks the right one; platforms without a rewrite
//! render the statement as is. Rendering a [`Select`] always goes through
//! [`decorate`], so top-level statements and sub-selects follow one rule.

pub mod mysql;
pub mod sql_server;

use quarry_core::QuarryError;

use crate::ddl::Column;
use crate::platform::{Platform, PlatformKind};
use crate::query::expression::ExpressionData;
use crate::query::render::{RenderContext, SqlStatement};
use crate::query::select::Select;

pub use mysql::{MySqlColumnDecorator, MySqlSelectDecorator};
pub use sql_server::SqlServerSelectDecorator;

/// Wraps `select` in the decorator registered for `platform`.
pub fn decorate<'s>(select: &'s Select, platform: &Platform) -> Box<dyn SqlStatement + 's> {
    match platform.kind() {
        PlatformKind::SqlServer => Box::new(SqlServerSelectDecorator::new(select)),
        PlatformKind::MySql => Box::new(MySqlSelectDecorator::new(select)),
        _ => Box::new(GenericSelect(select)),
    }
}

/// A SELECT rendered without platform rewrites.
struct GenericSelect<'s>(&'s Select);

impl SqlStatement for GenericSelect<'_> {
    fn statement_name(&self) -> &'static str {
        "select"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        self.0.render_generic(ctx)
    }
}

/// The column definition as `platform` writes it.
pub fn column_expression_data(column: &Column, platform: &Platform) -> ExpressionData {
    match platform.kind() {
        PlatformKind::MySql => MySqlColumnDecorator::new(column).expression_data(),
        _ => column.expression_data(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::query::predicate::{In, Predicate};

    fn render(platform: &Platform, select: &Select) -> String {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = RenderContext::inline(platform, &mut diagnostics);
        decorate(select, platform).render(&mut ctx).unwrap()
    }

    #[test]
    fn test_dispatch_by_platform() {
        let select = Select::new().from("foo").limit(5).offset(10);
        assert_eq!(
            render(&Platform::postgresql(), &select),
            r#"SELECT "foo".* FROM "foo" LIMIT 5 OFFSET 10"#
        );
        assert_eq!(
            render(&Platform::mysql(), &select),
            "SELECT `foo`.* FROM `foo` LIMIT 5 OFFSET 10"
        );
        assert!(render(&Platform::sql_server(), &select).contains("ROW_NUMBER()"));
    }

    #[test]
    fn test_select_render_is_decorated() {
        let select = Select::new().from("foo").offset(3);
        let platform = Platform::mysql();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = RenderContext::inline(&platform, &mut diagnostics);
        assert_eq!(
            select.render(&mut ctx).unwrap(),
            "SELECT `foo`.* FROM `foo` LIMIT 18446744073709551615 OFFSET 3"
        );
    }

    #[test]
    fn test_subselect_is_decorated() {
        let inner = Select::new().from("orders").columns(["customer_id"]).limit(1);
        let outer = Select::new()
            .from("customers")
            .and_where(Predicate::In(In::subselect("id", inner)));
        let sql = render(&Platform::sql_server(), &outer);
        assert!(sql.starts_with(
            "SELECT [customers].* FROM [customers] WHERE [id] IN (SELECT [customer_id] FROM ("
        ));
        assert!(sql.ends_with("[__QUARRY_ROW_NUMBER] BETWEEN 0+1 AND 1+0)"));
    }

    #[test]
    fn test_column_dispatch() {
        let mut column = Column::new("id");
        column.set_option("autoincrement", true);
        let generic = column_expression_data(&column, &Platform::sqlite());
        let mysql = column_expression_data(&column, &Platform::mysql());
        assert_eq!(generic.parts()[0].template(), "%s %s NOT NULL");
        assert_eq!(mysql.parts()[0].template(), "%s %s NOT NULL AUTO_INCREMENT");
    }
}
