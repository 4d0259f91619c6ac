//! DDL column definitions and `CREATE TABLE`.
//!
//! A [`Column`] compiles to a single expression part:
//!
//! | State | Template |
//! |---|---|
//! | not nullable, no default | `%s %s NOT NULL` |
//! | nullable, no default | `%s %s` |
//! | nullable, default | `%s %s DEFAULT %s` |
//!
//! The name is an identifier, the type keyword a literal and the default a
//! value. A default of SQL `NULL` is treated the same as no default.

use std::collections::HashMap;
use std::fmt;

use quarry_core::QuarryError;

use crate::platform::IdentifierChain;
use crate::query::decorator;
use crate::query::expression::{Argument, ExpressionData, ExpressionPart};
use crate::query::render::{RenderContext, SqlStatement};
use crate::value::Value;

/// SQL column types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    BigInteger,
    SmallInteger,
    Boolean,
    /// `VARCHAR(n)`
    Varchar(u32),
    /// `CHAR(n)`
    Char(u32),
    Text,
    /// `DECIMAL(precision, scale)`
    Decimal(u32, u32),
    Float,
    Date,
    Datetime,
    Time,
    Timestamp,
    Blob,
    /// Any other type keyword, emitted verbatim.
    Custom(String),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::BigInteger => write!(f, "BIGINT"),
            Self::SmallInteger => write!(f, "SMALLINT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Varchar(n) => write!(f, "VARCHAR({n})"),
            Self::Char(n) => write!(f, "CHAR({n})"),
            Self::Text => write!(f, "TEXT"),
            Self::Decimal(p, s) => write!(f, "DECIMAL({p},{s})"),
            Self::Float => write!(f, "FLOAT"),
            Self::Date => write!(f, "DATE"),
            Self::Datetime => write!(f, "DATETIME"),
            Self::Time => write!(f, "TIME"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Blob => write!(f, "BLOB"),
            Self::Custom(keyword) => write!(f, "{keyword}"),
        }
    }
}

/// A column definition.
///
/// # Examples
///
/// ```
/// use quarry_db::ddl::{Column, ColumnType};
///
/// let mut column = Column::new("title");
/// column.set_type(ColumnType::Varchar(255)).set_nullable(true).set_default("untitled");
/// let data = column.expression_data();
/// assert_eq!(data.parts()[0].template(), "%s %s DEFAULT %s");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Option<Value>,
    /// Driver-specific attributes such as `autoincrement` or `comment`.
    options: HashMap<String, Value>,
}

impl Column {
    /// An `INTEGER NOT NULL` column.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, ColumnType::Integer)
    }

    /// A `NOT NULL` column of the given type.
    pub fn with_type(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            options: HashMap::new(),
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the column.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Returns the column type.
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Changes the column type.
    pub fn set_type(&mut self, column_type: ColumnType) -> &mut Self {
        self.column_type = column_type;
        self
    }

    /// Returns `true` if the column accepts NULL.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Allows or forbids NULL.
    pub fn set_nullable(&mut self, nullable: bool) -> &mut Self {
        self.nullable = nullable;
        self
    }

    /// Returns the default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Sets the default. `Value::Null` clears it.
    pub fn set_default(&mut self, default: impl Into<Value>) -> &mut Self {
        self.default = Some(default.into()).filter(|v| !v.is_null());
        self
    }

    /// Returns the platform-specific options.
    pub fn options(&self) -> &HashMap<String, Value> {
        &self.options
    }

    /// Replaces all options.
    pub fn set_options(&mut self, options: HashMap<String, Value>) -> &mut Self {
        self.options = options;
        self
    }

    /// Sets a single platform-specific option.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The platform-neutral definition as a single expression part.
    pub fn expression_data(&self) -> ExpressionData {
        let mut template = String::from("%s %s");
        let mut arguments = vec![
            Argument::identifier(self.name.clone()),
            Argument::literal(self.column_type.to_string()),
        ];
        if !self.nullable {
            template.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            template.push_str(" DEFAULT %s");
            arguments.push(Argument::value(default.clone()));
        }
        ExpressionPart::new(template, arguments).into()
    }
}

impl SqlStatement for Column {
    fn statement_name(&self) -> &'static str {
        "column"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        let data = decorator::column_expression_data(self, ctx.platform());
        ctx.render_data(&data, "column")
    }
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    table: IdentifierChain,
    temporary: bool,
    columns: Vec<Column>,
}

impl CreateTable {
    /// A table given by name or by `[schema, name]`.
    pub fn new(table: impl Into<IdentifierChain>) -> Self {
        Self {
            table: table.into(),
            temporary: false,
            columns: Vec::new(),
        }
    }

    /// Renders `CREATE TEMPORARY TABLE` when set.
    pub fn temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    /// Appends a column definition.
    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the column definitions in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl SqlStatement for CreateTable {
    fn statement_name(&self) -> &'static str {
        "create_table"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        if self.columns.is_empty() {
            return Err(QuarryError::InvalidStructure(format!(
                "Table {} must have at least one column",
                self.table.segments().join(".")
            )));
        }
        let table = ctx.platform().quote_identifier_chain(self.table.clone());
        let mut body = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            body.push(column.render(ctx)?);
        }
        let temporary = if self.temporary { "TEMPORARY " } else { "" };
        Ok(format!("CREATE {temporary}TABLE {table} ({})", body.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::platform::Platform;
    use crate::query::expression::ValueKind;

    fn inline(platform: &Platform, statement: &dyn SqlStatement) -> Result<String, QuarryError> {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = RenderContext::inline(platform, &mut diagnostics);
        statement.render(&mut ctx)
    }

    #[test]
    fn test_setters() {
        let mut column = Column::new("x");
        column.set_name("foo").set_nullable(true).set_default("foo bar");
        assert_eq!(column.name(), "foo");
        assert!(column.is_nullable());
        assert_eq!(column.default_value(), Some(&Value::from("foo bar")));
        column.set_nullable(false);
        assert!(!column.is_nullable());
    }

    #[test]
    fn test_options() {
        let mut column = Column::new("id");
        column.set_options(HashMap::from([("autoincrement".to_string(), Value::Bool(true))]));
        assert_eq!(column.options().get("autoincrement"), Some(&Value::Bool(true)));
        column.set_option("primary", true);
        assert_eq!(column.options().len(), 2);
    }

    #[test]
    fn test_expression_data() {
        let mut column = Column::new("foo");
        let data = column.expression_data();
        let part = &data.parts()[0];
        assert_eq!(data.len(), 1);
        assert_eq!(part.template(), "%s %s NOT NULL");
        assert_eq!(part.kinds(), vec![ValueKind::Identifier, ValueKind::Literal]);
        assert_eq!(part.arguments()[0].as_value(), Some(&Value::from("foo")));
        assert_eq!(part.arguments()[1].as_value(), Some(&Value::from("INTEGER")));

        column.set_nullable(true);
        assert_eq!(column.expression_data().parts()[0].template(), "%s %s");

        column.set_default("bar");
        let data = column.expression_data();
        let part = &data.parts()[0];
        assert_eq!(part.template(), "%s %s DEFAULT %s");
        assert_eq!(
            part.kinds(),
            vec![ValueKind::Identifier, ValueKind::Literal, ValueKind::Value]
        );
        assert_eq!(part.arguments()[2].as_value(), Some(&Value::from("bar")));
    }

    #[test]
    fn test_null_default_means_no_default() {
        let mut column = Column::new("foo");
        column.set_default("bar").set_default(Value::Null);
        assert_eq!(column.default_value(), None);
        assert_eq!(column.expression_data().parts()[0].template(), "%s %s NOT NULL");
    }

    #[test]
    fn test_render_column() {
        let mut column = Column::with_type("title", ColumnType::Varchar(255));
        column.set_default("n/a");
        assert_eq!(
            inline(&Platform::postgresql(), &column).unwrap(),
            r#""title" VARCHAR(255) NOT NULL DEFAULT 'n/a'"#
        );
    }

    #[test]
    fn test_create_table() {
        let mut name = Column::with_type("name", ColumnType::Text);
        name.set_nullable(true);
        let table = CreateTable::new(["app", "users"])
            .add_column(Column::new("id"))
            .add_column(name);
        assert_eq!(
            inline(&Platform::sqlite(), &table).unwrap(),
            r#"CREATE TABLE "app"."users" ("id" INTEGER NOT NULL, "name" TEXT)"#
        );

        let temp = CreateTable::new("scratch")
            .temporary(true)
            .add_column(Column::new("n"));
        assert_eq!(
            inline(&Platform::sql92(), &temp).unwrap(),
            r#"CREATE TEMPORARY TABLE "scratch" ("n" INTEGER NOT NULL)"#
        );
    }

    #[test]
    fn test_create_table_without_columns() {
        let err = inline(&Platform::sql92(), &CreateTable::new("t")).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidStructure(_)));
    }

    #[test]
    fn test_column_type_keywords() {
        assert_eq!(ColumnType::Decimal(10, 2).to_string(), "DECIMAL(10,2)");
        assert_eq!(ColumnType::BigInteger.to_string(), "BIGINT");
        assert_eq!(ColumnType::Custom("JSONB".into()).to_string(), "JSONB");
    }
}
