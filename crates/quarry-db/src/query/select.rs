//! The SELECT statement model.
//!
//! [`Select`] is a by-value builder. It holds clauses only; rendering goes
//! through a [`RenderContext`](super::render::RenderContext), and platform
//! rewrites (see [`decorator`](super::decorator)) read the same builder without
//! modifying it.
//!
//! # Examples
//!
//! ```
//! use quarry_db::platform::Platform;
//! use quarry_db::query::{Predicate, Select, SqlCompiler};
//!
//! let select = Select::new()
//!     .from("users")
//!     .columns(["id", "name"])
//!     .and_where(Predicate::equal_to("active", true))
//!     .order("name")
//!     .limit(10);
//!
//! let compiled = SqlCompiler::new(Platform::postgresql()).compile_select(&select).unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     r#"SELECT "users"."id" AS "id", "users"."name" AS "name" FROM "users" WHERE "active" = $1 ORDER BY "name" ASC LIMIT $2"#
//! );
//! ```

use quarry_core::QuarryError;

use super::decorator;
use super::expression::Expression;
use super::predicate::{Predicate, PredicateSet};
use super::render::{RenderContext, SqlStatement};
use crate::platform::Platform;

/// Words left unquoted in a raw JOIN ... ON fragment.
const JOIN_SAFE_WORDS: [&str; 8] = ["=", "AND", "OR", "(", ")", "BETWEEN", "<", ">"];

/// The source of rows: a table or an aliased sub-select.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A table, optionally schema-qualified and aliased.
    Table {
        schema: Option<String>,
        name: String,
        alias: Option<String>,
    },
    /// A sub-select. Derived tables always need an alias.
    Subselect { select: Box<Select>, alias: String },
}

impl TableSource {
    /// A plain table.
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    /// A schema-qualified table.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Table {
            schema: Some(schema.into()),
            name: name.into(),
            alias: None,
        }
    }

    /// A sub-select used as a derived table.
    pub fn subselect(select: Select, alias: impl Into<String>) -> Self {
        Self::Subselect {
            select: Box::new(select),
            alias: alias.into(),
        }
    }

    /// Sets the alias.
    pub fn aliased(self, new_alias: impl Into<String>) -> Self {
        match self {
            Self::Table { schema, name, .. } => Self::Table {
                schema,
                name,
                alias: Some(new_alias.into()),
            },
            Self::Subselect { select, .. } => Self::Subselect {
                select,
                alias: new_alias.into(),
            },
        }
    }

    /// The quoted name columns are qualified with, including the separator.
    fn column_prefix(&self, platform: &Platform) -> String {
        let qualifier = match self {
            Self::Table {
                alias: Some(alias), ..
            }
            | Self::Subselect { alias, .. } => platform.quote_identifier(alias),
            Self::Table {
                schema: Some(schema),
                name,
                alias: None,
            } => platform.quote_identifier_chain(vec![schema.as_str(), name.as_str()]),
            Self::Table {
                schema: None,
                name,
                alias: None,
            } => platform.quote_identifier(name),
        };
        format!("{qualifier}{}", platform.identifier_separator())
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        let platform = ctx.platform();
        match self {
            Self::Table {
                schema,
                name,
                alias,
            } => {
                let mut sql = match schema {
                    Some(schema) => {
                        platform.quote_identifier_chain(vec![schema.as_str(), name.as_str()])
                    }
                    None => platform.quote_identifier(name),
                };
                if let Some(alias) = alias {
                    sql.push_str(" AS ");
                    sql.push_str(&platform.quote_identifier(alias));
                }
                Ok(sql)
            }
            Self::Subselect { select, alias } => {
                let inner = ctx.render_subselect(select)?;
                Ok(format!("{inner} AS {}", platform.quote_identifier(alias)))
            }
        }
    }
}

impl From<&str> for TableSource {
    fn from(name: &str) -> Self {
        Self::table(name)
    }
}

impl From<String> for TableSource {
    fn from(name: String) -> Self {
        Self::table(name)
    }
}

/// An entry of the column list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// A column name, `*`, or a dotted path, with an optional alias.
    Name { name: String, alias: Option<String> },
    /// A raw expression, with an optional alias.
    Expression {
        expression: Expression,
        alias: Option<String>,
    },
}

impl SelectColumn {
    /// All columns.
    pub fn star() -> Self {
        Self::name("*")
    }

    /// A column without alias.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            alias: None,
        }
    }

    /// `name AS alias`
    pub fn aliased(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// `expression AS alias`
    pub fn expression_as(alias: impl Into<String>, expression: Expression) -> Self {
        Self::Expression {
            expression,
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for SelectColumn {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for SelectColumn {
    fn from(name: String) -> Self {
        Self::name(name)
    }
}

impl From<Expression> for SelectColumn {
    fn from(expression: Expression) -> Self {
        Self::Expression {
            expression,
            alias: None,
        }
    }
}

/// SQL JOIN types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Outer,
    Left,
    Right,
    LeftOuter,
    RightOuter,
}

impl JoinType {
    /// Returns the SQL keyword preceding `JOIN`.
    pub const fn sql_keyword(&self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Outer => "OUTER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::LeftOuter => "LEFT OUTER",
            Self::RightOuter => "RIGHT OUTER",
        }
    }
}

/// The ON condition of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    /// A raw fragment such as `foo.id = bar.foo_id`; identifiers get quoted.
    Fragment(String),
    /// A predicate set whose values are bound.
    Predicate(PredicateSet),
}

impl From<&str> for JoinCondition {
    fn from(fragment: &str) -> Self {
        Self::Fragment(fragment.to_string())
    }
}

impl From<PredicateSet> for JoinCondition {
    fn from(set: PredicateSet) -> Self {
        Self::Predicate(set)
    }
}

impl From<Predicate> for JoinCondition {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate.into())
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub source: TableSource,
    pub on: JoinCondition,
    /// Columns of the joined table added to the projection.
    pub columns: Vec<SelectColumn>,
    pub join_type: JoinType,
}

/// `DISTINCT` or `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Distinct,
    All,
}

impl Quantifier {
    /// Returns the SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
        }
    }
}

/// A column ordering direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column or fragment to order by.
    pub column: String,
    /// Whether to sort in descending order.
    pub descending: bool,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Creates a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Parses `"col"`, `"col DESC"` or `"a DESC, b"` into orderings.
    /// Any direction other than `DESC` means ascending.
    pub fn parse(clause: &str) -> Vec<Self> {
        clause
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|item| match item.split_once(char::is_whitespace) {
                Some((column, direction)) => Self {
                    column: column.to_string(),
                    descending: direction.trim().eq_ignore_ascii_case("DESC"),
                },
                None => Self::asc(item),
            })
            .collect()
    }
}

/// Clauses that [`Select::reset`] can clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPart {
    Table,
    Quantifier,
    Columns,
    Joins,
    Where,
    Group,
    Having,
    Order,
    Limit,
    Offset,
}

/// A SELECT statement under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: Option<TableSource>,
    quantifier: Option<Quantifier>,
    columns: Vec<SelectColumn>,
    prefix_columns_with_table: bool,
    joins: Vec<Join>,
    where_set: PredicateSet,
    group: Vec<String>,
    having: PredicateSet,
    order: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    /// Creates an empty statement selecting `*`.
    pub fn new() -> Self {
        Self {
            table: None,
            quantifier: None,
            columns: vec![SelectColumn::star()],
            prefix_columns_with_table: true,
            joins: Vec::new(),
            where_set: PredicateSet::new(),
            group: Vec::new(),
            having: PredicateSet::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ── Builders ─────────────────────────────────────────────────────

    /// Sets the table or sub-select to read from.
    pub fn from(mut self, table: impl Into<TableSource>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets `DISTINCT` or `ALL`.
    pub fn quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = Some(quantifier);
        self
    }

    /// Replaces the column list.
    pub fn columns<C: Into<SelectColumn>>(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Controls whether plain column names are qualified with the table.
    pub fn prefix_columns_with_table(mut self, prefix: bool) -> Self {
        self.prefix_columns_with_table = prefix;
        self
    }

    /// Adds an INNER JOIN selecting all columns of the joined table.
    pub fn join(self, source: impl Into<TableSource>, on: impl Into<JoinCondition>) -> Self {
        self.join_with(source, on, [SelectColumn::star()], JoinType::Inner)
    }

    /// Adds a join with explicit columns and type.
    pub fn join_with<C: Into<SelectColumn>>(
        mut self,
        source: impl Into<TableSource>,
        on: impl Into<JoinCondition>,
        columns: impl IntoIterator<Item = C>,
        join_type: JoinType,
    ) -> Self {
        self.joins.push(Join {
            source: source.into(),
            on: on.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            join_type,
        });
        self
    }

    /// Adds a WHERE condition joined with AND.
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.where_set = self.where_set.and(predicate);
        self
    }

    /// Adds a WHERE condition joined with OR.
    pub fn or_where(mut self, predicate: Predicate) -> Self {
        self.where_set = self.where_set.or(predicate);
        self
    }

    /// Adds a HAVING condition joined with AND.
    pub fn and_having(mut self, predicate: Predicate) -> Self {
        self.having = self.having.and(predicate);
        self
    }

    /// Adds a HAVING condition joined with OR.
    pub fn or_having(mut self, predicate: Predicate) -> Self {
        self.having = self.having.or(predicate);
        self
    }

    /// Appends GROUP BY columns.
    pub fn group<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.group.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Adds orderings parsed from `"col"`, `"col DESC"` or `"a DESC, b"`.
    pub fn order(mut self, clause: &str) -> Self {
        self.order.extend(OrderBy::parse(clause));
        self
    }

    /// Appends a single ordering.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Caps the number of rows returned.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many rows before returning any.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Clears one clause back to its initial state.
    pub fn reset(mut self, part: SelectPart) -> Self {
        match part {
            SelectPart::Table => self.table = None,
            SelectPart::Quantifier => self.quantifier = None,
            SelectPart::Columns => self.columns = vec![SelectColumn::star()],
            SelectPart::Joins => self.joins.clear(),
            SelectPart::Where => self.where_set = PredicateSet::new(),
            SelectPart::Group => self.group.clear(),
            SelectPart::Having => self.having = PredicateSet::new(),
            SelectPart::Order => self.order.clear(),
            SelectPart::Limit => self.limit = None,
            SelectPart::Offset => self.offset = None,
        }
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Returns the FROM source, if set.
    pub fn table_source(&self) -> Option<&TableSource> {
        self.table.as_ref()
    }

    /// Returns the projected columns.
    pub fn column_list(&self) -> &[SelectColumn] {
        &self.columns
    }

    /// Returns the joins in the order they were added.
    pub fn join_list(&self) -> &[Join] {
        &self.joins
    }

    /// Returns the WHERE conditions.
    pub fn where_set(&self) -> &PredicateSet {
        &self.where_set
    }

    /// Returns the HAVING conditions.
    pub fn having_set(&self) -> &PredicateSet {
        &self.having
    }

    /// Returns the orderings.
    pub fn order_list(&self) -> &[OrderBy] {
        &self.order
    }

    /// Returns the row limit, if set.
    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the row offset, if set.
    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Renders every clause except LIMIT and OFFSET, binding values in
    /// clause order.
    pub fn render_parts(&self, ctx: &mut RenderContext<'_>) -> Result<SelectParts, QuarryError> {
        let platform = ctx.platform();
        let prefix = match (&self.table, self.prefix_columns_with_table) {
            (Some(table), true) => table.column_prefix(platform),
            _ => String::new(),
        };

        let mut expression_count = 0;
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            columns.push(render_column(column, &prefix, ctx, &mut expression_count)?);
        }
        for join in &self.joins {
            let join_prefix = join.source.column_prefix(platform);
            for column in &join.columns {
                columns.push(render_column(
                    column,
                    &join_prefix,
                    ctx,
                    &mut expression_count,
                )?);
            }
        }

        let table = match &self.table {
            Some(table) => Some(table.render(ctx)?),
            None => None,
        };

        let mut joins = String::new();
        for join in &self.joins {
            let target = join.source.render(ctx)?;
            let on = match &join.on {
                JoinCondition::Fragment(fragment) => {
                    platform.quote_identifier_in_fragment(fragment, &JOIN_SAFE_WORDS)
                }
                JoinCondition::Predicate(set) => ctx.render_data(&set.expression_data()?, "join")?,
            };
            joins.push_str(&format!(
                " {} JOIN {target} ON {on}",
                join.join_type.sql_keyword()
            ));
        }

        let where_sql = if self.where_set.is_empty() {
            None
        } else {
            Some(ctx.render_data(&self.where_set.expression_data()?, "where")?)
        };

        let group = (!self.group.is_empty()).then(|| {
            self.group
                .iter()
                .map(|c| platform.quote_identifier_in_fragment(c, &[]))
                .collect::<Vec<_>>()
                .join(", ")
        });

        let having = if self.having.is_empty() {
            None
        } else {
            Some(ctx.render_data(&self.having.expression_data()?, "having")?)
        };

        let order = (!self.order.is_empty()).then(|| {
            self.order
                .iter()
                .map(|o| {
                    let direction = if o.descending { "DESC" } else { "ASC" };
                    format!(
                        "{} {direction}",
                        platform.quote_identifier_in_fragment(&o.column, &[])
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        });

        Ok(SelectParts {
            quantifier: self.quantifier.map(Quantifier::as_sql),
            columns,
            table,
            joins,
            where_sql,
            group,
            having,
            order,
        })
    }

    /// Renders the statement with plain `LIMIT`/`OFFSET` clauses, ignoring
    /// any platform rewrite.
    pub(crate) fn render_generic(
        &self,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, QuarryError> {
        let mut sql = self.render_parts(ctx)?.assemble();
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&ctx.render_count("limit", limit)?);
        }
        if let Some(offset) = self.offset {
            sql.push_str(" OFFSET ");
            sql.push_str(&ctx.render_count("offset", offset)?);
        }
        Ok(sql)
    }
}

impl SqlStatement for Select {
    fn statement_name(&self) -> &'static str {
        "select"
    }

    /// Renders through the context platform's decorator.
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        decorator::decorate(self, ctx.platform()).render(ctx)
    }
}

fn contains_as(sql: &str) -> bool {
    sql.to_lowercase().contains(" as ")
}

fn render_column(
    column: &SelectColumn,
    prefix: &str,
    ctx: &mut RenderContext<'_>,
    expression_count: &mut usize,
) -> Result<RenderedColumn, QuarryError> {
    let platform = ctx.platform();
    match column {
        SelectColumn::Name { name, .. } if name == "*" => Ok(RenderedColumn {
            sql: format!("{prefix}*"),
            alias: None,
        }),
        SelectColumn::Name { name, alias } => {
            let sql = if name.contains(platform.identifier_separator()) {
                platform.quote_identifier_in_fragment(name, &[])
            } else {
                format!("{prefix}{}", platform.quote_identifier(name))
            };
            let alias = match alias {
                Some(alias) => Some(platform.quote_identifier(alias)),
                None if contains_as(name) => None,
                None => Some(platform.quote_identifier(name)),
            };
            Ok(RenderedColumn { sql, alias })
        }
        SelectColumn::Expression { expression, alias } => {
            let sql = ctx.render_data(&expression.expression_data()?, "column")?;
            let alias = match alias {
                Some(alias) => Some(platform.quote_identifier(alias)),
                None if contains_as(&sql) => None,
                None => {
                    *expression_count += 1;
                    Some(platform.quote_identifier(&format!("Expression{expression_count}")))
                }
            };
            Ok(RenderedColumn { sql, alias })
        }
    }
}

/// A rendered projection entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedColumn {
    /// The column expression, already quoted.
    pub sql: String,
    /// The quoted alias, if any.
    pub alias: Option<String>,
}

impl RenderedColumn {
    /// Returns `true` for `*` and `table.*`.
    pub fn is_star(&self) -> bool {
        self.sql.ends_with('*')
    }

    /// Renders `sql AS alias`, or just `sql`.
    pub fn to_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.sql),
            None => self.sql.clone(),
        }
    }
}

/// The rendered clauses of a [`Select`], before LIMIT and OFFSET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectParts {
    pub quantifier: Option<&'static str>,
    pub columns: Vec<RenderedColumn>,
    pub table: Option<String>,
    /// Every join, each with a leading space.
    pub joins: String,
    pub where_sql: Option<String>,
    pub group: Option<String>,
    pub having: Option<String>,
    pub order: Option<String>,
}

impl SelectParts {
    /// The comma-separated projection.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(RenderedColumn::to_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `FROM ... JOIN ... WHERE ... GROUP BY ... HAVING ...`, with a leading
    /// space, or an empty string without a table.
    pub fn source_clauses(&self) -> String {
        let mut sql = String::new();
        if let Some(table) = &self.table {
            sql.push_str(" FROM ");
            sql.push_str(table);
        }
        sql.push_str(&self.joins);
        if let Some(where_sql) = &self.where_sql {
            sql.push_str(" WHERE ");
            sql.push_str(where_sql);
        }
        if let Some(group) = &self.group {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }
        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }
        sql
    }

    /// The full statement without LIMIT and OFFSET.
    pub fn assemble(&self) -> String {
        let mut sql = String::from("SELECT ");
        if let Some(quantifier) = self.quantifier {
            sql.push_str(quantifier);
            sql.push(' ');
        }
        sql.push_str(&self.column_list());
        sql.push_str(&self.source_clauses());
        if let Some(order) = &self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        sql
    }
}
