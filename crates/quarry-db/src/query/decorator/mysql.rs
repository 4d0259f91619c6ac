//! MySQL statement rewrites.

use std::collections::HashMap;

use quarry_core::QuarryError;

use crate::ddl::Column;
use crate::query::expression::{Argument, ExpressionData, ExpressionPart};
use crate::query::render::{RenderContext, SqlStatement};
use crate::query::select::Select;
use crate::value::Value;

/// MySQL accepts no OFFSET without a LIMIT; the largest `BIGINT UNSIGNED`
/// stands in for "all remaining rows".
pub const MAX_LIMIT: &str = "18446744073709551615";

/// Renders a [`Select`] for MySQL.
#[derive(Debug, Clone, Copy)]
pub struct MySqlSelectDecorator<'s> {
    select: &'s Select,
}

impl<'s> MySqlSelectDecorator<'s> {
    /// Wraps `select` without copying it.
    pub const fn new(select: &'s Select) -> Self {
        Self { select }
    }

    /// Returns the wrapped statement.
    pub const fn subject(&self) -> &'s Select {
        self.select
    }
}

impl SqlStatement for MySqlSelectDecorator<'_> {
    fn statement_name(&self) -> &'static str {
        "select"
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        let mut sql = self.select.render_parts(ctx)?.assemble();
        match (self.select.limit_value(), self.select.offset_value()) {
            (Some(limit), _) => {
                sql.push_str(" LIMIT ");
                sql.push_str(&ctx.render_count("limit", limit)?);
            }
            (None, Some(_)) => {
                sql.push_str(" LIMIT ");
                sql.push_str(MAX_LIMIT);
            }
            (None, None) => {}
        }
        if let Some(offset) = self.select.offset_value() {
            sql.push_str(" OFFSET ");
            sql.push_str(&ctx.render_count("offset", offset)?);
        }
        Ok(sql)
    }
}

/// Adds MySQL column attributes from a [`Column`]'s options.
///
/// | Option | Clause |
/// |---|---|
/// | `unsigned` | `UNSIGNED` |
/// | `zerofill` | `ZEROFILL` |
/// | `identity`, `serial`, `autoincrement` | `AUTO_INCREMENT` |
/// | `comment` | `COMMENT %s` |
/// | `columnformat`, `format` | `COLUMN_FORMAT ...` |
/// | `storage` | `STORAGE ...` |
/// | `primary`, `primarykey` | `PRIMARY KEY` |
///
/// Option names match case-insensitively, ignoring `_`, `-` and spaces.
#[derive(Debug, Clone, Copy)]
pub struct MySqlColumnDecorator<'c> {
    column: &'c Column,
}

impl<'c> MySqlColumnDecorator<'c> {
    /// Wraps `column` without copying it.
    pub const fn new(column: &'c Column) -> Self {
        Self { column }
    }

    /// The column definition with MySQL attributes appended.
    pub fn expression_data(&self) -> ExpressionData {
        let column = self.column;
        let options = normalized_options(column.options());
        let enabled = |keys: &[&str]| {
            keys.iter()
                .any(|k| options.get(*k).is_some_and(is_truthy))
        };

        let mut template = String::from("%s %s");
        let mut arguments = vec![
            Argument::identifier(column.name()),
            Argument::literal(column.column_type().to_string()),
        ];

        if enabled(&["unsigned"]) {
            template.push_str(" UNSIGNED");
        }
        if enabled(&["zerofill"]) {
            template.push_str(" ZEROFILL");
        }
        if !column.is_nullable() {
            template.push_str(" NOT NULL");
        }
        if let Some(default) = column.default_value() {
            template.push_str(" DEFAULT %s");
            arguments.push(Argument::value(default.clone()));
        }
        if enabled(&["identity", "serial", "autoincrement"]) {
            template.push_str(" AUTO_INCREMENT");
        }
        if let Some(comment) = options.get("comment").filter(|v| is_truthy(v)) {
            template.push_str(" COMMENT %s");
            arguments.push(Argument::value((*comment).clone()));
        }
        let settings: [(&[&str], &str); 2] = [
            (&["columnformat", "format"], "COLUMN_FORMAT"),
            (&["storage"], "STORAGE"),
        ];
        for (keys, clause) in settings {
            let setting = keys
                .iter()
                .find_map(|k| options.get(*k).and_then(|v| v.as_str()))
                .filter(|s| !s.is_empty());
            if let Some(setting) = setting {
                template.push_str(&format!(" {clause} %s"));
                arguments.push(Argument::literal(setting.to_uppercase()));
            }
        }
        if enabled(&["primary", "primarykey"]) {
            template.push_str(" PRIMARY KEY");
        }

        ExpressionPart::new(template, arguments).into()
    }
}

fn normalized_options(options: &HashMap<String, Value>) -> HashMap<String, &Value> {
    options
        .iter()
        .map(|(key, value)| {
            let key: String = key
                .chars()
                .filter(|c| !matches!(c, '_' | '-' | ' '))
                .collect::<String>()
                .to_lowercase();
            (key, value)
        })
        .collect()
}

fn is_truthy(value: &&Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Bytes(b) => !b.is_empty(),
        Value::List(items) => !items.is_empty(),
        _ => true,
    }
}
