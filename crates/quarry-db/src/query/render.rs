//! Rendering expression data into SQL for one platform.
//!
//! A [`RenderContext`] is created per compilation. In prepared mode every
//! `VALUE` is handed to a [`ParameterBinder`] under a generated name and
//! replaced by the platform's placeholder. In inline mode values are escaped
//! and quoted directly into the SQL, and unsafe-quoting diagnostics are
//! collected.

use std::collections::HashMap;

use quarry_core::QuarryError;

use super::expression::{Argument, ExpressionData, ExpressionPart, Operand, ValueKind};
use super::select::Select;
use crate::diagnostics::Diagnostics;
use crate::parameters::ParameterBinder;
use crate::platform::Platform;
use crate::value::Value;

/// Anything that renders to a complete SQL statement.
pub trait SqlStatement {
    /// A short name used in tracing spans.
    fn statement_name(&self) -> &'static str {
        "statement"
    }

    /// Renders the statement.
    ///
    /// # Errors
    ///
    /// Propagates structure, binding, and quoting errors.
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError>;
}

impl<T: SqlStatement + ?Sized> SqlStatement for &T {
    fn statement_name(&self) -> &'static str {
        (**self).statement_name()
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, QuarryError> {
        (**self).render(ctx)
    }
}

enum Target<'a> {
    Prepared(&'a mut dyn ParameterBinder),
    Inline(&'a mut Diagnostics),
}

/// Per-compilation rendering state.
pub struct RenderContext<'a> {
    platform: &'a Platform,
    target: Target<'a>,
    /// Prepended to every generated parameter name inside a sub-select.
    name_prefix: String,
    counters: HashMap<String, usize>,
    subselect_count: usize,
}

impl<'a> RenderContext<'a> {
    /// A context that binds values through `binder`.
    pub fn prepared(platform: &'a Platform, binder: &'a mut dyn ParameterBinder) -> Self {
        Self::with_target(platform, Target::Prepared(binder))
    }

    /// A context that quotes values inline and records diagnostics.
    pub fn inline(platform: &'a Platform, diagnostics: &'a mut Diagnostics) -> Self {
        Self::with_target(platform, Target::Inline(diagnostics))
    }

    fn with_target(platform: &'a Platform, target: Target<'a>) -> Self {
        Self {
            platform,
            target,
            name_prefix: String::new(),
            counters: HashMap::new(),
            subselect_count: 0,
        }
    }

    /// Returns the platform.
    pub fn platform(&self) -> &'a Platform {
        self.platform
    }

    /// Returns `true` when values are bound rather than inlined.
    pub fn is_prepared(&self) -> bool {
        matches!(self.target, Target::Prepared(_))
    }

    /// Renders a value under an auto-numbered name `<prefix><n>`.
    pub fn render_value(&mut self, prefix: &str, value: &Value) -> Result<String, QuarryError> {
        if !self.is_prepared() {
            return Ok(self.inline_value(value));
        }
        let key = format!("{}{prefix}", self.name_prefix);
        let counter = self.counters.entry(key.clone()).or_insert(0);
        *counter += 1;
        let name = format!("{key}{counter}");
        self.bind(&name, value.clone())
    }

    /// Renders a value under a fixed name such as `limit`.
    pub fn render_named(&mut self, name: &str, value: Value) -> Result<String, QuarryError> {
        if !self.is_prepared() {
            return Ok(self.inline_value(&value));
        }
        let name = format!("{}{name}", self.name_prefix);
        self.bind(&name, value)
    }

    /// Renders a row count: bound under `name` when prepared, a bare integer
    /// when inline.
    pub fn render_count(&mut self, name: &str, count: u64) -> Result<String, QuarryError> {
        if !self.is_prepared() {
            return Ok(count.to_string());
        }
        let value = i64::try_from(count).map_err(|_| {
            QuarryError::InvalidStructure(format!("Row count {count} does not fit a bound integer"))
        })?;
        self.render_named(name, Value::Int(value))
    }

    fn bind(&mut self, name: &str, value: Value) -> Result<String, QuarryError> {
        let style = self.platform.parameter_style();
        match &mut self.target {
            Target::Prepared(binder) => {
                binder.bind(name, value)?;
                Ok(style.placeholder(name, binder.len()))
            }
            Target::Inline(_) => Ok(self.inline_value(&value)),
        }
    }

    fn inline_value(&mut self, value: &Value) -> String {
        match (&mut self.target, value) {
            (_, Value::Null) => "NULL".to_string(),
            (Target::Inline(diagnostics), v) => {
                self.platform.quote_value(&v.to_string(), diagnostics)
            }
            (Target::Prepared(_), v) => self.platform.quote_trusted_value(&v.to_string()),
        }
    }

    /// Renders a nested statement wrapped in parentheses. Its parameters are
    /// named with a `subselect<n>` prefix.
    pub fn render_subselect(&mut self, select: &Select) -> Result<String, QuarryError> {
        self.subselect_count += 1;
        let nested_prefix = format!("subselect{}", self.subselect_count);
        let outer_prefix = std::mem::replace(&mut self.name_prefix, nested_prefix);
        let result = select.render(self);
        self.name_prefix = outer_prefix;
        Ok(format!("({})", result?))
    }

    /// Renders every part of `data` and concatenates them.
    pub fn render_data(&mut self, data: &ExpressionData, prefix: &str) -> Result<String, QuarryError> {
        let mut sql = String::new();
        for part in data.parts() {
            sql.push_str(&self.render_part(part, prefix)?);
        }
        Ok(sql)
    }

    /// Substitutes each `%s` of the template with its rendered argument.
    pub fn render_part(&mut self, part: &ExpressionPart, prefix: &str) -> Result<String, QuarryError> {
        let template = part.template();
        let mut arguments = part.arguments().iter();
        let mut sql = String::with_capacity(template.len() + 16);
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                sql.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => sql.push('%'),
                Some('s') => {
                    let argument = arguments.next().ok_or_else(|| {
                        QuarryError::InvalidStructure(format!(
                            "Template '{template}' has more placeholders than values"
                        ))
                    })?;
                    sql.push_str(&self.render_argument(argument, prefix)?);
                }
                Some(other) => {
                    sql.push('%');
                    sql.push(other);
                }
                None => sql.push('%'),
            }
        }
        if arguments.next().is_some() {
            return Err(QuarryError::InvalidStructure(format!(
                "Template '{template}' has fewer placeholders than values"
            )));
        }
        Ok(sql)
    }

    fn render_argument(&mut self, argument: &Argument, prefix: &str) -> Result<String, QuarryError> {
        match (&argument.operand, argument.kind) {
            (Operand::Select(select), _) => self.render_subselect(select),
            (Operand::Value(value), ValueKind::Identifier) => Ok(self
                .platform
                .quote_identifier_in_fragment(&value.to_string(), &[])),
            (Operand::Value(value), ValueKind::Literal) => Ok(value.to_string()),
            (Operand::Value(value), ValueKind::Value | ValueKind::Select) => {
                self.render_value(prefix, value)
            }
        }
    }
}
