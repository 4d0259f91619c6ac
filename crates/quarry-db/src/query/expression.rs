//! The intermediate representation every SQL-producing construct compiles to.
//!
//! An [`ExpressionPart`] is a template with `%s` placeholders plus one
//! [`Argument`] per placeholder. Each argument carries a [`ValueKind`] that
//! tells the renderer how to emit it: quoted as an identifier, bound as a
//! parameter, inserted verbatim, or compiled as a nested statement. A literal
//! percent sign in a template is written `%%`.
//!
//! Predicates, select columns, DDL columns and raw [`Expression`]s all produce
//! [`ExpressionData`]; only the renderer knows about platforms.

use quarry_core::QuarryError;

use super::select::Select;
use crate::value::Value;

/// How a value inside expression data is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Quoted as a column or table name.
    Identifier,
    /// Bound as a parameter, or escaped and quoted when rendered inline.
    Value,
    /// Inserted verbatim. The caller vouches for its safety.
    Literal,
    /// A nested statement, compiled recursively and wrapped in parentheses.
    Select,
}

/// The payload of an [`Argument`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A scalar value, or the text of an identifier or literal.
    Value(Value),
    /// A nested SELECT statement.
    Select(Box<Select>),
}

/// One value of an expression together with its [`ValueKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The value itself.
    pub operand: Operand,
    /// How the value is rendered.
    pub kind: ValueKind,
}

impl Argument {
    /// An identifier such as `foo` or `foo.bar`.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            operand: Operand::Value(Value::String(name.into())),
            kind: ValueKind::Identifier,
        }
    }

    /// A value to bind or escape.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            operand: Operand::Value(value.into()),
            kind: ValueKind::Value,
        }
    }

    /// Trusted SQL text inserted as-is.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            operand: Operand::Value(Value::String(text.into())),
            kind: ValueKind::Literal,
        }
    }

    /// A nested statement.
    pub fn select(select: Select) -> Self {
        Self {
            operand: Operand::Select(Box::new(select)),
            kind: ValueKind::Select,
        }
    }

    /// Re-tags a scalar with an explicit kind.
    pub fn with_kind(value: impl Into<Value>, kind: ValueKind) -> Self {
        Self {
            operand: Operand::Value(value.into()),
            kind,
        }
    }

    /// Returns the scalar payload, if this argument is not a sub-select.
    pub fn as_value(&self) -> Option<&Value> {
        match &self.operand {
            Operand::Value(v) => Some(v),
            Operand::Select(_) => None,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self {
            operand: Operand::Value(value),
            kind: ValueKind::Value,
        }
    }
}

impl From<Select> for Argument {
    fn from(select: Select) -> Self {
        Self::select(select)
    }
}

/// A single `(template, values, kinds)` triple.
///
/// Values and kinds are stored together, so their counts always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionPart {
    template: String,
    arguments: Vec<Argument>,
}

impl ExpressionPart {
    /// Creates a part from a template and its arguments.
    ///
    /// The number of `%s` placeholders must equal the number of arguments.
    pub fn new(template: impl Into<String>, arguments: Vec<Argument>) -> Self {
        let template = template.into();
        debug_assert_eq!(
            placeholder_count(&template),
            arguments.len(),
            "placeholder count mismatch in {template:?}"
        );
        Self {
            template,
            arguments,
        }
    }

    /// A part that is plain text, with any `%` escaped.
    pub fn text(text: &str) -> Self {
        Self {
            template: text.replace('%', "%%"),
            arguments: Vec::new(),
        }
    }

    /// Returns the template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the arguments in placeholder order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Returns the operands in placeholder order.
    pub fn values(&self) -> Vec<&Operand> {
        self.arguments.iter().map(|a| &a.operand).collect()
    }

    /// Returns the kinds in placeholder order.
    pub fn kinds(&self) -> Vec<ValueKind> {
        self.arguments.iter().map(|a| a.kind).collect()
    }
}

/// An ordered sequence of [`ExpressionPart`]s, rendered by concatenation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionData {
    parts: Vec<ExpressionPart>,
}

impl ExpressionData {
    /// Creates empty expression data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a part.
    pub fn push(&mut self, part: ExpressionPart) {
        self.parts.push(part);
    }

    /// Appends all parts of `other`.
    pub fn extend(&mut self, other: Self) {
        self.parts.extend(other.parts);
    }

    /// Returns the parts in order.
    pub fn parts(&self) -> &[ExpressionPart] {
        &self.parts
    }

    /// Returns `true` if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

impl From<ExpressionPart> for ExpressionData {
    fn from(part: ExpressionPart) -> Self {
        Self { parts: vec![part] }
    }
}

/// Raw SQL with `?` placeholders and ordered arguments.
///
/// This is the escape hatch for anything the predicate and statement models
/// do not cover.
///
/// # Examples
///
/// ```
/// use quarry_db::query::{Argument, Expression};
///
/// let expr = Expression::with_arguments("COALESCE(?, ?)", vec![
///     Argument::identifier("nickname"),
///     Argument::value("anonymous"),
/// ]);
/// let data = expr.expression_data().unwrap();
/// assert_eq!(data.parts()[0].template(), "COALESCE(%s, %s)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    sql: String,
    arguments: Vec<Argument>,
}

impl Expression {
    /// An expression without placeholders.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            arguments: Vec::new(),
        }
    }

    /// An expression whose `?` placeholders are filled by `arguments`.
    pub fn with_arguments(sql: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            sql: sql.into(),
            arguments,
        }
    }

    /// Returns the raw SQL.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Converts the expression into a single expression part.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::InvalidStructure`] if the number of `?`
    /// placeholders differs from the number of arguments.
    pub fn expression_data(&self) -> Result<ExpressionData, QuarryError> {
        let placeholders = self.sql.matches('?').count();
        if placeholders != self.arguments.len() {
            return Err(QuarryError::InvalidStructure(format!(
                "Expression '{}' has {placeholders} placeholders but {} arguments",
                self.sql,
                self.arguments.len()
            )));
        }
        let template = self.sql.replace('%', "%%").replace('?', "%s");
        Ok(ExpressionPart::new(template, self.arguments.clone()).into())
    }
}

/// Counts `%s` placeholders, skipping `%%` escapes.
pub(crate) fn placeholder_count(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('s') => count += 1,
                Some(_) | None => {}
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count() {
        assert_eq!(placeholder_count("%s IN (%s, %s)"), 3);
        assert_eq!(placeholder_count("100%% of %s"), 1);
        assert_eq!(placeholder_count("no placeholders"), 0);
    }

    #[test]
    fn test_part_values_and_kinds_align() {
        let part = ExpressionPart::new(
            "%s %s DEFAULT %s",
            vec![
                Argument::identifier("foo"),
                Argument::literal("INTEGER"),
                Argument::value("bar"),
            ],
        );
        assert_eq!(part.values().len(), part.kinds().len());
        assert_eq!(
            part.kinds(),
            vec![ValueKind::Identifier, ValueKind::Literal, ValueKind::Value]
        );
    }

    #[test]
    fn test_text_part_escapes_percent() {
        let part = ExpressionPart::text("LIKE 'a%'");
        assert_eq!(part.template(), "LIKE 'a%%'");
        assert!(part.arguments().is_empty());
    }

    #[test]
    fn test_expression_placeholders() {
        let expr = Expression::with_arguments(
            "x = ? AND y LIKE '10%'",
            vec![Argument::value(1)],
        );
        let data = expr.expression_data().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.parts()[0].template(), "x = %s AND y LIKE '10%%'");
        assert_eq!(data.parts()[0].kinds(), vec![ValueKind::Value]);
    }

    #[test]
    fn test_expression_count_mismatch() {
        let expr = Expression::with_arguments("x = ? AND y = ?", vec![Argument::value(1)]);
        let err = expr.expression_data().unwrap_err();
        assert!(matches!(err, QuarryError::InvalidStructure(_)));
    }

    #[test]
    fn test_expression_without_placeholders() {
        let data = Expression::new("DISTINCT(bar) as bar").expression_data().unwrap();
        assert_eq!(data.parts()[0].template(), "DISTINCT(bar) as bar");
        assert!(data.parts()[0].arguments().is_empty());
    }

    #[test]
    fn test_argument_kinds() {
        assert_eq!(Argument::identifier("a").kind, ValueKind::Identifier);
        assert_eq!(Argument::value(1).kind, ValueKind::Value);
        assert_eq!(Argument::literal("NOW()").kind, ValueKind::Literal);
        assert_eq!(Argument::select(Select::new()).kind, ValueKind::Select);
        assert_eq!(Argument::from(Value::Int(1)).kind, ValueKind::Value);
        assert_eq!(
            Argument::with_kind(3, ValueKind::Literal).as_value(),
            Some(&Value::Int(3))
        );
    }
}
