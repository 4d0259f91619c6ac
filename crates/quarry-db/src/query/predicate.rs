//! Predicates and predicate sets for WHERE, HAVING and JOIN conditions.
//!
//! [`Predicate`] is a closed set of condition shapes. Each one reduces to
//! [`ExpressionData`] with a fixed template, so dialect differences live only
//! in the renderer. [`PredicateSet`] combines predicates with AND/OR and nests.
//!
//! # Examples
//!
//! ```
//! use quarry_db::query::{Predicate, PredicateSet};
//!
//! // name = ? AND age > ?
//! let set = PredicateSet::new()
//!     .equal_to("name", "Alice")
//!     .greater_than("age", 25);
//!
//! // (name = ? OR name = ?)
//! let either = Predicate::equal_to("name", "Alice") | Predicate::equal_to("name", "Bob");
//! ```

use std::ops;

use quarry_core::QuarryError;

use super::expression::{Argument, Expression, ExpressionData, ExpressionPart};
use super::select::Select;
use crate::value::Value;

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl ComparisonOp {
    /// Returns the SQL symbol.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

/// `left <op> right`. By default the left side is an identifier and the right
/// side a value; either can be re-tagged through [`Argument`].
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub left: Argument,
    pub op: ComparisonOp,
    pub right: Argument,
}

/// The right-hand side of an IN predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSet {
    /// An explicit list. Each element defaults to a value but may carry its
    /// own kind.
    Values(Vec<Argument>),
    /// A sub-select.
    Select(Box<Select>),
}

/// Membership of one identifier, or a tuple of identifiers, in a value set.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    identifiers: Vec<String>,
    value_set: ValueSet,
}

impl In {
    /// `identifier IN (values...)`.
    pub fn new<V: Into<Value>>(
        identifier: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            identifiers: vec![identifier.into()],
            value_set: ValueSet::Values(values.into_iter().map(Argument::value).collect()),
        }
    }

    /// `identifier IN (args...)` with per-element kinds.
    pub fn with_arguments(identifier: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            identifiers: vec![identifier.into()],
            value_set: ValueSet::Values(arguments),
        }
    }

    /// `identifier IN (SELECT ...)`.
    pub fn subselect(identifier: impl Into<String>, select: Select) -> Self {
        Self {
            identifiers: vec![identifier.into()],
            value_set: ValueSet::Select(Box::new(select)),
        }
    }

    /// `(a, b, ...) IN (SELECT ...)`.
    pub fn tuple_subselect<S: Into<String>>(
        identifiers: impl IntoIterator<Item = S>,
        select: Select,
    ) -> Self {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            value_set: ValueSet::Select(Box::new(select)),
        }
    }

    /// Returns the identifiers.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Replaces the identifier.
    pub fn set_identifier(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.identifiers = vec![identifier.into()];
        self
    }

    /// Returns the value set.
    pub fn value_set(&self) -> &ValueSet {
        &self.value_set
    }

    /// Replaces the value set.
    pub fn set_value_set(&mut self, value_set: ValueSet) -> &mut Self {
        self.value_set = value_set;
        self
    }

    fn expression_data(&self, negated: bool) -> ExpressionData {
        let keyword = if negated { "NOT IN" } else { "IN" };
        let mut arguments: Vec<Argument> = self
            .identifiers
            .iter()
            .map(|id| Argument::identifier(id.clone()))
            .collect();
        let left = if self.identifiers.len() > 1 {
            format!("({})", vec!["%s"; self.identifiers.len()].join(", "))
        } else {
            "%s".to_string()
        };

        let template = match &self.value_set {
            ValueSet::Select(select) => {
                arguments.push(Argument::select((**select).clone()));
                format!("{left} {keyword} %s")
            }
            ValueSet::Values(values) if values.is_empty() => {
                if negated {
                    return ExpressionPart::text("1 = 1").into();
                }
                format!("{left} IN (NULL)")
            }
            ValueSet::Values(values) => {
                arguments.extend(values.iter().cloned());
                format!("{left} {keyword} ({})", vec!["%s"; values.len()].join(", "))
            }
        };
        ExpressionPart::new(template, arguments).into()
    }
}

/// `identifier LIKE pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub identifier: String,
    pub pattern: Value,
}

/// `identifier BETWEEN min AND max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    pub identifier: String,
    pub min: Argument,
    pub max: Argument,
}

/// A boolean SQL condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `left <op> right`.
    Operator(Operator),
    /// `x IN (...)`.
    In(In),
    /// `x NOT IN (...)`.
    NotIn(In),
    /// `x LIKE pattern`.
    Like(Like),
    /// `x NOT LIKE pattern`.
    NotLike(Like),
    /// `x BETWEEN a AND b`.
    Between(Between),
    /// `x NOT BETWEEN a AND b`.
    NotBetween(Between),
    /// `x IS NULL`.
    IsNull(String),
    /// `x IS NOT NULL`.
    IsNotNull(String),
    /// Trusted SQL text, emitted verbatim.
    Literal(String),
    /// Raw SQL with `?` placeholders.
    Expression(Expression),
    /// A nested AND/OR group.
    Set(PredicateSet),
}

impl Predicate {
    fn operator(identifier: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> Self {
        Self::Operator(Operator {
            left: Argument::identifier(identifier),
            op,
            right: Argument::value(value),
        })
    }

    /// `identifier = value`
    pub fn equal_to(identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::operator(identifier, ComparisonOp::Eq, value)
    }

    /// `identifier != value`
    pub fn not_equal_to(identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::operator(identifier, ComparisonOp::Ne, value)
    }

    /// `identifier < value`
    pub fn less_than(identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::operator(identifier, ComparisonOp::Lt, value)
    }

    /// `identifier <= value`
    pub fn less_than_or_equal_to(identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::operator(identifier, ComparisonOp::Lte, value)
    }

    /// `identifier > value`
    pub fn greater_than(identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::operator(identifier, ComparisonOp::Gt, value)
    }

    /// `identifier >= value`
    pub fn greater_than_or_equal_to(
        identifier: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::operator(identifier, ComparisonOp::Gte, value)
    }

    /// `identifier LIKE pattern`
    pub fn like(identifier: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::Like(Like {
            identifier: identifier.into(),
            pattern: pattern.into(),
        })
    }

    /// `identifier NOT LIKE pattern`
    pub fn not_like(identifier: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::NotLike(Like {
            identifier: identifier.into(),
            pattern: pattern.into(),
        })
    }

    /// `identifier BETWEEN min AND max`
    pub fn between(
        identifier: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Self::Between(Between {
            identifier: identifier.into(),
            min: Argument::value(min),
            max: Argument::value(max),
        })
    }

    /// `identifier NOT BETWEEN min AND max`
    pub fn not_between(
        identifier: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Self::NotBetween(Between {
            identifier: identifier.into(),
            min: Argument::value(min),
            max: Argument::value(max),
        })
    }

    /// `identifier IN (values...)`
    pub fn is_in<V: Into<Value>>(
        identifier: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(In::new(identifier, values))
    }

    /// `identifier NOT IN (values...)`
    pub fn not_in<V: Into<Value>>(
        identifier: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::NotIn(In::new(identifier, values))
    }

    /// `identifier IS NULL`
    pub fn is_null(identifier: impl Into<String>) -> Self {
        Self::IsNull(identifier.into())
    }

    /// `identifier IS NOT NULL`
    pub fn is_not_null(identifier: impl Into<String>) -> Self {
        Self::IsNotNull(identifier.into())
    }

    /// Trusted SQL emitted verbatim.
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    /// Raw SQL with `?` placeholders.
    pub fn expression(sql: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self::Expression(Expression::with_arguments(sql, arguments))
    }

    /// Reduces the predicate to expression data.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::InvalidStructure`] if a raw expression's
    /// placeholders and arguments disagree.
    pub fn expression_data(&self) -> Result<ExpressionData, QuarryError> {
        let data = match self {
            Self::Operator(o) => ExpressionPart::new(
                format!("%s {} %s", o.op.as_sql()),
                vec![o.left.clone(), o.right.clone()],
            )
            .into(),
            Self::In(i) => i.expression_data(false),
            Self::NotIn(i) => i.expression_data(true),
            Self::Like(l) => like_part("%s LIKE %s", l),
            Self::NotLike(l) => like_part("%s NOT LIKE %s", l),
            Self::Between(b) => between_part("%s BETWEEN %s AND %s", b),
            Self::NotBetween(b) => between_part("%s NOT BETWEEN %s AND %s", b),
            Self::IsNull(id) => {
                ExpressionPart::new("%s IS NULL", vec![Argument::identifier(id.clone())]).into()
            }
            Self::IsNotNull(id) => {
                ExpressionPart::new("%s IS NOT NULL", vec![Argument::identifier(id.clone())])
                    .into()
            }
            Self::Literal(sql) => ExpressionPart::text(sql).into(),
            Self::Expression(expr) => expr.expression_data()?,
            Self::Set(set) => set.expression_data()?,
        };
        Ok(data)
    }
}

fn like_part(template: &str, like: &Like) -> ExpressionData {
    ExpressionPart::new(
        template,
        vec![
            Argument::identifier(like.identifier.clone()),
            Argument::value(like.pattern.clone()),
        ],
    )
    .into()
}

fn between_part(template: &str, between: &Between) -> ExpressionData {
    ExpressionPart::new(
        template,
        vec![
            Argument::identifier(between.identifier.clone()),
            between.min.clone(),
            between.max.clone(),
        ],
    )
    .into()
}

/// How a predicate joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combination {
    #[default]
    And,
    Or,
}

impl Combination {
    /// Returns the SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// An ordered group of predicates, each with the combination that joins it to
/// its predecessor. The first entry's combination is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    entries: Vec<(Combination, Predicate)>,
}

impl PredicateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate with the given combination.
    pub fn push(&mut self, combination: Combination, predicate: Predicate) {
        self.entries.push((combination, predicate));
    }

    /// Appends a predicate joined with AND.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.push(Combination::And, predicate);
        self
    }

    /// Appends a predicate joined with OR.
    pub fn or(mut self, predicate: Predicate) -> Self {
        self.push(Combination::Or, predicate);
        self
    }

    /// Appends a nested group joined with AND.
    pub fn nest(self, set: Self) -> Self {
        self.and(Predicate::Set(set))
    }

    /// ANDs `identifier = value`.
    pub fn equal_to(self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::equal_to(identifier, value))
    }

    /// ANDs `identifier != value`.
    pub fn not_equal_to(self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::not_equal_to(identifier, value))
    }

    /// ANDs `identifier < value`.
    pub fn less_than(self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::less_than(identifier, value))
    }

    /// ANDs `identifier <= value`.
    pub fn less_than_or_equal_to(
        self,
        identifier: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.and(Predicate::less_than_or_equal_to(identifier, value))
    }

    /// ANDs `identifier > value`.
    pub fn greater_than(self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Predicate::greater_than(identifier, value))
    }

    /// ANDs `identifier >= value`.
    pub fn greater_than_or_equal_to(
        self,
        identifier: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.and(Predicate::greater_than_or_equal_to(identifier, value))
    }

    /// ANDs `identifier LIKE pattern`.
    pub fn like(self, identifier: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.and(Predicate::like(identifier, pattern))
    }

    /// ANDs `identifier NOT LIKE pattern`.
    pub fn not_like(self, identifier: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.and(Predicate::not_like(identifier, pattern))
    }

    /// ANDs `identifier BETWEEN min AND max`.
    pub fn between(
        self,
        identifier: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.and(Predicate::between(identifier, min, max))
    }

    /// ANDs `identifier IN (values)`.
    pub fn is_in<V: Into<Value>>(
        self,
        identifier: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.and(Predicate::is_in(identifier, values))
    }

    /// ANDs `identifier NOT IN (values)`.
    pub fn not_in<V: Into<Value>>(
        self,
        identifier: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.and(Predicate::not_in(identifier, values))
    }

    /// ANDs `identifier IS NULL`.
    pub fn is_null(self, identifier: impl Into<String>) -> Self {
        self.and(Predicate::is_null(identifier))
    }

    /// ANDs `identifier IS NOT NULL`.
    pub fn is_not_null(self, identifier: impl Into<String>) -> Self {
        self.and(Predicate::is_not_null(identifier))
    }

    /// ANDs verbatim SQL.
    pub fn literal(self, sql: impl Into<String>) -> Self {
        self.and(Predicate::literal(sql))
    }

    /// ANDs raw SQL with `?` placeholders.
    pub fn expression(self, sql: impl Into<String>, arguments: Vec<Argument>) -> Self {
        self.and(Predicate::expression(sql, arguments))
    }

    /// Returns `true` if the set holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(combination, predicate)` entries.
    pub fn iter(&self) -> impl Iterator<Item = &(Combination, Predicate)> {
        self.entries.iter()
    }

    fn is_uniformly(&self, combination: Combination) -> bool {
        self.entries.iter().skip(1).all(|(c, _)| *c == combination)
    }

    /// Reduces the set to expression data. Nested sets are parenthesised and
    /// empty nested sets are skipped.
    ///
    /// # Errors
    ///
    /// Propagates errors from raw expressions inside the set.
    pub fn expression_data(&self) -> Result<ExpressionData, QuarryError> {
        let mut data = ExpressionData::new();
        let mut first = true;
        for (combination, predicate) in &self.entries {
            let nested = match predicate {
                Predicate::Set(set) if set.is_empty() => continue,
                Predicate::Set(_) => true,
                _ => false,
            };
            if !first {
                data.push(ExpressionPart::text(&format!(" {} ", combination.as_sql())));
            }
            first = false;
            if nested {
                data.push(ExpressionPart::text("("));
            }
            data.extend(predicate.expression_data()?);
            if nested {
                data.push(ExpressionPart::text(")"));
            }
        }
        Ok(data)
    }
}

impl From<Predicate> for PredicateSet {
    fn from(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Set(set) => set,
            other => Self::new().and(other),
        }
    }
}

impl ops::BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match self {
            Self::Set(set) if set.is_uniformly(Combination::And) => Self::Set(set.and(rhs)),
            other => Self::Set(PredicateSet::new().and(other).and(rhs)),
        }
    }
}

impl ops::BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match self {
            Self::Set(set) if set.is_uniformly(Combination::Or) => Self::Set(set.or(rhs)),
            other => Self::Set(PredicateSet::new().and(other).or(rhs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expression::ValueKind;

    fn single(data: &ExpressionData) -> &ExpressionPart {
        assert_eq!(data.len(), 1);
        &data.parts()[0]
    }

    fn templates(data: &ExpressionData) -> String {
        data.parts().iter().map(ExpressionPart::template).collect()
    }

    #[test]
    fn test_in_value_list() {
        let data = Predicate::is_in("foo.bar", [1, 2, 3]).expression_data().unwrap();
        let part = single(&data);
        assert_eq!(part.template(), "%s IN (%s, %s, %s)");
        assert_eq!(
            part.kinds(),
            vec![
                ValueKind::Identifier,
                ValueKind::Value,
                ValueKind::Value,
                ValueKind::Value
            ]
        );
        assert_eq!(
            part.arguments()[0].as_value(),
            Some(&Value::String("foo.bar".into()))
        );
        assert_eq!(part.arguments()[3].as_value(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_in_kind_overrides() {
        let pred = Predicate::In(In::with_arguments(
            "foo.bar",
            vec![
                Argument::with_kind(1, ValueKind::Literal),
                Argument::with_kind(2, ValueKind::Value),
                Argument::with_kind(3, ValueKind::Literal),
            ],
        ));
        let data = pred.expression_data().unwrap();
        assert_eq!(
            single(&data).kinds(),
            vec![
                ValueKind::Identifier,
                ValueKind::Literal,
                ValueKind::Value,
                ValueKind::Literal
            ]
        );
    }

    #[test]
    fn test_in_mutators() {
        let mut in_ = In::new("a", [1]);
        in_.set_identifier("foo.bar")
            .set_value_set(ValueSet::Values(vec![Argument::value(1), Argument::value(2)]));
        assert_eq!(in_.identifiers(), ["foo.bar".to_string()]);
        assert!(matches!(in_.value_set(), ValueSet::Values(v) if v.len() == 2));
    }

    #[test]
    fn test_in_subselect() {
        let select = Select::new();
        let data = Predicate::In(In::subselect("foo", select.clone()))
            .expression_data()
            .unwrap();
        let part = single(&data);
        assert_eq!(part.template(), "%s IN %s");
        assert_eq!(part.kinds(), vec![ValueKind::Identifier, ValueKind::Select]);
    }

    #[test]
    fn test_in_tuple_subselect() {
        let data = Predicate::In(In::tuple_subselect(["foo", "bar"], Select::new()))
            .expression_data()
            .unwrap();
        let part = single(&data);
        assert_eq!(part.template(), "(%s, %s) IN %s");
        assert_eq!(
            part.kinds(),
            vec![ValueKind::Identifier, ValueKind::Identifier, ValueKind::Select]
        );
    }

    #[test]
    fn test_in_empty_set_is_always_false() {
        let data = Predicate::is_in("foo", Vec::<Value>::new())
            .expression_data()
            .unwrap();
        let part = single(&data);
        assert_eq!(part.template(), "%s IN (NULL)");
        assert_eq!(part.kinds(), vec![ValueKind::Identifier]);
    }

    #[test]
    fn test_not_in() {
        let data = Predicate::not_in("foo", [1, 2]).expression_data().unwrap();
        assert_eq!(single(&data).template(), "%s NOT IN (%s, %s)");

        let empty = Predicate::not_in("foo", Vec::<Value>::new())
            .expression_data()
            .unwrap();
        assert_eq!(single(&empty).template(), "1 = 1");
    }

    #[test]
    fn test_operator_like_between_null() {
        let cases = [
            (Predicate::equal_to("a", 1), "%s = %s"),
            (Predicate::not_equal_to("a", 1), "%s != %s"),
            (Predicate::less_than_or_equal_to("a", 1), "%s <= %s"),
            (Predicate::greater_than("a", 1), "%s > %s"),
            (Predicate::like("a", "x%"), "%s LIKE %s"),
            (Predicate::not_like("a", "x%"), "%s NOT LIKE %s"),
            (Predicate::between("a", 1, 5), "%s BETWEEN %s AND %s"),
            (Predicate::not_between("a", 1, 5), "%s NOT BETWEEN %s AND %s"),
            (Predicate::is_null("a"), "%s IS NULL"),
            (Predicate::is_not_null("a"), "%s IS NOT NULL"),
        ];
        for (predicate, expected) in cases {
            let data = predicate.expression_data().unwrap();
            assert_eq!(single(&data).template(), expected);
        }
    }

    #[test]
    fn test_literal_carries_no_values() {
        let data = Predicate::literal("x LIKE 'a%'").expression_data().unwrap();
        let part = single(&data);
        assert_eq!(part.template(), "x LIKE 'a%%'");
        assert!(part.arguments().is_empty());
    }

    #[test]
    fn test_set_joins_and_nests() {
        let inner = PredicateSet::new()
            .equal_to("b", 2)
            .or(Predicate::equal_to("c", 3));
        let set = PredicateSet::new().equal_to("a", 1).nest(inner);
        let data = set.expression_data().unwrap();
        assert_eq!(templates(&data), "%s = %s AND (%s = %s OR %s = %s)");
    }

    #[test]
    fn test_set_skips_empty_nested() {
        let set = PredicateSet::new()
            .nest(PredicateSet::new())
            .equal_to("a", 1)
            .nest(PredicateSet::new());
        let data = set.expression_data().unwrap();
        assert_eq!(templates(&data), "%s = %s");
    }

    #[test]
    fn test_bit_operators_flatten() {
        let p = Predicate::equal_to("a", 1) & Predicate::equal_to("b", 2) & Predicate::is_null("c");
        match &p {
            Predicate::Set(set) => assert_eq!(set.len(), 3),
            _ => panic!("Expected Set"),
        }

        let q = (Predicate::equal_to("a", 1) & Predicate::equal_to("b", 2))
            | Predicate::equal_to("c", 3);
        let data = PredicateSet::from(q).expression_data().unwrap();
        assert_eq!(templates(&data), "(%s = %s AND %s = %s) OR %s = %s");
    }

    #[test]
    fn test_set_propagates_expression_error() {
        let set = PredicateSet::new().expression("x = ? AND y = ?", vec![Argument::value(1)]);
        assert!(matches!(
            set.expression_data(),
            Err(QuarryError::InvalidStructure(_))
        ));
    }
}
