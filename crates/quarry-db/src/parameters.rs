//! Parameter binding for prepared statements.
//!
//! The compiler never talks to a driver. It hands each bound value to a
//! [`ParameterBinder`] under a unique name, in declaration order, and writes a
//! placeholder formatted by the platform's [`ParameterStyle`] into the SQL.
//! [`ParameterContainer`] is the binder used by
//! [`SqlCompiler`](crate::query::SqlCompiler).

use indexmap::IndexMap;
use quarry_core::QuarryError;

use crate::value::Value;

pub use quarry_core::settings::ParameterStyle;

/// The sink that receives named values during compilation.
pub trait ParameterBinder {
    /// Records a value under `name`.
    ///
    /// Implementations must reject a name that was already bound during the
    /// same compilation.
    fn bind(&mut self, name: &str, value: Value) -> Result<(), QuarryError>;

    /// Returns the number of values bound so far.
    fn len(&self) -> usize;

    /// Returns `true` if nothing has been bound.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered mapping of parameter names to values.
///
/// # Examples
///
/// ```
/// use quarry_db::parameters::{ParameterBinder, ParameterContainer};
/// use quarry_db::value::Value;
///
/// let mut params = ParameterContainer::new();
/// params.bind("offset", Value::Int(10)).unwrap();
/// params.bind("limit", Value::Int(5)).unwrap();
/// assert_eq!(params.names().collect::<Vec<_>>(), vec!["offset", "limit"]);
/// assert!(params.bind("limit", Value::Int(6)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterContainer {
    values: IndexMap<String, Value>,
}

impl ParameterContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterates over parameter names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values in binding order, for positional drivers.
    pub fn positional(&self) -> Vec<Value> {
        self.values.values().cloned().collect()
    }
}

impl ParameterBinder for ParameterContainer {
    fn bind(&mut self, name: &str, value: Value) -> Result<(), QuarryError> {
        if self.values.contains_key(name) {
            return Err(QuarryError::DuplicateParameter(name.to_string()));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_preserves_order() {
        let mut params = ParameterContainer::new();
        params.bind("where1", Value::from("a")).unwrap();
        params.bind("where2", Value::from(2)).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("where2"), Some(&Value::Int(2)));
        assert_eq!(
            params.positional(),
            vec![Value::String("a".into()), Value::Int(2)]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut params = ParameterContainer::new();
        params.bind("limit", Value::Int(1)).unwrap();
        let err = params.bind("limit", Value::Int(2)).unwrap_err();
        assert!(matches!(err, QuarryError::DuplicateParameter(name) if name == "limit"));
        assert_eq!(params.get("limit"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_empty() {
        let params = ParameterContainer::new();
        assert!(params.is_empty());
        assert_eq!(params.iter().count(), 0);
    }
}
