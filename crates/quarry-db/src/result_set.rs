//! Forward-only result sets with optional buffering.
//!
//! A [`ResultSet`] wraps a cursor: any iterator of [`CursorItem`]s. Items are
//! pulled lazily. Without buffering each item is fetched once and dropped
//! after the set moves past it, so the set cannot be rewound. Calling
//! [`ResultSet::buffer`] before iteration starts keeps every fetched item.

use std::fmt;

use quarry_core::QuarryError;

use crate::value::Value;

/// A result row: column names and their values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from column names and values.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::InvalidStructure`] if the lengths differ.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Result<Self, QuarryError> {
        if columns.len() != values.len() {
            return Err(QuarryError::InvalidStructure(format!(
                "Row has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self { columns, values }
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets a typed value by column name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or the value has a
    /// different type.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T, QuarryError> {
        let value = self.get_value(column).ok_or_else(|| {
            QuarryError::InvalidStructure(format!("Column '{column}' not found in row"))
        })?;
        T::from_value(value)
    }

    /// Gets a typed value by column index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds or the value has a
    /// different type.
    pub fn get_by_index<T: FromValue>(&self, idx: usize) -> Result<T, QuarryError> {
        let value = self.values.get(idx).ok_or_else(|| {
            QuarryError::InvalidStructure(format!(
                "Column index {idx} out of bounds (row has {} columns)",
                self.values.len()
            ))
        })?;
        T::from_value(value)
    }

    /// Returns the raw value of a column.
    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }
}

/// Conversion from a [`Value`] to a concrete Rust type.
pub trait FromValue: Sized {
    /// Attempts the conversion.
    fn from_value(value: &Value) -> Result<Self, QuarryError>;
}

fn type_mismatch(expected: &str, value: &Value) -> QuarryError {
    QuarryError::InvalidStructure(format!(
        "Expected {expected}, got {}",
        value.type_name()
    ))
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        value.as_int().ok_or_else(|| type_mismatch("int", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        let i = i64::from_value(value)?;
        Self::try_from(i).map_err(|e| {
            QuarryError::InvalidStructure(format!("Int value out of i32 range: {e}"))
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        match value {
            Value::Float(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => Ok(*i as Self),
            _ => Err(type_mismatch("float", value)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            _ => Err(type_mismatch("bool", value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(type_mismatch("string", value)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, QuarryError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// One item produced by a cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorItem {
    Row(Row),
    /// Anything that is not a row.
    Scalar(Value),
}

impl CursorItem {
    /// Returns the row, or `None` for a scalar item.
    pub const fn as_row(&self) -> Option<&Row> {
        match self {
            Self::Row(row) => Some(row),
            Self::Scalar(_) => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Row(_) => "row",
            Self::Scalar(value) => value.type_name(),
        }
    }
}

impl From<Row> for CursorItem {
    fn from(row: Row) -> Self {
        Self::Row(row)
    }
}

impl From<Value> for CursorItem {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

/// A boxed cursor.
pub type Cursor = Box<dyn Iterator<Item = CursorItem> + Send>;

/// Rows of a query result.
///
/// # Examples
///
/// ```
/// use quarry_db::result_set::{ResultSet, Row};
///
/// let rows = vec![
///     Row::from_pairs([("id", 1)]),
///     Row::from_pairs([("id", 2)]),
/// ];
/// let mut results = ResultSet::new();
/// results.initialize(rows);
/// assert_eq!(results.field_count(), 1);
/// assert_eq!(results.row_count(), 2);
/// ```
#[derive(Default)]
pub struct ResultSet {
    cursor: Option<Cursor>,
    /// Fetched items not yet discarded; `items[0]` is at index `offset`.
    items: Vec<CursorItem>,
    offset: usize,
    position: usize,
    buffered: bool,
    started: bool,
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("has_cursor", &self.cursor.is_some())
            .field("fetched", &self.items.len())
            .field("position", &self.position)
            .field("buffered", &self.buffered)
            .field("started", &self.started)
            .finish()
    }
}

impl ResultSet {
    /// Creates an empty result set with no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a cursor, discarding any previous state except buffering.
    pub fn initialize<I>(&mut self, source: I)
    where
        I: IntoIterator,
        I::Item: Into<CursorItem> + 'static,
        I::IntoIter: Send + 'static,
    {
        self.cursor = Some(Box::new(source.into_iter().map(Into::into)));
        self.items.clear();
        self.offset = 0;
        self.position = 0;
        self.started = false;
    }

    /// Returns `true` if a cursor is attached.
    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// Keeps every fetched item so the set can be rewound.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Sequencing`] once iteration has started.
    pub fn buffer(&mut self) -> Result<(), QuarryError> {
        if self.started && !self.buffered {
            return Err(QuarryError::Sequencing(
                "Buffering must be enabled before iteration is started".to_string(),
            ));
        }
        self.buffered = true;
        Ok(())
    }

    /// Returns `true` once buffering is enabled.
    pub fn is_buffered(&self) -> bool {
        self.buffered
    }

    /// Returns the row at the current position, or `None` at the end or when
    /// the item there is not a row. Repeated calls fetch from the cursor once.
    pub fn current(&mut self) -> Option<&Row> {
        self.started = true;
        self.fetch(self.position).and_then(CursorItem::as_row)
    }

    /// Moves to the next item.
    pub fn advance(&mut self) {
        self.started = true;
        self.position += 1;
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves back to the first item.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Sequencing`] for an unbuffered set that has
    /// moved past its first item.
    pub fn rewind(&mut self) -> Result<(), QuarryError> {
        if !self.buffered && self.position > 0 {
            return Err(QuarryError::Sequencing(
                "This result is forward only; rewinding after moving forward requires buffering"
                    .to_string(),
            ));
        }
        self.position = 0;
        Ok(())
    }

    /// Returns the number of columns in the first row, or 0 without a
    /// cursor.
    pub fn field_count(&mut self) -> usize {
        if self.cursor.is_none() {
            return 0;
        }
        self.fetch(self.position)
            .and_then(CursorItem::as_row)
            .map_or(0, Row::len)
    }

    /// Returns the total number of items the cursor produces, including
    /// those already iterated past. Remaining items are fetched and kept.
    pub fn row_count(&mut self) -> usize {
        if let Some(cursor) = self.cursor.as_mut() {
            self.items.extend(cursor);
        }
        self.offset + self.items.len()
    }

    /// Collects every row from the current position onward.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::InvalidStructure`] if an item is not a row.
    pub fn to_rows(&mut self) -> Result<Vec<Row>, QuarryError> {
        let mut rows = Vec::new();
        for item in self.by_ref() {
            match item {
                CursorItem::Row(row) => rows.push(row),
                other => {
                    return Err(QuarryError::InvalidStructure(format!(
                        "Rows as part of this data source, with type {}, cannot be converted to a row",
                        other.type_name()
                    )));
                }
            }
        }
        Ok(rows)
    }

    fn fetch(&mut self, index: usize) -> Option<&CursorItem> {
        if !self.buffered {
            let stale = self.position.saturating_sub(self.offset).min(self.items.len());
            self.items.drain(..stale);
            self.offset += stale;
        }
        if index < self.offset {
            return None;
        }
        while self.offset + self.items.len() <= index {
            let item = self.cursor.as_mut()?.next()?;
            self.items.push(item);
        }
        self.items.get(index - self.offset)
    }
}

impl Iterator for ResultSet {
    type Item = CursorItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.started = true;
        let item = self.fetch(self.position).cloned();
        if item.is_some() {
            self.position += 1;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn rows(count: i64) -> Vec<Row> {
        (0..count)
            .map(|i| {
                Row::from_pairs([
                    ("id", Value::Int(i)),
                    ("title", Value::from(format!("title {i}"))),
                ])
            })
            .collect()
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(
            vec!["id".into(), "name".into(), "score".into()],
            vec![Value::Int(7), Value::from("ann"), Value::Null],
        )
        .unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.get::<i64>("id").unwrap(), 7);
        assert_eq!(row.get::<String>("name").unwrap(), "ann");
        assert_eq!(row.get::<Option<i64>>("score").unwrap(), None);
        assert_eq!(row.get_by_index::<i32>(0).unwrap(), 7);
        assert!(row.get::<i64>("missing").is_err());
        assert!(row.get::<bool>("name").is_err());
        assert!(row.get_by_index::<Value>(9).is_err());
    }

    #[test]
    fn test_row_length_mismatch() {
        let err = Row::new(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(err, QuarryError::InvalidStructure(_)));
    }

    #[test]
    fn test_field_count_without_cursor() {
        let mut results = ResultSet::new();
        assert!(!results.has_cursor());
        assert_eq!(results.field_count(), 0);
        assert!(results.current().is_none());
    }

    #[test]
    fn test_field_count_from_first_row() {
        let mut results = ResultSet::new();
        results.initialize(rows(10));
        assert_eq!(results.field_count(), 2);
    }

    #[test]
    fn test_iteration_yields_rows_in_order() {
        let data = rows(10);
        let mut results = ResultSet::new();
        results.initialize(data.clone());
        for (index, item) in results.enumerate() {
            assert_eq!(item, CursorItem::Row(data[index].clone()));
        }
    }

    #[test]
    fn test_row_count() {
        let mut results = ResultSet::new();
        results.initialize(rows(42));
        assert_eq!(results.row_count(), 42);
        assert_eq!(results.row_count(), 42);
        assert_eq!(results.to_rows().unwrap().len(), 42);
    }

    #[test]
    fn test_row_count_after_partial_iteration() {
        let mut results = ResultSet::new();
        results.initialize(rows(5));
        results.advance();
        results.advance();
        assert_eq!(results.row_count(), 5);
        assert_eq!(results.position(), 2);
        assert_eq!(results.current().and_then(|r| r.get::<i64>("id").ok()), Some(2));
        let remaining = results.to_rows().unwrap();
        assert_eq!(remaining.len(), 3);
        assert_eq!(remaining[0].get::<i64>("id").unwrap(), 2);
        assert_eq!(results.row_count(), 5);
    }

    #[test]
    fn test_to_rows() {
        let data = rows(5);
        let mut results = ResultSet::new();
        results.initialize(data.clone());
        assert_eq!(results.to_rows().unwrap(), data);
    }

    #[test]
    fn test_to_rows_rejects_non_rows() {
        let mut results = ResultSet::new();
        results.initialize(vec![
            CursorItem::Row(Row::from_pairs([("id", 1)])),
            CursorItem::Scalar(Value::from("not a row")),
        ]);
        let err = results.to_rows().unwrap_err();
        assert!(matches!(err, QuarryError::InvalidStructure(ref m) if m.contains("type string")));
    }

    #[test]
    fn test_buffered_current_fetches_once() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let source = std::iter::once(Row::from_pairs([("foo", "bar")])).inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut results = ResultSet::new();
        results.initialize(source);
        results.buffer().unwrap();
        assert_eq!(
            results.current().and_then(|r| r.get_value("foo")).cloned(),
            Some(Value::from("bar"))
        );
        assert!(results.current().is_some());
        assert_eq!(pulls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_buffer_after_iteration_started() {
        let mut results = ResultSet::new();
        results.initialize(rows(1));
        let _ = results.current();
        let err = results.buffer().unwrap_err();
        assert!(matches!(err, QuarryError::Sequencing(_)));
        assert_eq!(
            err.to_string(),
            "Sequencing error: Buffering must be enabled before iteration is started"
        );
    }

    #[test]
    fn test_current_is_none_for_non_row() {
        let mut results = ResultSet::new();
        results.initialize(vec![Value::from("Not a row")]);
        results.buffer().unwrap();
        assert!(results.current().is_none());
    }

    #[test]
    fn test_rewind() {
        let mut unbuffered = ResultSet::new();
        unbuffered.initialize(rows(3));
        assert!(unbuffered.rewind().is_ok());
        unbuffered.advance();
        assert!(matches!(unbuffered.rewind(), Err(QuarryError::Sequencing(_))));

        let mut buffered = ResultSet::new();
        buffered.initialize(rows(3));
        buffered.buffer().unwrap();
        let first: Vec<_> = buffered.by_ref().collect();
        buffered.rewind().unwrap();
        let second: Vec<_> = buffered.by_ref().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unbuffered_drops_consumed_items() {
        let mut results = ResultSet::new();
        results.initialize(rows(3));
        results.advance();
        results.advance();
        assert_eq!(results.current().and_then(|r| r.get::<i64>("id").ok()), Some(2));
        let tail: Vec<_> = results.by_ref().collect();
        assert_eq!(tail.len(), 1);
        assert!(results.next().is_none());
    }
}
