//! Core data structures for parsed GMD tables.
//!
//! A [`DataTable`] owns its column labels and a list of rows whose cells are
//! aligned with those labels. Unrecognised files produce
//! [`DataTable::empty`], a real table with no rows, so callers iterate
//! without checking for absence.

use serde::Serialize;
use std::fmt;

/// A single parsed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Padding for a row that was shorter than the field list
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// One data record, cells in column order.
///
/// The tokens read from the file are kept beside the coerced values, so
/// `007` stays `007` wherever a column has to fall back to text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    values: Vec<Value>,
    #[serde(skip)]
    tokens: Vec<Option<String>>,
}

impl Row {
    /// Row built from values alone; tokens are their display form
    pub fn new(values: Vec<Value>) -> Self {
        let tokens = values
            .iter()
            .map(|value| (!value.is_missing()).then(|| value.to_string()))
            .collect();
        Self { values, tokens }
    }

    /// Row with the raw token of each cell, `None` for padding
    pub fn with_tokens(values: Vec<Value>, tokens: Vec<Option<String>>) -> Self {
        debug_assert_eq!(values.len(), tokens.len());
        Self { values, tokens }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Text of the cell as it appeared in the file
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).and_then(|t| t.as_deref())
    }
}

/// Borrowed view of a row paired with the table's column labels
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    /// Cell for the named field; the first column wins on duplicate labels
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// `(field name, value)` pairs in column order
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Parsed contents of a GMD data file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl DataTable {
    /// Table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table with known columns and no rows yet
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Its length must equal the column count.
    pub(crate) fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.values.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|row| self.view(row))
    }

    pub fn rows(&self) -> Rows<'_> {
        Rows {
            columns: &self.columns,
            inner: self.rows.iter(),
        }
    }

    /// Raw token of one cell, before numeric coercion
    pub fn token(&self, row: usize, name: &str) -> Option<&str> {
        let index = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.token(index))
    }

    /// Raw tokens of the column at `index`, `None` for padded cells
    pub(crate) fn column_tokens(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| row.token(index))
    }

    /// All cells of the named column, top to bottom
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row.values[index]))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|r| &r.values[index])
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn view<'a>(&'a self, row: &'a Row) -> RowRef<'a> {
        RowRef {
            columns: &self.columns,
            values: &row.values,
        }
    }
}

/// Iterator over the rows of a [`DataTable`]
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    columns: &'a [String],
    inner: std::slice::Iter<'a, Row>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = RowRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.inner.next()?;
        Some(RowRef {
            columns: self.columns,
            values: &row.values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl<'a> IntoIterator for &'a DataTable {
    type Item = RowRef<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
