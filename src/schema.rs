//! Column type inference and Polars conversion.
//!
//! Cells are typed individually while reading; a Polars column needs one
//! type, so each column takes the narrowest type that holds every cell.

use crate::error::Result;
use crate::models::{DataTable, Value};
use polars::prelude::*;
use tracing::debug;

/// Storage type chosen for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn to_polars_dtype(self) -> DataType {
        match self {
            ColumnType::Integer => DataType::Int64,
            ColumnType::Float => DataType::Float64,
            ColumnType::Text => DataType::String,
        }
    }
}

/// Narrowest type holding every non-missing value.
///
/// All integers gives `Integer`, any mix of numbers gives `Float`, anything
/// else (including a column with no values) gives `Text`.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let mut inferred = None;

    for value in values {
        inferred = match (inferred, value) {
            (_, Value::Missing) => inferred,
            (_, Value::Text(_)) => return ColumnType::Text,
            (None | Some(ColumnType::Integer), Value::Integer(_)) => Some(ColumnType::Integer),
            (_, Value::Integer(_) | Value::Float(_)) => Some(ColumnType::Float),
        };
    }

    inferred.unwrap_or(ColumnType::Text)
}

impl DataTable {
    /// Convert to a Polars `DataFrame`, one column per field.
    ///
    /// Text columns carry the tokens as read, so numbers in a mixed column
    /// keep their spelling (`007`, `1.50`). Missing cells become nulls. The
    /// empty table converts to an empty frame. Duplicate field names are
    /// rejected by Polars.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        if self.num_columns() == 0 {
            return Ok(DataFrame::empty());
        }

        let mut columns = Vec::with_capacity(self.num_columns());
        for (index, name) in self.columns().iter().enumerate() {
            let cells = || self.rows().map(move |row| &row.values()[index]);
            let column_type = infer_column_type(cells());
            debug!("Column '{}' inferred as {:?}", name, column_type);

            let name = PlSmallStr::from(name.as_str());
            let series = match column_type {
                ColumnType::Integer => {
                    let values: Vec<Option<i64>> = cells().map(Value::as_i64).collect();
                    Series::new(name, values)
                }
                ColumnType::Float => {
                    let values: Vec<Option<f64>> = cells().map(Value::as_f64).collect();
                    Series::new(name, values)
                }
                ColumnType::Text => {
                    let values: Vec<Option<&str>> = self.column_tokens(index).collect();
                    Series::new(name, values)
                }
            };
            columns.push(Column::from(series));
        }

        Ok(DataFrame::new(columns)?)
    }
}
