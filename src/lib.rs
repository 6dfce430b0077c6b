//! GMD File Reader Library
//!
//! Reads the ASCII data files published by the NOAA Earth System Research
//! Laboratory (ESRL) Global Monitoring Division (GMD) into typed tables.
//!
//! A GMD file opens with `#` comment lines, two of which are directives:
//!
//! ```text
//! # number_of_header_lines: 3
//! # data_fields: year month value
//! # free-text comment
//! 2020 01 1.5
//! 2020 02 2.7
//! ```
//!
//! This library provides:
//! - Header scanning that stops as soon as both directives are seen
//! - Whitespace-delimited record parsing with per-cell numeric coercion
//! - An empty table, not an error, for files without the directives
//! - Conversion of parsed tables to Polars `DataFrame`s

pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod reader;
pub mod schema;

// Re-export commonly used types
pub use config::{RaggedRowPolicy, ReaderConfig};
pub use error::{GmdError, Result};
pub use header::{HeaderMetadata, scan_header};
pub use models::{DataTable, Row, RowRef, Rows, Value};
pub use reader::{read_data, read_data_with_config};

use polars::prelude::DataFrame;
use std::path::Path;

/// Read a GMD data file straight into a Polars `DataFrame`.
///
/// Files without the header directives give an empty frame.
pub fn read_dataframe(path: impl AsRef<Path>) -> Result<DataFrame> {
    read_data(path)?.to_dataframe()
}
