//! GMD data file reader.
//!
//! Reading is two steps. The header scan looks for the
//! `number_of_header_lines` and `data_fields` directives; if both are found
//! the declared number of leading lines is skipped and every remaining line
//! becomes a record of whitespace-separated tokens.
//!
//! When the scan finished inside the declared header, the same stream is
//! reused and only the rest of the header is skipped. Otherwise the file is
//! opened a second time and read from the top.

use crate::config::{RaggedRowPolicy, ReaderConfig};
use crate::constants::{INTEGER_PATTERN, NUMERIC_PATTERN, SPECIAL_FLOAT_PATTERN};
use crate::error::{GmdError, Result};
use crate::header::{HeaderMetadata, RawLines, scan_lines};
use crate::models::{DataTable, Row, Value};
use regex::Regex;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMERIC_PATTERN).expect("numeric pattern is valid"));

static SPECIAL_FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SPECIAL_FLOAT_PATTERN).expect("special float pattern is valid")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INTEGER_PATTERN).expect("integer pattern is valid"));

/// Counters for one read, logged when the read finishes
#[derive(Debug, Default)]
struct BodyStats {
    rows_parsed: usize,
    blank_lines: usize,
    rows_padded: usize,
    rows_truncated: usize,
    rows_dropped: usize,
}

/// Read a GMD data file into a table using the default configuration.
///
/// Returns an empty table when the file lacks either header directive.
/// A missing or unreadable file is an error.
///
/// ```no_run
/// let table = gmd_file_reader::read_data("co2_mlo_surface-insitu_1_ccgg_DailyData.txt")?;
/// for row in &table {
///     println!("{:?}", row.get("value"));
/// }
/// # Ok::<(), gmd_file_reader::GmdError>(())
/// ```
pub fn read_data(path: impl AsRef<Path>) -> Result<DataTable> {
    read_data_with_config(path, &ReaderConfig::default())
}

/// Read a GMD data file with explicit options
pub fn read_data_with_config(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<DataTable> {
    let path = path.as_ref();
    debug!("Reading GMD file: {}", path.display());

    let mut lines = RawLines::open(path)?;
    let scan = scan_lines(&mut lines, path)?;

    let Some(metadata) = scan.metadata else {
        info!(
            "No header directives in {} after {} lines, returning empty table",
            path.display(),
            scan.lines_consumed
        );
        return Ok(DataTable::empty());
    };

    debug!(
        "Header of {}: {} lines, fields {:?}",
        path.display(),
        metadata.header_line_count,
        metadata.field_names
    );

    let table = if scan.lines_consumed <= metadata.header_line_count {
        let remaining = metadata.header_line_count - scan.lines_consumed;
        parse_body(lines, path, &metadata, remaining, config)?
    } else {
        debug!(
            "Directives found past line {}, re-opening {}",
            metadata.header_line_count,
            path.display()
        );
        drop(lines);
        let lines = RawLines::open(path)?;
        parse_body(lines, path, &metadata, metadata.header_line_count, config)?
    };

    Ok(table)
}

/// Skip `skip` lines of `lines`, then parse every remaining line as a record
fn parse_body<R: BufRead>(
    lines: RawLines<R>,
    path: &Path,
    metadata: &HeaderMetadata,
    skip: usize,
    config: &ReaderConfig,
) -> Result<DataTable> {
    let field_count = metadata.field_names.len();
    let mut table = DataTable::with_columns(metadata.field_names.clone());
    let mut stats = BodyStats::default();
    let first_line = metadata.header_line_count + 1;

    for (offset, line) in lines.skip(skip).enumerate() {
        let line = line.map_err(|e| GmdError::io(path, e))?;
        let line_num = first_line + offset;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        if tokens.len() != field_count {
            match config.ragged_rows {
                RaggedRowPolicy::Drop => {
                    warn!(
                        "Dropping line {}: {} tokens, expected {}",
                        line_num,
                        tokens.len(),
                        field_count
                    );
                    stats.rows_dropped += 1;
                    continue;
                }
                RaggedRowPolicy::Pad if tokens.len() < field_count => {
                    warn!(
                        "Padding line {}: {} tokens, expected {}",
                        line_num,
                        tokens.len(),
                        field_count
                    );
                    stats.rows_padded += 1;
                }
                RaggedRowPolicy::Pad => {
                    warn!(
                        "Truncating line {}: {} tokens, expected {}",
                        line_num,
                        tokens.len(),
                        field_count
                    );
                    stats.rows_truncated += 1;
                }
            }
        }

        table.push_row(build_row(&tokens, field_count, config.coerce_numeric));
        stats.rows_parsed += 1;
    }

    debug!(
        "Body of {}: {} blank, {} padded, {} truncated, {} dropped",
        path.display(),
        stats.blank_lines,
        stats.rows_padded,
        stats.rows_truncated,
        stats.rows_dropped
    );
    info!(
        "Parsed {} rows x {} fields from {}",
        stats.rows_parsed,
        field_count,
        path.display()
    );

    Ok(table)
}

/// Build a row of exactly `field_count` cells from the tokens of one line
fn build_row(tokens: &[&str], field_count: usize, coerce: bool) -> Row {
    let kept = &tokens[..tokens.len().min(field_count)];

    let mut values: Vec<Value> = kept
        .iter()
        .map(|token| {
            if coerce {
                coerce_token(token)
            } else {
                Value::Text(token.to_string())
            }
        })
        .collect();
    values.resize(field_count, Value::Missing);

    let mut raw: Vec<Option<String>> = kept.iter().map(|t| Some(t.to_string())).collect();
    raw.resize(field_count, None);

    Row::with_tokens(values, raw)
}

/// Convert a token to the narrowest value it represents.
///
/// Integer literals become `Integer`, decimal and exponent literals become
/// `Float`. The spellings `nan` and `inf`/`infinity` (any case, optional
/// sign) also become `Float`, so a gap marker does not turn a numeric
/// column into text. Integer literals that overflow `i64`, and anything
/// else, keep their raw text.
pub fn coerce_token(token: &str) -> Value {
    if INTEGER_RE.is_match(token) {
        return match token.parse::<i64>() {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Text(token.to_string()),
        };
    }

    if NUMERIC_RE.is_match(token) || SPECIAL_FLOAT_RE.is_match(token) {
        if let Ok(v) = token.parse::<f64>() {
            return Value::Float(v);
        }
    }

    Value::Text(token.to_string())
}
