//! Integration tests for reading GMD data files end to end
//!
//! Each test writes a small file in the published GMD layout to a temp
//! directory and reads it back through the public API.

use gmd_file_reader::{
    GmdError, RaggedRowPolicy, ReaderConfig, Value, read_data, read_data_with_config,
    read_dataframe, scan_header,
};
use polars::prelude::DataType;
use std::fs;
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Route library logs to the test harness, filtered by `RUST_LOG`
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn write_gmd_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Daily CO2 file trimmed to a handful of records
fn co2_daily_file() -> &'static str {
    "# header_lines : 6\n\
     # number_of_header_lines: 6\n\
     # data_fields: site_code year month day value value_std_dev qcflag\n\
     # site_name: Mauna Loa\n\
     # site_latitude: 19.5362\n\
     # dataset_creation_time: 2020-03-25T06:44:21.362311\n\
     MLO 1974 05 19 333.37 -999.99 ...\n\
     MLO 1974 05 20 333.06 0.35 ...\n\
     MLO 1974 05 21 -999.99 -999.99 *..\n"
}

#[test]
fn test_recognized_format() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "monthly.txt",
        "# number_of_header_lines: 3\n\
         # data_fields: year month value\n\
         # comment line\n\
         2020 01 1.5\n\
         2020 02 2.7\n",
    );

    let table = read_data(&path).unwrap();

    assert_eq!(table.columns(), &["year", "month", "value"]);
    assert_eq!(table.len(), 2);

    let rows: Vec<Vec<Value>> = table.rows().map(|row| row.values().to_vec()).collect();
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(2020), Value::Integer(1), Value::Float(1.5)],
            vec![Value::Integer(2020), Value::Integer(2), Value::Float(2.7)],
        ]
    );
}

#[test]
fn test_missing_metadata_yields_empty_table() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "plain.txt",
        "# just a comment\nyear month value\n2020 01 1.5\n",
    );

    let table = read_data(&path).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    assert_eq!((&table).into_iter().count(), 0);
    assert!(scan_header(&path).unwrap().is_none());
}

#[test]
fn test_partial_metadata_yields_empty_table() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(&dir, "partial.txt", "# data_fields: a b\n1 2\n3 4\n");

    let table = read_data(&path).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.num_columns(), 0);
}

#[test]
fn test_directive_order_independence() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let forward = write_gmd_file(
        &dir,
        "forward.txt",
        "# number_of_header_lines: 3\n# data_fields: a b\n# note\n1 x\n2 y\n",
    );
    let reversed = write_gmd_file(
        &dir,
        "reversed.txt",
        "# data_fields: a b\n# number_of_header_lines: 3\n# note\n1 x\n2 y\n",
    );

    let forward = read_data(&forward).unwrap();
    let reversed = read_data(&reversed).unwrap();

    assert_eq!(forward.len(), 2);
    assert_eq!(forward, reversed);
}

#[test]
fn test_lines_before_declared_header_end_are_skipped() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    // The trailing header lines look like data but sit inside the declared
    // header and must not appear in the table.
    let path = write_gmd_file(
        &dir,
        "short_circuit.txt",
        "# number_of_header_lines: 5\n\
         # data_fields: a b\n\
         9 9\n\
         # data_fields: c d e\n\
         8 8\n\
         1 2\n",
    );

    let table = read_data(&path).unwrap();

    assert_eq!(table.columns(), &["a", "b"]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "a"), Some(&Value::Integer(1)));
    assert_eq!(table.get(0, "b"), Some(&Value::Integer(2)));
}

#[test]
fn test_nonexistent_file_is_io_error() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does_not_exist.txt");

    let result = read_data(&missing);

    assert!(result.is_err());
    match result.unwrap_err() {
        GmdError::Io { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected Io error, got {other:?}"),
    }
    assert!(read_dataframe(&missing).unwrap_err().is_io());
}

#[test]
fn test_numeric_coercion_within_row() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(&dir, "co2_daily.txt", co2_daily_file());

    let table = read_data(&path).unwrap();
    assert_eq!(table.len(), 3);

    let row = table.row(0).unwrap();
    assert_eq!(row.get("site_code"), Some(&Value::Text("MLO".to_string())));
    assert_eq!(row.get("year"), Some(&Value::Integer(1974)));
    assert_eq!(row.get("month"), Some(&Value::Integer(5)));
    assert_eq!(row.get("value"), Some(&Value::Float(333.37)));
    assert_eq!(row.get("value_std_dev"), Some(&Value::Float(-999.99)));
    assert_eq!(row.get("qcflag"), Some(&Value::Text("...".to_string())));

    let flags: Vec<&str> = table
        .column("qcflag")
        .unwrap()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(flags, vec!["...", "...", "*.."]);
}

#[test]
fn test_crlf_line_endings() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "windows.txt",
        "# number_of_header_lines: 2\r\n# data_fields: a b\r\n1 2.5\r\n",
    );

    let table = read_data(&path).unwrap();

    assert_eq!(table.columns(), &["a", "b"]);
    assert_eq!(table.get(0, "b"), Some(&Value::Float(2.5)));
}

#[test]
fn test_latin1_header_is_readable() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.txt");
    let mut bytes = b"# number_of_header_lines: 3\n# data_fields: site value\n".to_vec();
    bytes.extend_from_slice(b"# site_name: S\xe3o Tom\xe9\n");
    bytes.extend_from_slice(b"STM 1.25\n");
    fs::write(&path, bytes).unwrap();

    let table = read_data(&path).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "value"), Some(&Value::Float(1.25)));
}

#[test]
fn test_ragged_rows_with_both_policies() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "ragged.txt",
        "# number_of_header_lines: 2\n\
         # data_fields: a b c\n\
         1 2 3\n\
         4 5\n\
         6 7 8 9\n",
    );

    let padded = read_data(&path).unwrap();
    assert_eq!(padded.len(), 3);
    assert_eq!(padded.get(1, "c"), Some(&Value::Missing));
    assert_eq!(padded.get(2, "c"), Some(&Value::Integer(8)));

    let config = ReaderConfig::new().with_ragged_rows(RaggedRowPolicy::Drop);
    let dropped = read_data_with_config(&path, &config).unwrap();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped.get(0, "a"), Some(&Value::Integer(1)));
}

#[test]
fn test_coercion_can_be_disabled() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(&dir, "co2_daily.txt", co2_daily_file());

    let config = ReaderConfig::new().with_coerce_numeric(false);
    let table = read_data_with_config(&path, &config).unwrap();

    assert_eq!(table.get(0, "year"), Some(&Value::Text("1974".to_string())));
    assert_eq!(table.get(0, "month"), Some(&Value::Text("05".to_string())));
}

#[test]
fn test_read_dataframe() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(&dir, "co2_daily.txt", co2_daily_file());

    let df = read_dataframe(&path).unwrap();

    assert_eq!(df.shape(), (3, 7));
    assert_eq!(df.column("site_code").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("year").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("value").unwrap().dtype(), &DataType::Float64);

    let values = df.column("value").unwrap().f64().unwrap();
    assert_eq!(values.get(2), Some(-999.99));
}

#[test]
fn test_read_dataframe_unrecognized_is_empty() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(&dir, "plain.txt", "1 2 3\n");

    let df = read_dataframe(&path).unwrap();

    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), 0);
}

#[test]
fn test_mixed_column_keeps_file_spelling() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "codes.txt",
        "# number_of_header_lines: 2\n\
         # data_fields: code v\n\
         007 1.50\n\
         ABC 1e3\n",
    );

    let table = read_data(&path).unwrap();
    assert_eq!(table.get(0, "code"), Some(&Value::Integer(7)));
    assert_eq!(table.token(0, "code"), Some("007"));

    let df = read_dataframe(&path).unwrap();
    let code = df.column("code").unwrap().str().unwrap();
    assert_eq!(code.get(0), Some("007"));
    assert_eq!(code.get(1), Some("ABC"));

    let v = df.column("v").unwrap().f64().unwrap();
    assert_eq!(v.get(0), Some(1.5));
    assert_eq!(v.get(1), Some(1000.0));
}

#[test]
fn test_nan_tokens_stay_numeric() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "gaps.txt",
        "# number_of_header_lines: 2\n\
         # data_fields: year value\n\
         2020 410.5\n\
         2021 NaN\n\
         2022 nan\n",
    );

    let table = read_data(&path).unwrap();
    assert!(table.get(1, "value").and_then(Value::as_f64).unwrap().is_nan());

    let df = read_dataframe(&path).unwrap();
    assert_eq!(df.column("value").unwrap().dtype(), &DataType::Float64);
    let values = df.column("value").unwrap().f64().unwrap();
    assert_eq!(values.get(0), Some(410.5));
    assert!(values.get(2).unwrap().is_nan());
}

#[test]
fn test_bare_carriage_return_line_endings() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_gmd_file(
        &dir,
        "classic_mac.txt",
        "# number_of_header_lines: 3\r# data_fields: a b\r# note\r1 2\r3 4\r",
    );

    let table = read_data(&path).unwrap();

    assert_eq!(table.columns(), &["a", "b"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1, "b"), Some(&Value::Integer(4)));
}
