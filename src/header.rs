//! GMD header scanning and directive extraction.
//!
//! Scans the leading comment lines of a GMD ASCII file for the two
//! directives that locate the data section:
//!
//! ```text
//! # number_of_header_lines: 68
//! # data_fields: site_code year month day hour minute value
//! ```
//!
//! The scan stops as soon as both directives are seen. Either one missing
//! means the file is not recognised, which is reported as `None` rather
//! than as an error.

use crate::constants::{
    COMMENT_MARKER, DATA_FIELDS_GROUP, DATA_FIELDS_PATTERN, HEADER_LINES_GROUP,
    HEADER_LINES_PATTERN,
};
use crate::error::{GmdError, Result};
use regex::Regex;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static HEADER_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEADER_LINES_PATTERN).expect("header lines pattern is valid"));

static DATA_FIELDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATA_FIELDS_PATTERN).expect("data fields pattern is valid"));

/// Metadata declared by the header directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMetadata {
    /// Leading lines to skip before the first data record
    pub header_line_count: usize,

    /// Column labels in declaration order
    pub field_names: Vec<String>,
}

/// Two-slot state for the header scan.
///
/// Each slot is filled by the first line matching its directive and is
/// never overwritten afterwards.
#[derive(Debug, Default)]
pub struct HeaderScanner {
    header_line_count: Option<usize>,
    field_names: Option<Vec<String>>,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match one line against whichever directives are still unset
    pub fn observe(&mut self, line: &str) {
        if !line.starts_with(COMMENT_MARKER) {
            return;
        }

        if self.header_line_count.is_none() {
            if let Some(caps) = HEADER_LINES_RE.captures(line) {
                let digits = &caps[HEADER_LINES_GROUP];
                match digits.parse::<usize>() {
                    Ok(count) => {
                        debug!("Found number_of_header_lines directive: {}", count);
                        self.header_line_count = Some(count);
                    }
                    Err(e) => warn!("Ignoring header line count '{}': {}", digits, e),
                }
            }
        }

        if self.field_names.is_none() {
            if let Some(caps) = DATA_FIELDS_RE.captures(line) {
                let fields: Vec<String> = caps[DATA_FIELDS_GROUP]
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                debug!("Found data_fields directive: {:?}", fields);
                self.field_names = Some(fields);
            }
        }
    }

    /// Both directives have been seen
    pub fn is_complete(&self) -> bool {
        self.header_line_count.is_some() && self.field_names.is_some()
    }

    /// Consume the scanner, yielding metadata only when both slots are set
    pub fn finish(self) -> Option<HeaderMetadata> {
        match (self.header_line_count, self.field_names) {
            (Some(header_line_count), Some(field_names)) => Some(HeaderMetadata {
                header_line_count,
                field_names,
            }),
            _ => None,
        }
    }
}

/// Outcome of scanning a stream for the header directives
#[derive(Debug)]
pub(crate) struct HeaderScan {
    pub metadata: Option<HeaderMetadata>,
    /// Lines read from the stream, including the one that completed the scan
    pub lines_consumed: usize,
}

/// Scan lines until both directives are found or the stream ends
pub(crate) fn scan_lines<R: BufRead>(lines: &mut RawLines<R>, path: &Path) -> Result<HeaderScan> {
    let mut scanner = HeaderScanner::new();
    let mut lines_consumed = 0;

    for line in lines.by_ref() {
        let line = line.map_err(|e| GmdError::io(path, e))?;
        lines_consumed += 1;

        scanner.observe(&line);
        if scanner.is_complete() {
            break;
        }
    }

    Ok(HeaderScan {
        metadata: scanner.finish(),
        lines_consumed,
    })
}

/// Extract the header directives from a GMD file.
///
/// Returns `Ok(None)` when either directive is absent. I/O failures,
/// including a missing file, are returned as errors.
pub fn scan_header(path: impl AsRef<Path>) -> Result<Option<HeaderMetadata>> {
    let path = path.as_ref();
    let mut lines = RawLines::open(path)?;
    let scan = scan_lines(&mut lines, path)?;

    debug!(
        "Scanned {} header lines of {}: recognised={}",
        scan.lines_consumed,
        path.display(),
        scan.metadata.is_some()
    );

    Ok(scan.metadata)
}

/// Line iterator tolerant of single-byte encodings.
///
/// Lines that are not valid UTF-8 are decoded as Latin-1, so older files
/// with accented station names still read. `\n`, `\r\n` and a bare `\r`
/// all end a line, the last for files written with classic Mac endings.
#[derive(Debug)]
pub(crate) struct RawLines<R> {
    reader: R,
    buf: Vec<u8>,
    pending: VecDeque<String>,
}

impl RawLines<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| GmdError::io(path, e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }

                // Any `\r` left in the chunk is a line break of its own
                self.pending
                    .extend(self.buf.split(|&b| b == b'\r').map(decode_line));
                self.pending.pop_front().map(Ok)
            }
            Err(e) => Some(Err(e)),
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
