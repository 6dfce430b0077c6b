//! Format constants for NOAA ESRL GMD ASCII data files
//!
//! The directive patterns and the delimiter convention are fixed by the
//! published file format and are not configurable.

// =============================================================================
// Header Directives
// =============================================================================

/// Marker that starts every header comment line
pub const COMMENT_MARKER: char = '#';

/// Directive giving the number of leading lines before the data section.
///
/// The count includes the directive line itself and every other comment line.
pub const HEADER_LINES_PATTERN: &str = r"^#\s*number_of_header_lines:\s*(?P<header_lines>\d+)";

/// Directive listing the column labels, separated by whitespace
pub const DATA_FIELDS_PATTERN: &str = r"^#\s*data_fields:\s*(?P<data_fields>\S.*)";

/// Capture group holding the header line count
pub const HEADER_LINES_GROUP: &str = "header_lines";

/// Capture group holding the raw field list
pub const DATA_FIELDS_GROUP: &str = "data_fields";

// =============================================================================
// Data Section
// =============================================================================

/// Numeric literal accepted for coercion: optional sign, digits with an
/// optional fraction (or a bare fraction), optional exponent
pub const NUMERIC_PATTERN: &str = r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$";

/// Non-finite spellings read as floats: `nan`, `inf`, `infinity`, any case
pub const SPECIAL_FLOAT_PATTERN: &str = r"^[+-]?(?i:nan|inf|infinity)$";

/// Integer literal, the subset of [`NUMERIC_PATTERN`] read as `i64`
pub const INTEGER_PATTERN: &str = r"^[+-]?\d+$";
