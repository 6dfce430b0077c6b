//! Reader configuration.
//!
//! The defaults reproduce the reference behaviour of the GMD reader, so most
//! callers never build a config and go through [`crate::read_data`].

use serde::{Deserialize, Serialize};

/// How data records whose token count differs from the field count are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedRowPolicy {
    /// Pad short rows with missing values and truncate long rows
    #[default]
    Pad,
    /// Skip any row whose token count does not match
    Drop,
}

/// Options for reading a GMD data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Policy for rows with too few or too many tokens
    pub ragged_rows: RaggedRowPolicy,

    /// Convert numeric-looking tokens to integers and floats
    pub coerce_numeric: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            ragged_rows: RaggedRowPolicy::Pad,
            coerce_numeric: true,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ragged_rows(mut self, policy: RaggedRowPolicy) -> Self {
        self.ragged_rows = policy;
        self
    }

    pub fn with_coerce_numeric(mut self, coerce: bool) -> Self {
        self.coerce_numeric = coerce;
        self
    }
}
