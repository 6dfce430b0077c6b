//! Error handling for GMD file reading.
//!
//! Only genuine failures live here. A file that lacks the header directives
//! is not an error: it reads as an empty table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GmdError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl GmdError {
    /// Wrap an I/O error with the path being read
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, GmdError>;
