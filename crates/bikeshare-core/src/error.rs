use std::path::PathBuf;
use thiserror::Error;

use crate::models::OptionalField;

/// All load-time and validation errors produced by the bikeshare crates.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// The requested city is not part of the configured catalog.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A source file could not be opened or its bytes could not be read.
    #[error("Source unavailable {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header line of a source could not be decoded as CSV.
    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column header is missing from the source.
    #[error("Source {path} is missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    /// A row carries a value that cannot be interpreted.
    #[error("Malformed record at row {row}: invalid {field} \"{value}\"")]
    MalformedRecord {
        row: usize,
        field: String,
        value: String,
    },

    /// A free-text selection did not match its enumeration.
    #[error("Invalid {kind}: \"{value}\". Acceptable values are {expected}")]
    InvalidSelection {
        kind: &'static str,
        value: String,
        expected: String,
    },

}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;

/// Expected, non-fatal conditions reported by the statistic groups.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatError {
    /// The filtered view holds no records (or no usable values).
    #[error("No data for this selection")]
    NoData,

    /// The dataset does not carry the optional column.
    #[error("No user {0} information available for this city")]
    FieldNotAvailable(OptionalField),
}
