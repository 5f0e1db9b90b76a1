//! Error types for opossum-rs

use thiserror::Error;

/// Main error type for oPOSSUM scoring operations
#[derive(Error, Debug)]
pub enum OpossumError {
    #[error(
        "TF ID universe mismatch at position {position}: background has '{background_id}', target has '{target_id}'"
    )]
    TfSetMismatch {
        position: usize,
        background_id: String,
        target_id: String,
    },

    #[error(
        "TF ID universe mismatch: background has {background_len} TF IDs, target has {target_len}"
    )]
    TfSetSizeMismatch {
        background_len: usize,
        target_len: usize,
    },

    #[error("Invalid search-region length for {which} set: {length} (must be positive)")]
    InvalidSearchLength { which: String, length: u64 },

    #[error("No profile width supplied for TF '{tf_id}'")]
    MissingProfileWidth { tf_id: String },

    #[error("Unsupported sort field: '{field}'")]
    UnsupportedSortField { field: String },

    #[error("Unknown reference distribution: '{name}'")]
    UnknownDistribution { name: String },

    #[error("Invalid table: {reason}")]
    InvalidTable { reason: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for oPOSSUM scoring operations
pub type Result<T> = std::result::Result<T, OpossumError>;
