//! Error types for the schema model and its document form.

use thiserror::Error;

/// Result type for schema model operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors surfaced by the schema model.
///
/// Lookups of unknown tables or columns are not errors; they resolve to
/// `None` or empty output. Only mutations against a table that was never
/// added and structurally invalid documents fail.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A field was added to a table that does not exist.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A persisted document had the wrong shape for a present key.
    #[error("invalid schema document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}
