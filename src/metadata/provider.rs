//! Introspector trait definition.
//!
//! The Introspector trait abstracts over the database engine that supplies
//! raw schema facts. The schema model never talks to a database itself; a
//! [`SchemaBuilder`](super::SchemaBuilder) drives an introspector and feeds
//! the model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SchemaError;
use crate::sample::SampleValue;

/// Result type for introspection operations.
pub type IntrospectResult<T> = Result<T, IntrospectError>;

/// Errors that can occur while reading metadata from a database.
#[derive(Error, Debug)]
pub enum IntrospectError {
    /// The underlying SQLite call failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The requested namespace (schema / attached database) does not exist.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// Feeding the schema model failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A column as reported by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, upper-cased.
    pub data_type: String,
    pub not_null: bool,
    /// Default expression as declared.
    pub default: Option<String>,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub comment: String,
}

/// A foreign key constraint originating from a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    pub column: String,
    pub referenced_namespace: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Outcome of fetching sample values for one column.
///
/// A failed fetch is not fatal to schema construction, but callers can tell
/// it apart from a column that simply has no data.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// Values were fetched (possibly none).
    Fetched(Vec<SampleValue>),
    /// Values could not be fetched.
    Unavailable { reason: String },
}

impl SampleOutcome {
    /// Fetched values, or an empty slice when unavailable.
    pub fn values(&self) -> &[SampleValue] {
        match self {
            Self::Fetched(values) => values,
            Self::Unavailable { .. } => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Source of raw schema facts.
///
/// `namespace` is the engine's schema qualifier (for SQLite, the name of a
/// main or attached database).
pub trait Introspector {
    /// List namespaces that hold user tables.
    fn list_namespaces(&self) -> IntrospectResult<Vec<String>>;

    /// List user tables of a namespace, in catalog order.
    fn list_tables(&self, namespace: &str) -> IntrospectResult<Vec<String>>;

    /// Free-text description of a table, if the engine stores one.
    fn table_comment(&self, namespace: &str, table: &str) -> IntrospectResult<Option<String>>;

    /// Columns of a table, in declaration order.
    fn columns(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<ColumnInfo>>;

    /// Foreign keys declared on a table.
    fn foreign_keys(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<ForeignKeyInfo>>;

    /// Up to `limit` distinct, non-null, non-empty values of a column.
    fn distinct_values(
        &self,
        namespace: &str,
        table: &str,
        column: &str,
        limit: usize,
    ) -> IntrospectResult<Vec<SampleValue>>;

    /// Fetch sample values, turning failures into [`SampleOutcome::Unavailable`].
    fn sample_values(&self, namespace: &str, table: &str, column: &str, limit: usize) -> SampleOutcome {
        match self.distinct_values(namespace, table, column, limit) {
            Ok(values) => SampleOutcome::Fetched(values),
            Err(e) => SampleOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}
