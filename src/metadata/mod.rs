//! Metadata introspection module.
//!
//! This module reads raw schema facts from a live database and feeds them
//! into an [`MSchema`](crate::model::MSchema).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     SchemaBuilder                        │
//! │  add_table / add_foreign_key / add_field                 │
//! │  select_examples(distinct values)                        │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Introspector (trait)                     │
//! │  - list_namespaces()     - columns()                     │
//! │  - list_tables()         - foreign_keys()                │
//! │  - table_comment()       - distinct_values()             │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!                  SqliteIntrospector (rusqlite)
//! ```
//!
//! Failures to fetch sample values do not abort a build; they are returned
//! as [`BuildIssue`]s alongside the schema.

mod builder;
mod provider;
mod sqlite;

pub use builder::{BuildIssue, BuildReport, SchemaBuilder, DEFAULT_SAMPLE_LIMIT};
pub use provider::{
    ColumnInfo, ForeignKeyInfo, IntrospectError, IntrospectResult, Introspector, SampleOutcome,
};
pub use sqlite::SqliteIntrospector;
