//! Schema model.
//!
//! The in-memory form of a database schema: tables with ordered fields,
//! foreign key edges, and the database id and namespace that identify it.
//! [`MSchema`] also owns rendering (see [`crate::render`]) and the lossless
//! JSON document form (see [`document`]).

pub mod document;
mod schema;
mod types;

pub use schema::{MSchema, ANONYMOUS_DB_ID};
pub use types::{simplified_type, FieldEntry, FieldSpec, ForeignKeyEdge, TableEntry};
