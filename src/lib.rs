//! # mschema
//!
//! Turns relational database metadata into M-Schema: a compact text
//! description of tables, columns, keys, foreign keys and sample values,
//! meant to be embedded in text-to-SQL prompts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           Introspector (SQLite, or your own)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [SchemaBuilder + select_examples]
//! ┌─────────────────────────────────────────────────────────┐
//! │        MSchema (tables, fields, foreign keys)           │
//! └─────────────────────────────────────────────────────────┘
//!              │                              │
//!              ▼ [render]                     ▼ [dump / load]
//! ┌───────────────────────────┐  ┌──────────────────────────┐
//! │      M-Schema text        │  │  JSON document / cache   │
//! └───────────────────────────┘  └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use indexmap::IndexMap;
//! use mschema::{FieldSpec, MSchema};
//!
//! let mut schema = MSchema::new("shop", None);
//! schema.add_table("orders", IndexMap::new(), None);
//! schema
//!     .add_field("orders", "id", FieldSpec::new("INTEGER").primary_key())
//!     .unwrap();
//!
//! assert!(schema.to_mschema().contains("(id:INTEGER, Primary Key)"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod render;
pub mod sample;

pub use error::{SchemaError, SchemaResult};
pub use model::{FieldEntry, FieldSpec, ForeignKeyEdge, MSchema, TableEntry};
pub use render::RenderOptions;
pub use sample::{select_examples, SampleValue};
