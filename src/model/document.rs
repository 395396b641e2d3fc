// src/model/document.rs
//! Lossless JSON form of an [`MSchema`].
//!
//! ```json
//! {
//!   "db_id": "shop",
//!   "schema": null,
//!   "tables": {
//!     "orders": {
//!       "fields": {
//!         "id": {"type": "INTEGER", "primary_key": true, "nullable": false,
//!                "default": null, "autoincrement": true, "comment": "", "examples": []}
//!       },
//!       "examples": [],
//!       "comment": null
//!     }
//!   },
//!   "foreign_keys": [["orders", "customer_id", "", "customers", "id"]]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{MSchema, ANONYMOUS_DB_ID};
use super::types::{ForeignKeyEdge, TableEntry};
use crate::error::SchemaResult;

#[derive(Serialize)]
struct DocumentRef<'a> {
    db_id: &'a str,
    schema: Option<&'a str>,
    tables: &'a IndexMap<String, TableEntry>,
    foreign_keys: &'a [ForeignKeyEdge],
}

/// Incoming document; every top-level key may be missing or null.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    db_id: Option<String>,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    tables: Option<IndexMap<String, TableEntry>>,
    #[serde(default)]
    foreign_keys: Option<Vec<ForeignKeyEdge>>,
}

impl MSchema {
    /// Produce the structured document. No filtering or type simplification
    /// is applied.
    pub fn dump(&self) -> SchemaResult<Value> {
        let doc = DocumentRef {
            db_id: &self.db_id,
            schema: self.namespace.as_deref(),
            tables: &self.tables,
            foreign_keys: &self.foreign_keys,
        };
        Ok(serde_json::to_value(doc)?)
    }

    /// Replace all state with the contents of `document`.
    ///
    /// Missing keys fall back to an anonymous, empty schema. A key with the
    /// wrong shape is an error and leaves `self` unchanged.
    pub fn load(&mut self, document: Value) -> SchemaResult<()> {
        let raw: RawDocument = serde_json::from_value(document)?;

        self.db_id = raw
            .db_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| ANONYMOUS_DB_ID.to_string());
        self.namespace = raw.schema.filter(|s| !s.is_empty());
        self.tables = raw.tables.unwrap_or_default();
        self.foreign_keys = raw.foreign_keys.unwrap_or_default();
        Ok(())
    }

    /// Build a schema from a structured document.
    pub fn from_document(document: Value) -> SchemaResult<Self> {
        let mut schema = Self::default();
        schema.load(document)?;
        Ok(schema)
    }

    /// Serialize to indented JSON text.
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(&self.dump()?)?)
    }

    /// Parse JSON text produced by [`to_json_pretty`](Self::to_json_pretty).
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_document(value)
    }
}
