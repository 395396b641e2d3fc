// src/model/schema.rs
use indexmap::IndexMap;

use super::types::{simplified_type, FieldEntry, FieldSpec, ForeignKeyEdge, TableEntry};
use crate::error::{SchemaError, SchemaResult};

/// Database id used when none is known.
pub const ANONYMOUS_DB_ID: &str = "Anonymous";

/// In-memory schema of one database.
///
/// Built once through [`add_table`](Self::add_table),
/// [`add_field`](Self::add_field) and
/// [`add_foreign_key`](Self::add_foreign_key), then rendered or dumped.
/// Table and field maps keep insertion order, which is also render order.
#[derive(Debug, Clone, PartialEq)]
pub struct MSchema {
    pub(crate) db_id: String,
    pub(crate) namespace: Option<String>,
    pub(crate) tables: IndexMap<String, TableEntry>,
    pub(crate) foreign_keys: Vec<ForeignKeyEdge>,
}

impl Default for MSchema {
    fn default() -> Self {
        Self::new(ANONYMOUS_DB_ID, None)
    }
}

impl MSchema {
    /// Create an empty schema.
    ///
    /// An empty `db_id` becomes [`ANONYMOUS_DB_ID`] and an empty namespace
    /// becomes `None`, matching what [`load`](Self::load) produces.
    pub fn new(db_id: impl Into<String>, namespace: Option<String>) -> Self {
        let db_id = db_id.into();
        Self {
            db_id: if db_id.is_empty() {
                ANONYMOUS_DB_ID.to_string()
            } else {
                db_id
            },
            namespace: namespace.filter(|ns| !ns.is_empty()),
            tables: IndexMap::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn db_id(&self) -> &str {
        &self.db_id
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn tables(&self) -> &IndexMap<String, TableEntry> {
        &self.tables
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyEdge] {
        &self.foreign_keys
    }

    /// Insert or replace a table.
    ///
    /// Replacing keeps the table's original position and resets its
    /// table-level examples.
    pub fn add_table(
        &mut self,
        name: impl Into<String>,
        fields: IndexMap<String, FieldEntry>,
        comment: Option<String>,
    ) {
        self.tables.insert(
            name.into(),
            TableEntry {
                fields,
                examples: Vec::new(),
                comment,
            },
        );
    }

    /// Insert or replace a field of an existing table.
    pub fn add_field(
        &mut self,
        table: &str,
        field: impl Into<String>,
        spec: FieldSpec,
    ) -> SchemaResult<()> {
        let entry = self
            .tables
            .get_mut(table)
            .ok_or_else(|| SchemaError::UnknownTable(table.to_string()))?;
        entry.fields.insert(field.into(), spec.into());
        Ok(())
    }

    /// Append a foreign key edge. Endpoints are not checked and duplicates
    /// are kept.
    pub fn add_foreign_key(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        referenced_namespace: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) {
        self.foreign_keys.push(ForeignKeyEdge::new(
            table,
            column,
            referenced_namespace,
            referenced_table,
            referenced_column,
        ));
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn has_column(&self, table: &str, field: &str) -> bool {
        self.field_info(table, field).is_some()
    }

    pub fn table(&self, name: &str) -> Option<&TableEntry> {
        self.tables.get(name)
    }

    /// Look up a field; `None` when either the table or the field is missing.
    pub fn field_info(&self, table: &str, field: &str) -> Option<&FieldEntry> {
        self.tables.get(table).and_then(|t| t.field(field))
    }

    /// See [`simplified_type`].
    pub fn simplified_type<'a>(&self, raw_type: &'a str, simple: bool) -> &'a str {
        simplified_type(raw_type, simple)
    }
}
