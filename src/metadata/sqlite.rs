//! SQLite implementation of [`Introspector`].
//!
//! SQLite has no schemas in the PostgreSQL sense; attached databases play
//! that role. `main` is always present, `temp` is skipped.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::provider::{ColumnInfo, ForeignKeyInfo, IntrospectResult, Introspector};
use crate::model::simplified_type;
use crate::sample::SampleValue;

const TEMPORAL_TYPES: [&str; 4] = ["DATE", "TIME", "DATETIME", "TIMESTAMP"];

/// Reads schema facts from a SQLite database.
pub struct SqliteIntrospector {
    conn: Connection,
}

impl SqliteIntrospector {
    /// Open a database file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> IntrospectResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening SQLite database for introspection");
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_sql(&self, namespace: &str, table: &str) -> IntrospectResult<Option<String>> {
        let sql = format!(
            "SELECT sql FROM {}.sqlite_master WHERE type = 'table' AND name = ?1",
            quote_ident(namespace)
        );
        let ddl: Option<Option<String>> = self
            .conn
            .query_row(&sql, params![table], |row| row.get(0))
            .optional()?;
        Ok(ddl.flatten())
    }

    /// Names of the primary key columns of a table, in key order.
    fn primary_key_columns(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<String>> {
        let mut keyed: Vec<(i64, String)> = self
            .table_info(namespace, table)?
            .into_iter()
            .filter(|c| c.pk > 0)
            .map(|c| (c.pk, c.name))
            .collect();
        keyed.sort_by_key(|(pk, _)| *pk);
        Ok(keyed.into_iter().map(|(_, name)| name).collect())
    }

    fn table_info(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<TableInfoRow>> {
        let sql = format!(
            "PRAGMA {}.table_info({})",
            quote_ident(namespace),
            quote_ident(table)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TableInfoRow {
                    name: row.get(1)?,
                    data_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(3)? != 0,
                    default: row.get(4)?,
                    pk: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// One row of `PRAGMA table_info`.
struct TableInfoRow {
    name: String,
    data_type: String,
    not_null: bool,
    default: Option<String>,
    pk: i64,
}

impl Introspector for SqliteIntrospector {
    fn list_namespaces(&self) -> IntrospectResult<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA database_list")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.into_iter().filter(|n| n != "temp").collect())
    }

    fn list_tables(&self, namespace: &str) -> IntrospectResult<Vec<String>> {
        let sql = format!(
            "SELECT name FROM {}.sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            quote_ident(namespace)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tables = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        tracing::trace!(namespace, count = tables.len(), "listed tables");
        Ok(tables)
    }

    fn table_comment(&self, _namespace: &str, _table: &str) -> IntrospectResult<Option<String>> {
        // SQLite does not store table comments.
        Ok(None)
    }

    fn columns(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<ColumnInfo>> {
        let rows = self.table_info(namespace, table)?;
        let declares_autoincrement = self
            .table_sql(namespace, table)?
            .map(|ddl| ddl.to_uppercase().contains("AUTOINCREMENT"))
            .unwrap_or(false);

        Ok(rows
            .into_iter()
            .map(|row| {
                let data_type = row.data_type.to_uppercase();
                let primary_key = row.pk > 0;
                ColumnInfo {
                    autoincrement: primary_key && data_type == "INTEGER" && declares_autoincrement,
                    name: row.name,
                    data_type,
                    not_null: row.not_null,
                    default: row.default,
                    primary_key,
                    comment: String::new(),
                }
            })
            .collect())
    }

    fn foreign_keys(&self, namespace: &str, table: &str) -> IntrospectResult<Vec<ForeignKeyInfo>> {
        let sql = format!(
            "PRAGMA {}.foreign_key_list({})",
            quote_ident(namespace),
            quote_ident(table)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, i64>(1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut fks = Vec::with_capacity(rows.len());
        for (referenced_table, column, to, seq) in rows {
            // A reference without a column list targets the primary key.
            let referenced_column = match to {
                Some(col) => col,
                None => self
                    .primary_key_columns(namespace, &referenced_table)?
                    .into_iter()
                    .nth(seq as usize)
                    .unwrap_or_default(),
            };
            fks.push(ForeignKeyInfo {
                column,
                referenced_namespace: namespace.to_string(),
                referenced_table,
                referenced_column,
            });
        }
        Ok(fks)
    }

    fn distinct_values(
        &self,
        namespace: &str,
        table: &str,
        column: &str,
        limit: usize,
    ) -> IntrospectResult<Vec<SampleValue>> {
        let sql = format!(
            "SELECT DISTINCT {} FROM {}.{} LIMIT {}",
            quote_ident(column),
            quote_ident(namespace),
            quote_ident(table),
            limit
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let temporal = stmt
            .columns()
            .first()
            .and_then(|c| c.decl_type())
            .map(|t| TEMPORAL_TYPES.contains(&simplified_type(&t.to_uppercase(), true)))
            .unwrap_or(false);

        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let value = match row.get_ref(0)? {
                ValueRef::Null => continue,
                ValueRef::Integer(i) => SampleValue::Integer(i),
                ValueRef::Real(r) => SampleValue::Real(r),
                ValueRef::Text(bytes) => {
                    let text = String::from_utf8_lossy(bytes).into_owned();
                    if text.is_empty() {
                        continue;
                    }
                    if temporal {
                        SampleValue::Temporal(text)
                    } else {
                        SampleValue::Text(text)
                    }
                }
                ValueRef::Blob(bytes) => SampleValue::Blob(bytes.len()),
            };
            values.push(value);
        }
        Ok(values)
    }
}

/// Quote an identifier for interpolation into SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
