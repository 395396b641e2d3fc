//! Builds an [`MSchema`] from an [`Introspector`].

use indexmap::IndexMap;

use super::provider::{IntrospectError, IntrospectResult, Introspector, SampleOutcome};
use crate::model::{FieldSpec, MSchema, ANONYMOUS_DB_ID};
use crate::sample::select_examples;

/// Default number of distinct values fetched per column.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Namespace whose tables are left unqualified when no namespace is chosen.
const PRIMARY_NAMESPACE: &str = "main";

/// A non-fatal problem hit while building a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildIssue {
    /// Sample values for a column could not be fetched.
    SamplesUnavailable {
        table: String,
        column: String,
        reason: String,
    },
}

/// A built schema plus everything that went wrong along the way.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub schema: MSchema,
    pub issues: Vec<BuildIssue>,
}

/// Drives an introspector and populates a fresh schema.
///
/// # Example
///
/// ```ignore
/// use mschema::metadata::{SchemaBuilder, SqliteIntrospector};
///
/// let introspector = SqliteIntrospector::open("shop.sqlite")?;
/// let report = SchemaBuilder::new("shop").build(&introspector)?;
/// println!("{}", report.schema.to_mschema());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    db_id: String,
    namespace: Option<String>,
    sample_limit: usize,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new(ANONYMOUS_DB_ID)
    }
}

impl SchemaBuilder {
    pub fn new(db_id: impl Into<String>) -> Self {
        Self {
            db_id: db_id.into(),
            namespace: None,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    /// Restrict the build to one namespace; it also becomes the schema's
    /// namespace.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    pub fn build(&self, introspector: &dyn Introspector) -> IntrospectResult<BuildReport> {
        let available = introspector.list_namespaces()?;
        let namespaces = match &self.namespace {
            Some(ns) if available.contains(ns) => vec![ns.clone()],
            Some(ns) => return Err(IntrospectError::UnknownNamespace(ns.clone())),
            None => available,
        };

        let mut schema = MSchema::new(self.db_id.clone(), self.namespace.clone());
        let mut issues = Vec::new();

        for namespace in &namespaces {
            for table in introspector.list_tables(namespace)? {
                let name = self.display_name(namespace, &table);
                let comment = introspector.table_comment(namespace, &table)?;
                schema.add_table(name.clone(), IndexMap::new(), comment);

                for fk in introspector.foreign_keys(namespace, &table)? {
                    schema.add_foreign_key(
                        name.clone(),
                        fk.column,
                        self.edge_namespace(&fk.referenced_namespace),
                        fk.referenced_table,
                        fk.referenced_column,
                    );
                }

                for column in introspector.columns(namespace, &table)? {
                    let outcome =
                        introspector.sample_values(namespace, &table, &column.name, self.sample_limit);
                    if let SampleOutcome::Unavailable { reason } = &outcome {
                        tracing::warn!(
                            table = %name,
                            column = %column.name,
                            %reason,
                            "sample values unavailable"
                        );
                        issues.push(BuildIssue::SamplesUnavailable {
                            table: name.clone(),
                            column: column.name.clone(),
                            reason: reason.clone(),
                        });
                    }

                    let spec = FieldSpec::new(column.data_type)
                        .nullable(!column.not_null)
                        .maybe_default(column.default)
                        .autoincrement(column.autoincrement)
                        .comment(column.comment)
                        .examples(select_examples(outcome.values()));
                    let spec = if column.primary_key { spec.primary_key() } else { spec };
                    schema.add_field(&name, column.name, spec)?;
                }
            }
        }

        tracing::debug!(
            db_id = %self.db_id,
            tables = schema.tables().len(),
            foreign_keys = schema.foreign_keys().len(),
            issues = issues.len(),
            "schema built"
        );
        Ok(BuildReport { schema, issues })
    }

    /// Table name as stored in the schema.
    ///
    /// With an explicit namespace the schema carries the qualifier, so names
    /// stay bare. Otherwise only tables outside the primary namespace are
    /// qualified.
    fn display_name(&self, namespace: &str, table: &str) -> String {
        if self.namespace.is_some() || namespace == PRIMARY_NAMESPACE {
            table.to_string()
        } else {
            format!("{}.{}", namespace, table)
        }
    }

    /// Referenced namespace as recorded on an edge, comparable with the
    /// schema's own namespace.
    fn edge_namespace(&self, referenced: &str) -> String {
        if self.namespace.is_none() && referenced == PRIMARY_NAMESPACE {
            String::new()
        } else {
            referenced.to_string()
        }
    }
}
