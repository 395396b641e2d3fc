// src/model/types.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldEntry {
    /// Declared type, possibly parameterized (`VARCHAR(255)`).
    #[serde(rename = "type")]
    pub field_type: String,
    pub primary_key: bool,
    pub nullable: bool,
    /// Default value in text form. `None` means no default, which is not
    /// the same as the text `"None"`.
    pub default: Option<String>,
    pub autoincrement: bool,
    pub comment: String,
    /// Sample values in display form.
    pub examples: Vec<String>,
}

impl Default for FieldEntry {
    fn default() -> Self {
        FieldSpec::default().into()
    }
}

/// A table: its fields in column order, an optional comment and reserved
/// table-level examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableEntry {
    pub fields: IndexMap<String, FieldEntry>,
    /// Reserved; carried through serialization but never rendered.
    pub examples: Vec<String>,
    pub comment: Option<String>,
}

impl TableEntry {
    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }
}

/// A foreign key edge.
///
/// Serialized as a five element array:
/// `[source_table, source_column, referenced_namespace, referenced_table, referenced_column]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyEdge(
    pub String,
    pub String,
    pub String,
    pub String,
    pub String,
);

impl ForeignKeyEdge {
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        referenced_namespace: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self(
            source_table.into(),
            source_column.into(),
            referenced_namespace.into(),
            referenced_table.into(),
            referenced_column.into(),
        )
    }

    pub fn source_table(&self) -> &str {
        &self.0
    }

    pub fn source_column(&self) -> &str {
        &self.1
    }

    pub fn referenced_namespace(&self) -> &str {
        &self.2
    }

    pub fn referenced_table(&self) -> &str {
        &self.3
    }

    pub fn referenced_column(&self) -> &str {
        &self.4
    }
}

/// Options for adding a field.
///
/// Every recognized attribute is spelled out; unspecified ones fall back to
/// the defaults below (nullable, no key, no default, no comment, no examples).
///
/// ```
/// use mschema::model::FieldSpec;
///
/// let spec = FieldSpec::new("INTEGER").primary_key().not_null().default_value(0);
/// assert_eq!(spec.default.as_deref(), Some("0"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub field_type: String,
    pub primary_key: bool,
    pub nullable: bool,
    pub default: Option<String>,
    pub autoincrement: bool,
    pub comment: String,
    pub examples: Vec<String>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            field_type: String::new(),
            primary_key: false,
            nullable: true,
            default: None,
            autoincrement: false,
            comment: String::new(),
            examples: Vec::new(),
        }
    }
}

impl FieldSpec {
    /// Spec with the given declared type and default options.
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the default value; numbers and booleans are stored as text.
    pub fn default_value(mut self, value: impl ToString) -> Self {
        self.default = Some(value.to_string());
        self
    }

    /// Set or clear the default value.
    pub fn maybe_default(mut self, value: Option<impl ToString>) -> Self {
        self.default = value.map(|v| v.to_string());
        self
    }

    pub fn autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}

impl From<FieldSpec> for FieldEntry {
    fn from(spec: FieldSpec) -> Self {
        Self {
            field_type: spec.field_type,
            primary_key: spec.primary_key,
            nullable: spec.nullable,
            default: spec.default,
            autoincrement: spec.autoincrement,
            comment: spec.comment,
            examples: spec.examples,
        }
    }
}

/// Collapse a parameterized type to its base name.
///
/// With `simple` set, returns everything before the first `(`
/// (`VARCHAR(255)` becomes `VARCHAR`); otherwise returns `raw_type` as is.
pub fn simplified_type(raw_type: &str, simple: bool) -> &str {
    if !simple {
        return raw_type;
    }
    match raw_type.find('(') {
        Some(idx) => &raw_type[..idx],
        None => raw_type,
    }
}
