//! M-Schema text rendering.
//!
//! Produces the prompt-facing description of a schema:
//!
//! ```text
//! 【DB_ID】 shop
//! 【Schema】
//! # Table: orders, Customer orders
//! [
//! (id:INTEGER, Primary Key),
//! (status:TEXT, Examples: [paid, shipped])
//! ]
//! 【Foreign keys】
//! orders.customer_id=customers.id
//! ```
//!
//! Rendering is best effort: unknown tables render with an empty field list
//! and foreign keys to tables outside the schema are simply filtered out.

use crate::model::{simplified_type, FieldEntry, MSchema};
use crate::sample::select_text_examples;

/// Default number of examples shown per field.
pub const DEFAULT_EXAMPLE_CAP: usize = 3;

/// Examples longer than this collapse to a single example.
const SUMMARIZE_LEN: usize = 20;

/// Examples longer than this are hidden entirely.
const HIDE_LEN: usize = 50;

const TEMPORAL_TYPES: [&str; 4] = ["DATE", "TIME", "DATETIME", "TIMESTAMP"];

/// Options for [`MSchema::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Table names to include (case-insensitive). Ignored when
    /// `selected_columns` is set.
    pub selected_tables: Option<Vec<String>>,
    /// `table.column` selectors (case-insensitive).
    pub selected_columns: Option<Vec<String>>,
    /// Maximum examples per field.
    pub example_cap: usize,
    /// Keep type parameters such as `(255)`.
    pub show_type_detail: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            selected_tables: None,
            selected_columns: None,
            example_cap: DEFAULT_EXAMPLE_CAP,
            show_type_detail: false,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_example_cap(mut self, example_cap: usize) -> Self {
        self.example_cap = example_cap;
        self
    }

    pub fn with_type_detail(mut self, show_type_detail: bool) -> Self {
        self.show_type_detail = show_type_detail;
        self
    }
}

/// Table and column filters after case folding.
struct Selection {
    tables: Option<Vec<String>>,
    columns: Option<Vec<String>>,
}

impl Selection {
    fn resolve(options: &RenderOptions) -> Self {
        let lower = |v: &Vec<String>| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();

        let columns = options.selected_columns.as_ref().map(lower);
        let tables = match &columns {
            // Column selectors decide the table set on their own.
            Some(cols) => Some(
                cols.iter()
                    // Table names may themselves be dotted (`aux.logs`).
                    .map(|c| c.rsplit_once('.').map_or(c.as_str(), |(t, _)| t).to_string())
                    .collect(),
            ),
            None => options.selected_tables.as_ref().map(lower),
        };

        Self { tables, columns }
    }

    fn includes_table(&self, table: &str) -> bool {
        match &self.tables {
            Some(tables) => tables.contains(&table.to_lowercase()),
            None => true,
        }
    }

    /// Lower-cased names of the table's columns that were selected, or
    /// `None` when no column filter applies.
    fn columns_for(&self, table: &str, field_names: &[&String]) -> Option<Vec<String>> {
        let selected = self.columns.as_ref()?;
        Some(
            field_names
                .iter()
                .filter(|c| selected.contains(&format!("{}.{}", table, c).to_lowercase()))
                .map(|c| c.to_lowercase())
                .collect(),
        )
    }
}

impl MSchema {
    /// Render one table.
    ///
    /// `selected_columns` is matched case-insensitively against field names.
    pub fn render_table(
        &self,
        table: &str,
        selected_columns: Option<&[String]>,
        example_cap: usize,
        show_type_detail: bool,
    ) -> String {
        let entry = self.table(table);
        let mut output = Vec::with_capacity(4);

        let qualified = match self.namespace() {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, table),
            _ => table.to_string(),
        };
        let comment = entry
            .and_then(|t| t.comment.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "None");
        match comment {
            Some(comment) => output.push(format!("# Table: {}, {}", qualified, comment)),
            None => output.push(format!("# Table: {}", qualified)),
        }

        let selected: Option<Vec<String>> =
            selected_columns.map(|cols| cols.iter().map(|c| c.to_lowercase()).collect());

        let field_lines: Vec<String> = entry
            .into_iter()
            .flat_map(|t| t.fields.iter())
            .filter(|(name, _)| match &selected {
                Some(cols) => cols.contains(&name.to_lowercase()),
                None => true,
            })
            .map(|(name, field)| render_field(name, field, example_cap, show_type_detail))
            .collect();

        output.push("[".to_string());
        output.push(field_lines.join(",\n"));
        output.push("]".to_string());
        output.join("\n")
    }

    /// Render the whole schema, or the subset selected by `options`.
    pub fn render(&self, options: &RenderOptions) -> String {
        let selection = Selection::resolve(options);
        let mut output = vec![format!("【DB_ID】 {}", self.db_id()), "【Schema】".to_string()];

        for (name, table) in self.tables() {
            if !selection.includes_table(name) {
                continue;
            }
            let field_names: Vec<&String> = table.fields.keys().collect();
            let columns = selection.columns_for(name, &field_names);
            output.push(self.render_table(
                name,
                columns.as_deref(),
                options.example_cap,
                options.show_type_detail,
            ));
        }

        if !self.foreign_keys().is_empty() {
            output.push("【Foreign keys】".to_string());
            let namespace = self.namespace().unwrap_or_default();
            for fk in self.foreign_keys() {
                let visible = selection.includes_table(fk.source_table())
                    && selection.includes_table(fk.referenced_table())
                    && fk.referenced_namespace() == namespace;
                if visible {
                    output.push(format!(
                        "{}.{}={}.{}",
                        fk.source_table(),
                        fk.source_column(),
                        fk.referenced_table(),
                        fk.referenced_column()
                    ));
                }
            }
        }

        output.join("\n")
    }

    /// Render with default options.
    pub fn to_mschema(&self) -> String {
        self.render(&RenderOptions::default())
    }
}

fn render_field(name: &str, field: &FieldEntry, example_cap: usize, show_type_detail: bool) -> String {
    let field_type = simplified_type(&field.field_type, !show_type_detail).to_uppercase();
    let mut line = format!("({}:{}", name, field_type);

    let comment = field.comment.trim();
    if !comment.is_empty() {
        line.push_str(", ");
        line.push_str(comment);
    }
    if field.primary_key {
        line.push_str(", Primary Key");
    }

    let examples = display_examples(&field.examples, &field_type, example_cap);
    if !examples.is_empty() {
        line.push_str(&format!(", Examples: [{}]", examples.join(", ")));
    }

    line.push(')');
    line
}

/// Trim examples for display: cap the count, then collapse long values to
/// one sample and hide very long ones.
fn display_examples(raw: &[String], field_type: &str, example_cap: usize) -> Vec<String> {
    if example_cap == 0 || raw.is_empty() {
        return Vec::new();
    }

    let mut examples = select_text_examples(raw);
    examples.truncate(example_cap);

    if TEMPORAL_TYPES.contains(&field_type) {
        examples.truncate(1);
        return examples;
    }

    let longest = examples.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    if longest > HIDE_LEN {
        examples.clear();
    } else if longest > SUMMARIZE_LEN {
        examples.truncate(1);
    }
    examples
}
