//! Top-level raw tree: a database of schemas.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Ref, Table};

/// Name given to the schema when the source declares none.
pub const DEFAULT_SCHEMA_NAME: &str = "public";

/// A schema: an ordered list of tables and an ordered list of refs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name.
    pub name: SmolStr,
    /// Tables in declaration order. Duplicates are allowed here; the
    /// validator reports them.
    pub tables: Vec<Table>,
    /// Cross-table references in declaration order.
    pub refs: Vec<Ref>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            tables: vec![],
            refs: vec![],
        }
    }

    /// Look up a table by name. Returns the first declaration when the name
    /// is duplicated.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_NAME)
    }
}

/// The complete raw tree produced by one parse call.
///
/// Raw trees are per-call values; nothing in this crate caches them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Schemas in document order.
    pub schemas: Vec<Schema>,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database holding a single schema.
    pub fn single(schema: Schema) -> Self {
        Self {
            schemas: vec![schema],
        }
    }

    /// Total number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }

    /// Total number of refs across all schemas.
    pub fn ref_count(&self) -> usize {
        self.schemas.iter().map(|s| s.refs.len()).sum()
    }

    /// Idempotent cleanup of parser-level variance: fills the default schema
    /// name, lowercases type names, strips whitespace from type arguments,
    /// and lowercases action hint strings. Never adds or removes tables,
    /// fields, or refs.
    pub fn normalize(mut self) -> Database {
        for schema in &mut self.schemas {
            if schema.name.trim().is_empty() {
                schema.name = DEFAULT_SCHEMA_NAME.into();
            }
            for table in &mut schema.tables {
                for field in &mut table.fields {
                    if let Some(desc) = &field.type_desc {
                        field.type_desc = Some(desc.normalized());
                    }
                    for endpoint in &mut field.endpoints {
                        normalize_actions(endpoint);
                    }
                }
            }
            for r in &mut schema.refs {
                for endpoint in &mut r.endpoints {
                    normalize_actions(endpoint);
                }
            }
        }
        self
    }
}

fn normalize_actions(endpoint: &mut super::Endpoint) {
    if let Some(relation) = &mut endpoint.relation {
        if let Some(action) = &relation.on_delete {
            relation.on_delete = Some(action.trim().to_lowercase().into());
        }
        if let Some(action) = &relation.on_update {
            relation.on_update = Some(action.trim().to_lowercase().into());
        }
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Database({} schemas, {} tables, {} refs)",
            self.schemas.len(),
            self.table_count(),
            self.ref_count()
        )
    }
}
