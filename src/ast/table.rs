//! Table definitions for the raw tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Field, Span};

/// A table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Numeric identity, unique within a parsed document.
    pub id: u32,
    /// Table name.
    pub name: SmolStr,
    /// Optional alias (`Table posts as P`). Endpoints are alias-resolved at
    /// parse time, so the alias is informational after parsing.
    pub alias: Option<SmolStr>,
    /// Ordered column definitions.
    pub fields: Vec<Field>,
    /// Free-text note attached to the table.
    pub note: Option<String>,
    /// Source location.
    pub span: Span,
}

impl Table {
    /// Create a new table with no fields.
    pub fn new(id: u32, name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            id,
            name: name.into(),
            alias: None,
            fields: vec![],
            note: None,
            span,
        }
    }

    /// Get the table name as a string.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the alias.
    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Append a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
