//! Field definitions for the raw tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{DefaultValue, Endpoint, Span, TypeDescriptor};

/// A column definition inside a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: SmolStr,
    /// Type descriptor; absent when the source did not declare a type.
    pub type_desc: Option<TypeDescriptor>,
    /// Primary-key flag.
    pub pk: bool,
    /// Not-null flag.
    pub not_null: bool,
    /// Unique flag.
    pub unique: bool,
    /// Auto-increment flag.
    pub increment: bool,
    /// Default literal, if declared.
    pub default: Option<DefaultValue>,
    /// Free-text note attached to the column.
    pub note: Option<String>,
    /// Relationship endpoints targeting other tables. Only the first is
    /// meaningful to the converter; extras are ignored downstream.
    pub endpoints: Vec<Endpoint>,
    /// Source location.
    pub span: Span,
}

impl Field {
    /// Create a new field with all flags cleared.
    pub fn new(name: impl Into<SmolStr>, type_desc: Option<TypeDescriptor>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_desc,
            pk: false,
            not_null: false,
            unique: false,
            increment: false,
            default: None,
            note: None,
            endpoints: vec![],
            span,
        }
    }

    /// Get the field name as a string.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the default literal.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attach a relationship endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// The first relationship endpoint, if any.
    pub fn first_endpoint(&self) -> Option<&Endpoint> {
        self.endpoints.first()
    }
}
