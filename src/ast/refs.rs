//! Cross-table reference definitions for the raw tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{RelationDescriptor, Span};

/// One side of a cross-table reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The table this endpoint names; absent in malformed input.
    pub table_name: Option<SmolStr>,
    /// Ordered column names on that table. Composite references carry more
    /// than one; downstream consumers only inspect the first.
    pub field_names: Vec<SmolStr>,
    /// Relation descriptor (cardinality marker plus action hints).
    pub relation: Option<RelationDescriptor>,
}

impl Endpoint {
    /// Create an endpoint naming a table and its columns.
    pub fn new(table_name: impl Into<SmolStr>, field_names: Vec<SmolStr>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            field_names,
            relation: None,
        }
    }

    /// Create an endpoint that names no table (malformed input shape).
    pub fn anonymous() -> Self {
        Self {
            table_name: None,
            field_names: vec![],
            relation: None,
        }
    }

    /// Set the relation descriptor.
    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relation = Some(relation);
        self
    }

    /// The first column name, if any.
    pub fn first_field(&self) -> Option<&SmolStr> {
        self.field_names.first()
    }
}

/// A cross-table reference between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    /// Numeric identity, unique within a parsed document.
    pub id: u32,
    /// Optional reference name.
    pub name: Option<SmolStr>,
    /// Endpoints, source first. Well-formed refs have exactly two.
    pub endpoints: Vec<Endpoint>,
    /// Source location.
    pub span: Span,
}

impl Ref {
    /// Create a new reference.
    pub fn new(id: u32, endpoints: Vec<Endpoint>, span: Span) -> Self {
        Self {
            id,
            name: None,
            endpoints,
            span,
        }
    }

    /// Set the reference name.
    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name used in defect messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}
