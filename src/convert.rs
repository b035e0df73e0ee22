//! Raw tree → graph model conversion.
//!
//! Conversion is maximally lenient: missing types fall back to a placeholder,
//! malformed refs are dropped from the edge list, and nothing here reports
//! defects. That separation keeps the validator the single source of
//! structural error reporting.

use smol_str::SmolStr;

use crate::ast::{Database, Field, Ref, Table, TypeDescriptor};
use crate::graph::{
    Cardinality, Column, ForeignKeyRef, GraphModel, RelationshipEdge, TableNode,
};

/// Convert a raw tree into the graph model.
///
/// Two passes per schema: all tables first, then all refs, so edge
/// construction can rely on table identities being settled. Order is
/// preserved in both lists and nothing is deduplicated.
pub fn to_graph(database: &Database) -> GraphModel {
    let mut tables = Vec::new();
    let mut relationships = Vec::new();

    for schema in &database.schemas {
        for table in &schema.tables {
            tables.push(convert_table(table));
        }
    }

    for schema in &database.schemas {
        for r in &schema.refs {
            if let Some(edge) = convert_ref(r) {
                relationships.push(edge);
            }
        }
    }

    GraphModel {
        tables,
        relationships,
    }
}

fn convert_table(table: &Table) -> TableNode {
    TableNode {
        id: SmolStr::new(format!("table_{}", table.id)),
        name: table.name.clone(),
        columns: table.fields.iter().map(convert_field).collect(),
        comment: table.note.clone(),
    }
}

fn convert_field(field: &Field) -> Column {
    let mut column = Column {
        name: field.name.clone(),
        type_name: resolve_type(field.type_desc.as_ref()).into_text(),
        primary_key: field.pk,
        nullable: !field.not_null,
        unique: field.unique,
        auto_increment: field.increment,
        default_value: field.default.clone(),
        foreign_key: None,
    };

    // Only the first endpoint is consulted; fields carry at most one
    // meaningful foreign-key endpoint and the rest are ignored.
    if let Some(endpoint) = field.first_endpoint() {
        if let Some(target_table) = &endpoint.table_name {
            let target_column = endpoint
                .first_field()
                .cloned()
                .unwrap_or_else(|| field.name.clone());

            let mut foreign_key = ForeignKeyRef {
                table: target_table.clone(),
                column: target_column,
                on_delete: None,
                on_update: None,
            };
            if let Some(relation) = &endpoint.relation {
                foreign_key.on_delete = relation
                    .on_delete
                    .as_deref()
                    .and_then(crate::graph::ReferentialAction::parse);
                foreign_key.on_update = relation
                    .on_update
                    .as_deref()
                    .and_then(crate::graph::ReferentialAction::parse);
            }
            column.foreign_key = Some(foreign_key);
        }
    }

    column
}

/// Convert a ref to an edge, or drop it when its shape is unusable: fewer
/// than two endpoints, an unnamed table, or an endpoint without field names.
fn convert_ref(r: &Ref) -> Option<RelationshipEdge> {
    if r.endpoints.len() < 2 {
        return None;
    }

    let from = &r.endpoints[0];
    let to = &r.endpoints[1];

    let from_table = from.table_name.clone()?;
    let to_table = to.table_name.clone()?;
    let from_column = from.first_field()?.clone();
    let to_column = to.first_field()?.clone();

    Some(RelationshipEdge {
        id: SmolStr::new(format!("rel_{}", r.id)),
        from_table,
        from_column,
        to_table,
        to_column,
        cardinality: Cardinality::infer(from.relation.as_ref(), to.relation.as_ref()),
    })
}

/// Outcome of type resolution for a field.
///
/// The fallback is a deliberate leniency, kept as its own variant so the
/// inference path stays observable apart from the explicit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResolvedType {
    /// The field declared a type; its textual form passes through.
    Explicit(SmolStr),
    /// No type descriptor was present; the placeholder applies.
    Fallback,
}

impl ResolvedType {
    /// Placeholder used when no type is declared.
    const PLACEHOLDER: &'static str = "string";

    pub(crate) fn into_text(self) -> SmolStr {
        match self {
            Self::Explicit(text) => text,
            Self::Fallback => SmolStr::new_static(Self::PLACEHOLDER),
        }
    }
}

pub(crate) fn resolve_type(desc: Option<&TypeDescriptor>) -> ResolvedType {
    match desc {
        Some(desc) => ResolvedType::Explicit(desc.value.clone()),
        None => ResolvedType::Fallback,
    }
}
