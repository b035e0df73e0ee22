//! Schema-text emission.
//!
//! Two directions share the rendering helpers here: [`to_text`] serializes a
//! graph model back into schema text (the inverse of [`crate::convert`]), and
//! [`database_to_text`] serializes a raw tree into its canonical textual
//! form. Emitted text is always valid schema language; the pipeline reparses
//! it rather than trusting the emitter.

use serde::{Deserialize, Serialize};

use crate::ast::{Database, Endpoint, EndpointCardinality, Field, Ref, Table};
use crate::graph::{Cardinality, Column, GraphModel, RelationshipEdge, TableNode};

/// How relationship symbols are chosen when emitting a graph model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefStyle {
    /// Compatibility mode: `-` for both one-to-one and many-to-many. The
    /// collapse is ambiguous on reparse and is kept for fidelity with
    /// existing documents.
    #[default]
    Legacy,
    /// Corrected mode: `<>` for many-to-many, keeping cardinalities
    /// distinguishable across a round trip.
    Distinct,
}

/// Options for graph-model emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOptions {
    /// Relationship symbol selection.
    pub ref_style: RefStyle,
}

/// Serialize a graph model into schema text.
pub fn to_text(graph: &GraphModel, options: &EmitOptions) -> String {
    let mut out = String::new();

    for (i, table) in graph.tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_table_node(&mut out, table);
    }

    if !graph.relationships.is_empty() {
        out.push('\n');
        for edge in &graph.relationships {
            write_edge(&mut out, edge, options);
        }
    }

    out
}

/// Serialize a raw tree into canonical schema text.
///
/// Formatting is fixed regardless of how the source was laid out; aliases
/// are dropped (endpoints were alias-resolved at parse time) and all four
/// relationship symbols are used, so no cardinality is lost on reparse.
pub fn database_to_text(database: &Database) -> String {
    let mut out = String::new();

    let mut first = true;
    for schema in &database.schemas {
        for table in &schema.tables {
            if !first {
                out.push('\n');
            }
            first = false;
            write_raw_table(&mut out, table);
        }
    }

    if database.ref_count() > 0 {
        out.push('\n');
        for schema in &database.schemas {
            for r in &schema.refs {
                write_raw_ref(&mut out, r);
            }
        }
    }

    out
}

// ---------- graph direction ----------

fn write_table_node(out: &mut String, table: &TableNode) {
    out.push_str("Table ");
    push_ident(out, &table.name);
    out.push_str(" {\n");

    for column in &table.columns {
        write_column(out, column);
    }

    if let Some(comment) = &table.comment {
        out.push_str("  Note: ");
        push_string(out, comment);
        out.push('\n');
    }

    out.push_str("}\n");
}

fn write_column(out: &mut String, column: &Column) {
    out.push_str("  ");
    push_ident(out, &column.name);
    out.push(' ');
    out.push_str(&column.type_name);

    // Constraint order is fixed: primary key, not null, unique, increment,
    // default.
    let mut settings: Vec<String> = Vec::new();
    if column.primary_key {
        settings.push("primary key".to_string());
    }
    if !column.nullable {
        settings.push("not null".to_string());
    }
    if column.unique {
        settings.push("unique".to_string());
    }
    if column.auto_increment {
        settings.push("increment".to_string());
    }
    if let Some(default) = &column.default_value {
        settings.push(format!("default: {}", default));
    }

    if !settings.is_empty() {
        out.push_str(" [");
        out.push_str(&settings.join(", "));
        out.push(']');
    }
    out.push('\n');
}

fn write_edge(out: &mut String, edge: &RelationshipEdge, options: &EmitOptions) {
    let symbol = match (edge.cardinality, options.ref_style) {
        (Cardinality::OneToMany, _) => ">",
        (Cardinality::ManyToMany, RefStyle::Distinct) => "<>",
        // Legacy collapse: one-to-one and many-to-many share a symbol.
        _ => "-",
    };

    out.push_str("Ref: ");
    push_ident(out, &edge.from_table);
    out.push('.');
    push_ident(out, &edge.from_column);
    out.push(' ');
    out.push_str(symbol);
    out.push(' ');
    push_ident(out, &edge.to_table);
    out.push('.');
    push_ident(out, &edge.to_column);
    out.push('\n');
}

// ---------- raw-tree direction ----------

fn write_raw_table(out: &mut String, table: &Table) {
    out.push_str("Table ");
    push_ident(out, &table.name);
    out.push_str(" {\n");

    for field in &table.fields {
        write_raw_field(out, field);
    }

    if let Some(note) = &table.note {
        out.push_str("  Note: ");
        push_string(out, note);
        out.push('\n');
    }

    out.push_str("}\n");
}

fn write_raw_field(out: &mut String, field: &Field) {
    out.push_str("  ");
    push_ident(out, &field.name);
    out.push(' ');
    match &field.type_desc {
        Some(desc) => out.push_str(desc.as_str()),
        None => out.push_str("string"),
    }

    let mut settings: Vec<String> = Vec::new();
    if field.pk {
        settings.push("primary key".to_string());
    }
    if field.not_null {
        settings.push("not null".to_string());
    }
    if field.unique {
        settings.push("unique".to_string());
    }
    if field.increment {
        settings.push("increment".to_string());
    }
    if let Some(default) = &field.default {
        settings.push(format!("default: {}", default));
    }
    if let Some(note) = &field.note {
        let mut rendered = String::from("note: ");
        push_string(&mut rendered, note);
        settings.push(rendered);
    }

    if !settings.is_empty() {
        out.push_str(" [");
        out.push_str(&settings.join(", "));
        out.push(']');
    }
    out.push('\n');
}

fn write_raw_ref(out: &mut String, r: &Ref) {
    // Refs that cannot be expressed as text are skipped; the validator has
    // already reported them.
    let (Some(from), Some(to)) = (r.endpoints.first(), r.endpoints.get(1)) else {
        return;
    };
    let (Some(from_table), Some(to_table)) = (&from.table_name, &to.table_name) else {
        return;
    };
    if from.field_names.is_empty() || to.field_names.is_empty() {
        return;
    }

    out.push_str("Ref");
    if let Some(name) = &r.name {
        out.push(' ');
        push_ident(out, name);
    }
    out.push_str(": ");
    push_ident(out, from_table);
    out.push('.');
    push_endpoint_fields(out, from);
    out.push(' ');
    out.push_str(raw_symbol(from, to));
    out.push(' ');
    push_ident(out, to_table);
    out.push('.');
    push_endpoint_fields(out, to);

    let actions = to.relation.as_ref().or(from.relation.as_ref());
    if let Some(relation) = actions {
        let mut settings: Vec<String> = Vec::new();
        if let Some(action) = &relation.on_delete {
            settings.push(format!("delete: {}", action));
        }
        if let Some(action) = &relation.on_update {
            settings.push(format!("update: {}", action));
        }
        if !settings.is_empty() {
            out.push_str(" [");
            out.push_str(&settings.join(", "));
            out.push(']');
        }
    }
    out.push('\n');
}

fn push_endpoint_fields(out: &mut String, endpoint: &Endpoint) {
    if endpoint.field_names.len() > 1 {
        out.push('(');
        for (i, name) in endpoint.field_names.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            push_ident(out, name);
        }
        out.push(')');
    } else if let Some(name) = endpoint.first_field() {
        push_ident(out, name);
    }
}

fn raw_symbol(from: &Endpoint, to: &Endpoint) -> &'static str {
    use EndpointCardinality::{Many, One};

    let markers = (
        from.relation.as_ref().map(|r| r.cardinality),
        to.relation.as_ref().map(|r| r.cardinality),
    );
    match markers {
        (Some(One), Some(One)) => "-",
        (Some(Many), Some(Many)) => "<>",
        (Some(One), Some(Many)) => "<",
        _ => ">",
    }
}

// ---------- shared helpers ----------

/// Push an identifier, double-quoting it when it is not a plain ident.
fn push_ident(out: &mut String, name: &str) {
    let plain = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        out.push_str(name);
    } else {
        out.push('"');
        out.push_str(name);
        out.push('"');
    }
}

/// Push a string literal, switching to triple quotes when the text contains
/// a single quote.
fn push_string(out: &mut String, text: &str) {
    if text.contains('\'') {
        out.push_str("'''");
        out.push_str(text);
        out.push_str("'''");
    } else {
        out.push('\'');
        out.push_str(text);
        out.push('\'');
    }
}
