//! Structural and referential validation of raw trees.
//!
//! The validator is the sole reporter of structural defects: the converter
//! stays permissive and the two never duplicate each other's reporting. It
//! walks the tree read-only, never mutates it, and never raises; defects
//! come back as data.

use indexmap::IndexMap;

use crate::ast::{Database, Ref, Table};
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Validate a raw tree.
///
/// One pass per schema: every table/column defect of a schema is reported
/// before any of its reference defects, and schemas come in document order.
pub fn validate(database: &Database) -> ValidationResult {
    let mut errors: Vec<ValidationError> = Vec::new();

    for schema in &database.schemas {
        // Name→table lookup in declaration order. The slot is not
        // overwritten on duplicates, so later lookups resolve to the first
        // occurrence.
        let mut lookup: IndexMap<&str, &Table> = IndexMap::new();

        for table in &schema.tables {
            if lookup.contains_key(table.name.as_str()) {
                errors.push(ValidationError::table(
                    table.name.clone(),
                    format!("Duplicate table name: {}", table.name),
                    ErrorCode::DuplicateTable,
                ));
            } else {
                lookup.insert(table.name.as_str(), table);
            }

            if table.name.trim().is_empty() {
                errors.push(ValidationError::table(
                    "unknown",
                    "Table name is required",
                    ErrorCode::MissingTableName,
                ));
            }

            if table.fields.is_empty() {
                errors.push(ValidationError::table(
                    table.name.clone(),
                    format!("Table {} must have at least one column", table.name),
                    ErrorCode::EmptyTable,
                ));
            }

            for field in &table.fields {
                if field.name.trim().is_empty() {
                    errors.push(ValidationError::column(
                        table.name.clone(),
                        "unknown",
                        "Column name is required",
                        ErrorCode::MissingColumnName,
                    ));
                }

                if field.type_desc.is_none() {
                    errors.push(ValidationError::column(
                        table.name.clone(),
                        field.name.clone(),
                        format!("Column {} must have a type", field.name),
                        ErrorCode::MissingColumnType,
                    ));
                }
            }
        }

        for r in &schema.refs {
            validate_ref(r, &lookup, &mut errors);
        }
    }

    ValidationResult::from_errors(errors)
}

fn validate_ref(r: &Ref, lookup: &IndexMap<&str, &Table>, errors: &mut Vec<ValidationError>) {
    if r.endpoints.len() < 2 {
        errors.push(ValidationError::reference(
            format!(
                "Reference {} must have at least 2 endpoints",
                r.display_name()
            ),
            ErrorCode::InvalidReference,
        ));
        return;
    }

    let from = &r.endpoints[0];
    let to = &r.endpoints[1];

    let (Some(from_table), Some(to_table)) = (&from.table_name, &to.table_name) else {
        errors.push(ValidationError::reference(
            format!("Reference {} has invalid endpoints", r.display_name()),
            ErrorCode::InvalidReferenceEndpoints,
        ));
        return;
    };

    for table_name in [from_table, to_table] {
        if resolve_before(lookup, table_name, r).is_none() {
            errors.push(ValidationError::table(
                table_name.clone(),
                format!("Reference points to non-existent table: {}", table_name),
                ErrorCode::InvalidReferenceTable,
            ));
        }
    }

    for (table_name, endpoint) in [(from_table, from), (to_table, to)] {
        // Only the first column of a composite endpoint is checked.
        if let Some(field_name) = endpoint.first_field() {
            if let Some(table) = resolve_before(lookup, table_name, r) {
                if table.get_field(field_name).is_none() {
                    errors.push(ValidationError::column(
                        table_name.clone(),
                        field_name.clone(),
                        format!(
                            "Reference column {} does not exist in table {}",
                            field_name, table_name
                        ),
                        ErrorCode::InvalidReferenceColumn,
                    ));
                }
            }
        }
    }
}

/// Resolve a table for a ref, honoring document order: a table declared
/// after the ref does not resolve. Hand-built trees with default spans keep
/// every table visible.
fn resolve_before<'a>(
    lookup: &IndexMap<&str, &'a Table>,
    name: &str,
    r: &Ref,
) -> Option<&'a Table> {
    lookup
        .get(name)
        .copied()
        .filter(|table| table.span.start <= r.span.start)
}
