//! End-to-end parse pipeline.
//!
//! Sequences raw-parse → normalize → export-canonical-text → convert →
//! validate and aggregates the results into one outcome value. Both entry
//! points are free functions over their input: there is no shared parser
//! state, so overlapping calls cannot interfere.

use serde::{Deserialize, Serialize};

use crate::ast::Database;
use crate::convert::to_graph;
use crate::emit::database_to_text;
use crate::error::ParseError;
use crate::graph::GraphModel;
use crate::parser::parse_document;
use crate::validator::validate;

/// Aggregated result of one successful parse call.
///
/// Validation defects are data, not failure: a fully-formed graph and
/// canonical text always accompany them, and the caller decides acceptance
/// policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    /// The graph model converted from the parsed tree.
    pub graph: GraphModel,
    /// Canonical re-serialization of the normalized tree.
    pub canonical_text: String,
    /// Validation defects, possibly empty.
    pub errors: Vec<ParseError>,
}

/// Parse schema text into a graph model, canonical text, and a defect list.
///
/// A raw-parse fault is terminal: the call returns a single syntax-kind
/// [`ParseError`] with best-effort position and nothing else runs. Steps are
/// strictly sequential and never retried; conversion and validation both run
/// over the originally parsed tree, not a reparse.
pub fn parse(text: &str) -> Result<ParseOutcome, ParseError> {
    let database = parse_document(text).map_err(ParseError::from)?;
    tracing::debug!(
        tables = database.table_count(),
        refs = database.ref_count(),
        "parsed schema document"
    );

    let canonical_text = database_to_text(&database.clone().normalize());
    let graph = to_graph(&database);
    let validation = validate(&database);
    tracing::debug!(defects = validation.errors.len(), "validated schema document");

    let errors = validation
        .errors
        .into_iter()
        .map(ParseError::from_validation)
        .collect();

    Ok(ParseOutcome {
        graph,
        canonical_text,
        errors,
    })
}

/// Re-parse previously exported canonical text into a raw tree.
///
/// Used to rebuild state from a stored canonical form; normalization and
/// validation are deliberately not re-run. Fails with the same syntax-fault
/// shape as [`parse`].
pub fn rehydrate(canonical_text: &str) -> Result<Database, ParseError> {
    parse_document(canonical_text).map_err(ParseError::from)
}
