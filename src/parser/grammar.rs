//! Pest grammar parser for DBML documents.

use pest_derive::Parser;

/// The DBML parser.
#[derive(Parser)]
#[grammar = "parser/dbml.pest"]
pub struct DbmlParser;
