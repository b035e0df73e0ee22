//! # dbml-graph
//!
//! DBML parsing, graph-model conversion, validation, and re-emission.
//!
//! This crate provides:
//! - A DBML parser producing a raw tree of schemas, tables, and refs
//! - A converter from the raw tree to a flat node/edge graph model
//! - A referential-integrity validator reporting structural defects as data
//! - A text emitter serializing graph models and raw trees back to DBML
//! - A pipeline tying the stages together with one outcome value per call
//!
//! ## Example
//!
//! ```rust
//! use dbml_graph::parse;
//!
//! let outcome = parse(
//!     r#"
//!     Table users {
//!         id integer [primary key]
//!         email varchar [unique, not null]
//!     }
//!
//!     Table posts {
//!         id integer [primary key]
//!         user_id integer [ref: > users.id]
//!     }
//!     "#,
//! )?;
//!
//! assert_eq!(outcome.graph.tables.len(), 2);
//! assert_eq!(outcome.graph.relationships.len(), 1);
//! assert!(outcome.errors.is_empty());
//! # Ok::<(), dbml_graph::ParseError>(())
//! ```
//!
//! Every entry point is a pure function of its input: no shared parser
//! instance, no caches, no global state. Concurrent calls cannot observe
//! each other.

pub mod ast;
pub mod convert;
pub mod emit;
pub mod error;
pub mod graph;
pub mod parser;
pub mod pipeline;
pub mod validator;

pub use ast::*;
pub use convert::to_graph;
pub use emit::{EmitOptions, RefStyle, database_to_text, to_text};
pub use error::{
    ErrorCode, ErrorKind, ParseError, SchemaError, SchemaResult, ValidationError, ValidationResult,
};
pub use graph::*;
pub use parser::{parse_document, parse_document_file};
pub use pipeline::{ParseOutcome, parse, rehydrate};
pub use validator::validate;
