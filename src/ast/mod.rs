//! Raw tree types produced by the DBML parser.
//!
//! The raw tree mirrors the schema language closely: a [`Database`] of
//! schemas, each holding ordered tables and cross-table refs. It is consumed
//! read-only by the converter and the validator.

mod database;
mod field;
mod refs;
mod table;
mod types;

pub use database::*;
pub use field::*;
pub use refs::*;
pub use table::*;
pub use types::*;
