//! Fault and defect types.
//!
//! Two disjoint kinds surface from this crate: a syntax fault from the raw
//! parser ([`SchemaError`], terminal for the call) and validation defects
//! ([`ValidationError`], data in a successful result). The wire-facing
//! [`ParseError`] record unifies both for embedding services.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Result type for raw-parser operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised by the raw parser.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(dbml_graph::io_error))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error in the schema text.
    #[error("syntax error in schema")]
    #[diagnostic(code(dbml_graph::syntax_error))]
    Syntax {
        #[source_code]
        src: String,
        #[label("error here")]
        span: miette::SourceSpan,
        message: String,
        /// 1-based line of the fault.
        line: usize,
        /// 1-based column of the fault.
        column: usize,
    },
}

impl SchemaError {
    /// Create a syntax error with source location.
    pub fn syntax(
        src: impl Into<String>,
        offset: usize,
        len: usize,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            src: src.into(),
            span: (offset, len).into(),
            message: message.into(),
            line,
            column,
        }
    }
}

/// Kind tag on a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The raw parse failed; no tree was produced.
    Syntax,
    /// A semantic problem outside the validation pass.
    Semantic,
    /// A structural or referential defect found by the validator.
    Validation,
}

impl ErrorKind {
    /// Get the kind as its wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Semantic => "semantic",
            Self::Validation => "validation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine-readable defect codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A table name is declared more than once.
    DuplicateTable,
    /// A table has an empty or blank name.
    MissingTableName,
    /// A table declares no columns.
    EmptyTable,
    /// A column has an empty or blank name.
    MissingColumnName,
    /// A column has no type descriptor.
    MissingColumnType,
    /// A ref has fewer than two endpoints.
    InvalidReference,
    /// A ref endpoint names no table.
    InvalidReferenceEndpoints,
    /// A ref endpoint names a table that does not resolve.
    InvalidReferenceTable,
    /// A ref endpoint names a column absent from its table.
    InvalidReferenceColumn,
}

impl ErrorCode {
    /// Get the code as its wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateTable => "DUPLICATE_TABLE",
            Self::MissingTableName => "MISSING_TABLE_NAME",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::MissingColumnName => "MISSING_COLUMN_NAME",
            Self::MissingColumnType => "MISSING_COLUMN_TYPE",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::InvalidReferenceEndpoints => "INVALID_REFERENCE_ENDPOINTS",
            Self::InvalidReferenceTable => "INVALID_REFERENCE_TABLE",
            Self::InvalidReferenceColumn => "INVALID_REFERENCE_COLUMN",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One defect found by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Table the defect concerns, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<SmolStr>,
    /// Column the defect concerns, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<SmolStr>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code.
    pub code: ErrorCode,
}

impl ValidationError {
    /// A defect scoped to a table.
    pub fn table(table: impl Into<SmolStr>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            table: Some(table.into()),
            column: None,
            message: message.into(),
            code,
        }
    }

    /// A defect scoped to a column.
    pub fn column(
        table: impl Into<SmolStr>,
        column: impl Into<SmolStr>,
        message: impl Into<String>,
        code: ErrorCode,
    ) -> Self {
        Self {
            table: Some(table.into()),
            column: Some(column.into()),
            message: message.into(),
            code,
        }
    }

    /// A defect with no table/column context (malformed refs).
    pub fn reference(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            table: None,
            column: None,
            message: message.into(),
            code,
        }
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Defects in discovery order.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Build a result from a defect list.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// The wire-facing defect record returned by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    /// 1-based line; 0 when the position is unknown.
    pub line: usize,
    /// 1-based column, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Human-readable message.
    pub message: String,
    /// Fault kind.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Machine-readable code, when the defect has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ParseError {
    /// A syntax fault at a best-effort position.
    pub fn syntax(line: usize, column: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            kind: ErrorKind::Syntax,
            code: None,
        }
    }

    /// Wrap a validator defect. Validation defects carry no position.
    pub fn from_validation(error: ValidationError) -> Self {
        Self {
            line: 0,
            column: None,
            message: error.message,
            kind: ErrorKind::Validation,
            code: Some(error.code),
        }
    }
}

impl From<SchemaError> for ParseError {
    fn from(error: SchemaError) -> Self {
        match error {
            SchemaError::Syntax {
                message,
                line,
                column,
                ..
            } => ParseError::syntax(line, Some(column), message),
            other => ParseError::syntax(0, None, other.to_string()),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error at line {}: {}", self.kind, self.line, self.message)
    }
}

impl std::error::Error for ParseError {}
