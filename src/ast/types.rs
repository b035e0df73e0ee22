//! Shared leaf types for the raw tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A span in the source text for error reporting and document ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset in bytes.
    pub start: usize,
    /// End offset in bytes.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// Textual type descriptor for a field, e.g. `varchar(255)`.
///
/// The vocabulary is defined by the schema language and the target database,
/// not by this crate; the descriptor is carried as free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// The full textual form of the type, arguments included.
    pub value: SmolStr,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(value: impl Into<SmolStr>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the textual form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Canonical form: lowercased name, whitespace stripped from arguments.
    ///
    /// Idempotent; `normalized(normalized(t)) == normalized(t)`.
    pub fn normalized(&self) -> TypeDescriptor {
        let text = self.value.as_str();
        let canonical = match text.split_once('(') {
            Some((name, rest)) => {
                let args: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
                format!("{}({}", name.trim().to_lowercase(), args)
            }
            None => text.trim().to_lowercase(),
        };
        TypeDescriptor::new(canonical)
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A column default literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// A quoted string literal.
    String(String),
    /// A numeric literal.
    Number(f64),
    /// A boolean literal.
    Boolean(bool),
    /// A backtick expression such as `` `now()` ``.
    Expression(String),
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Expression(e) => write!(f, "`{}`", e),
        }
    }
}

/// Cardinality marker on a raw relation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointCardinality {
    /// The "one" side of a relationship.
    One,
    /// The "many" side of a relationship.
    Many,
}

/// Relation descriptor attached to a raw endpoint.
///
/// Action hints are carried as raw strings here; they are normalized into the
/// closed action set at the conversion boundary, never before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Cardinality marker for this endpoint.
    pub cardinality: EndpointCardinality,
    /// Raw on-delete hint, e.g. `cascade`.
    pub on_delete: Option<SmolStr>,
    /// Raw on-update hint.
    pub on_update: Option<SmolStr>,
}

impl RelationDescriptor {
    /// Create a descriptor with no action hints.
    pub fn new(cardinality: EndpointCardinality) -> Self {
        Self {
            cardinality,
            on_delete: None,
            on_update: None,
        }
    }

    /// Set the on-delete hint.
    pub fn with_on_delete(mut self, action: impl Into<SmolStr>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    /// Set the on-update hint.
    pub fn with_on_update(mut self, action: impl Into<SmolStr>) -> Self {
        self.on_update = Some(action.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Span Tests ====================

    #[test]
    fn test_span_new() {
        let span = Span::new(3, 9);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 9);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_empty() {
        assert!(Span::new(4, 4).is_empty());
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_span_from_tuple() {
        let span: Span = (10, 20).into();
        assert_eq!(span, Span::new(10, 20));
    }

    // ==================== TypeDescriptor Tests ====================

    #[test]
    fn test_type_descriptor_plain() {
        let t = TypeDescriptor::new("integer");
        assert_eq!(t.as_str(), "integer");
        assert_eq!(t.normalized(), t);
    }

    #[test]
    fn test_type_descriptor_normalized_case() {
        let t = TypeDescriptor::new("VarChar");
        assert_eq!(t.normalized().as_str(), "varchar");
    }

    #[test]
    fn test_type_descriptor_normalized_args() {
        let t = TypeDescriptor::new("Decimal( 10 , 2 )");
        assert_eq!(t.normalized().as_str(), "decimal(10,2)");
    }

    #[test]
    fn test_type_descriptor_normalized_idempotent() {
        let t = TypeDescriptor::new("VARCHAR( 255 )");
        let once = t.normalized();
        assert_eq!(once.normalized(), once);
    }

    // ==================== DefaultValue Tests ====================

    #[test]
    fn test_default_value_display_string() {
        assert_eq!(
            DefaultValue::String("active".to_string()).to_string(),
            "'active'"
        );
    }

    #[test]
    fn test_default_value_display_number() {
        assert_eq!(DefaultValue::Number(0.0).to_string(), "0");
        assert_eq!(DefaultValue::Number(9.99).to_string(), "9.99");
        assert_eq!(DefaultValue::Number(-100.0).to_string(), "-100");
    }

    #[test]
    fn test_default_value_display_boolean() {
        assert_eq!(DefaultValue::Boolean(true).to_string(), "true");
        assert_eq!(DefaultValue::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_default_value_display_expression() {
        assert_eq!(
            DefaultValue::Expression("now()".to_string()).to_string(),
            "`now()`"
        );
    }

    // ==================== RelationDescriptor Tests ====================

    #[test]
    fn test_relation_descriptor_builders() {
        let rel = RelationDescriptor::new(EndpointCardinality::Many)
            .with_on_delete("cascade")
            .with_on_update("no action");

        assert_eq!(rel.cardinality, EndpointCardinality::Many);
        assert_eq!(rel.on_delete.as_deref(), Some("cascade"));
        assert_eq!(rel.on_update.as_deref(), Some("no action"));
    }
}
