//! The canonical graph model: tables as nodes, relationships as edges.
//!
//! This is the crate's own representation, produced by [`crate::convert`] and
//! consumed by everything downstream. Construction is permissive by design:
//! nothing here guarantees that an edge's endpoints resolve. That is the
//! validator's job.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ast::{DefaultValue, EndpointCardinality, RelationDescriptor};

/// Cardinality classification of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    /// One-to-one relationship.
    OneToOne,
    /// One-to-many relationship (the default when markers are missing).
    OneToMany,
    /// Many-to-many relationship.
    ManyToMany,
}

impl Cardinality {
    /// Infer cardinality from the raw relation descriptors of both endpoints.
    ///
    /// Lookup-table semantics: (one,one) is one-to-one, (many,many) is
    /// many-to-many, and anything else (a mixed pair, or a missing
    /// descriptor on either side) is one-to-many.
    pub fn infer(
        from: Option<&RelationDescriptor>,
        to: Option<&RelationDescriptor>,
    ) -> Cardinality {
        match (from, to) {
            (Some(f), Some(t)) => match (f.cardinality, t.cardinality) {
                (EndpointCardinality::One, EndpointCardinality::One) => Self::OneToOne,
                (EndpointCardinality::Many, EndpointCardinality::Many) => Self::ManyToMany,
                _ => Self::OneToMany,
            },
            _ => Self::OneToMany,
        }
    }

    /// Get the cardinality as its wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "ONE_TO_ONE",
            Self::OneToMany => "ONE_TO_MANY",
            Self::ManyToMany => "MANY_TO_MANY",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Referential action on a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// Propagate the change to referencing rows.
    #[serde(rename = "CASCADE")]
    Cascade,
    /// Null out referencing columns.
    #[serde(rename = "SET NULL")]
    SetNull,
    /// Refuse the change while references exist.
    #[serde(rename = "RESTRICT")]
    Restrict,
    /// Take no action.
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    /// Normalize a raw action hint into the closed set. Case-insensitive;
    /// accepts space or underscore separators. Anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('_', " ").as_str() {
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "RESTRICT" => Some(Self::Restrict),
            "NO ACTION" => Some(Self::NoAction),
            _ => None,
        }
    }

    /// Get the action as its wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A foreign-key annotation on a column.
///
/// Deliberately redundant with [`RelationshipEdge`]: both are derived
/// independently from the same raw endpoint and share no state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    /// Target table name.
    pub table: SmolStr,
    /// Target column name.
    pub column: SmolStr,
    /// On-delete action, when declared and recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    /// On-update action, when declared and recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

/// A column in a table node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name.
    pub name: SmolStr,
    /// Free-form type text; `"string"` when the source declared none.
    #[serde(rename = "type")]
    pub type_name: SmolStr,
    /// Primary-key flag.
    pub primary_key: bool,
    /// Nullability (the inversion of the raw not-null flag).
    pub nullable: bool,
    /// Unique flag.
    pub unique: bool,
    /// Auto-increment flag.
    pub auto_increment: bool,
    /// Default literal, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    /// Foreign-key annotation, when the raw field carried an endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

/// A table node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableNode {
    /// Stable identity derived from the raw table identity (`table_<id>`).
    pub id: SmolStr,
    /// Table name. Uniqueness is a validator concern, not a type invariant.
    pub name: SmolStr,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Free-text comment, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A relationship edge between two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    /// Stable identity derived from the raw ref identity (`rel_<id>`).
    pub id: SmolStr,
    /// Source table name.
    pub from_table: SmolStr,
    /// Source column name.
    pub from_column: SmolStr,
    /// Target table name.
    pub to_table: SmolStr,
    /// Target column name.
    pub to_column: SmolStr,
    /// Cardinality classification.
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
}

/// The complete graph model for one schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    /// Table nodes in declaration order.
    pub tables: Vec<TableNode>,
    /// Relationship edges in declaration order.
    pub relationships: Vec<RelationshipEdge>,
}

impl GraphModel {
    /// Look up a table node by name. Returns the first match when names are
    /// duplicated (the converter does not deduplicate).
    pub fn get_table(&self, name: &str) -> Option<&TableNode> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Edges touching the named table on either side.
    pub fn relationships_for(&self, table: &str) -> Vec<&RelationshipEdge> {
        self.relationships
            .iter()
            .filter(|r| r.from_table == table || r.to_table == table)
            .collect()
    }
}

impl std::fmt::Display for GraphModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GraphModel({} tables, {} relationships)",
            self.tables.len(),
            self.relationships.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::EndpointCardinality as EC;

    fn descriptor(cardinality: EC) -> RelationDescriptor {
        RelationDescriptor::new(cardinality)
    }

    // ==================== Cardinality Inference Tests ====================

    #[test]
    fn test_infer_one_one() {
        assert_eq!(
            Cardinality::infer(Some(&descriptor(EC::One)), Some(&descriptor(EC::One))),
            Cardinality::OneToOne
        );
    }

    #[test]
    fn test_infer_many_many() {
        assert_eq!(
            Cardinality::infer(Some(&descriptor(EC::Many)), Some(&descriptor(EC::Many))),
            Cardinality::ManyToMany
        );
    }

    #[test]
    fn test_infer_mixed_pairs_default() {
        assert_eq!(
            Cardinality::infer(Some(&descriptor(EC::One)), Some(&descriptor(EC::Many))),
            Cardinality::OneToMany
        );
        assert_eq!(
            Cardinality::infer(Some(&descriptor(EC::Many)), Some(&descriptor(EC::One))),
            Cardinality::OneToMany
        );
    }

    #[test]
    fn test_infer_missing_descriptor_defaults() {
        assert_eq!(Cardinality::infer(None, None), Cardinality::OneToMany);
        assert_eq!(
            Cardinality::infer(Some(&descriptor(EC::One)), None),
            Cardinality::OneToMany
        );
        assert_eq!(
            Cardinality::infer(None, Some(&descriptor(EC::Many))),
            Cardinality::OneToMany
        );
    }

    #[test]
    fn test_infer_is_deterministic() {
        let from = descriptor(EC::One);
        let to = descriptor(EC::Many);
        let first = Cardinality::infer(Some(&from), Some(&to));
        let second = Cardinality::infer(Some(&from), Some(&to));
        assert_eq!(first, second);
        assert_eq!(first, Cardinality::OneToMany);
    }

    // ==================== ReferentialAction Tests ====================

    #[test]
    fn test_action_parse_accepts_known() {
        assert_eq!(
            ReferentialAction::parse("cascade"),
            Some(ReferentialAction::Cascade)
        );
        assert_eq!(
            ReferentialAction::parse("SET NULL"),
            Some(ReferentialAction::SetNull)
        );
        assert_eq!(
            ReferentialAction::parse("set_null"),
            Some(ReferentialAction::SetNull)
        );
        assert_eq!(
            ReferentialAction::parse(" no action "),
            Some(ReferentialAction::NoAction)
        );
        assert_eq!(
            ReferentialAction::parse("Restrict"),
            Some(ReferentialAction::Restrict)
        );
    }

    #[test]
    fn test_action_parse_rejects_unknown() {
        assert_eq!(ReferentialAction::parse("explode"), None);
        assert_eq!(ReferentialAction::parse(""), None);
    }

    #[test]
    fn test_action_wire_spelling() {
        let json = serde_json::to_string(&ReferentialAction::SetNull).unwrap();
        assert_eq!(json, "\"SET NULL\"");
    }

    // ==================== Wire Shape Tests ====================

    #[test]
    fn test_cardinality_wire_spelling() {
        let json = serde_json::to_string(&Cardinality::OneToMany).unwrap();
        assert_eq!(json, "\"ONE_TO_MANY\"");
    }

    #[test]
    fn test_column_wire_shape() {
        let column = Column {
            name: "user_id".into(),
            type_name: "integer".into(),
            primary_key: false,
            nullable: true,
            unique: false,
            auto_increment: false,
            default_value: None,
            foreign_key: Some(ForeignKeyRef {
                table: "users".into(),
                column: "id".into(),
                on_delete: Some(ReferentialAction::Cascade),
                on_update: None,
            }),
        };
        let json = serde_json::to_value(&column).unwrap();

        assert_eq!(json["type"], "integer");
        assert_eq!(json["primaryKey"], false);
        assert_eq!(json["autoIncrement"], false);
        assert_eq!(json["foreignKey"]["table"], "users");
        assert_eq!(json["foreignKey"]["onDelete"], "CASCADE");
        assert!(json["foreignKey"].get("onUpdate").is_none());
    }

    #[test]
    fn test_edge_wire_shape() {
        let edge = RelationshipEdge {
            id: "rel_1".into(),
            from_table: "posts".into(),
            from_column: "user_id".into(),
            to_table: "users".into(),
            to_column: "id".into(),
            cardinality: Cardinality::OneToMany,
        };
        let json = serde_json::to_value(&edge).unwrap();

        assert_eq!(json["fromTable"], "posts");
        assert_eq!(json["toColumn"], "id");
        assert_eq!(json["type"], "ONE_TO_MANY");
    }

    // ==================== GraphModel Tests ====================

    fn node(id: &str, name: &str) -> TableNode {
        TableNode {
            id: id.into(),
            name: name.into(),
            columns: vec![],
            comment: None,
        }
    }

    #[test]
    fn test_get_table_first_match() {
        let graph = GraphModel {
            tables: vec![node("table_1", "users"), node("table_2", "users")],
            relationships: vec![],
        };
        assert_eq!(graph.get_table("users").unwrap().id, "table_1");
        assert!(graph.get_table("missing").is_none());
    }

    #[test]
    fn test_relationships_for() {
        let edge = RelationshipEdge {
            id: "rel_1".into(),
            from_table: "posts".into(),
            from_column: "user_id".into(),
            to_table: "users".into(),
            to_column: "id".into(),
            cardinality: Cardinality::OneToMany,
        };
        let graph = GraphModel {
            tables: vec![node("table_1", "users"), node("table_2", "posts")],
            relationships: vec![edge],
        };

        assert_eq!(graph.relationships_for("users").len(), 1);
        assert_eq!(graph.relationships_for("posts").len(), 1);
        assert!(graph.relationships_for("tags").is_empty());
    }
}
