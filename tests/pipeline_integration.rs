//! Integration tests for the parse → convert → validate → re-emit pipeline.
//!
//! These exercise the crate through its public surface the way an embedding
//! service would, including the acceptance properties the pipeline must hold.

use dbml_graph::{
    Cardinality, EmitOptions, ErrorCode, ErrorKind, RefStyle, parse, parse_document, rehydrate,
    to_graph, to_text, validate,
};

/// A representative document with constraints, defaults, notes, and both
/// inline and standalone refs.
const BLOG_SCHEMA: &str = r#"
// blog-style schema
Table users {
  id integer [primary key, increment]
  username varchar(40) [not null]
  email varchar [unique, not null]
  status varchar [default: 'active']
  created_at timestamp [default: `now()`]
  Note: 'application users'
}

Table posts {
  id integer [primary key, increment]
  title varchar [not null]
  body text
  user_id integer [ref: > users.id]
  published boolean [default: false]
  created_at timestamp
}

Table tags {
  id integer [primary key]
  name varchar [unique, not null]
}

Ref: posts.id <> tags.id
"#;

/// Full-document smoke test over the pipeline outcome.
#[test]
fn test_pipeline_over_representative_document() {
    let outcome = parse(BLOG_SCHEMA).expect("Failed to parse schema");

    assert!(outcome.errors.is_empty(), "defects: {:?}", outcome.errors);
    assert_eq!(outcome.graph.tables.len(), 3);
    assert_eq!(outcome.graph.relationships.len(), 2);

    let users = outcome.graph.get_table("users").expect("users missing");
    assert_eq!(users.comment.as_deref(), Some("application users"));
    assert_eq!(users.columns.len(), 5);

    let posts = outcome.graph.get_table("posts").expect("posts missing");
    let user_id = posts
        .columns
        .iter()
        .find(|c| c.name == "user_id")
        .expect("user_id missing");
    let fk = user_id.foreign_key.as_ref().expect("foreign key missing");
    assert_eq!(fk.table, "users");
    assert_eq!(fk.column, "id");

    let many_to_many = outcome
        .graph
        .relationships
        .iter()
        .find(|r| r.to_table == "tags")
        .expect("tag relationship missing");
    assert_eq!(many_to_many.cardinality, Cardinality::ManyToMany);
}

/// Property: the validator result embedded in a parse outcome equals a
/// standalone validation of the same raw-parsed text.
#[test]
fn test_embedded_validation_equals_standalone() {
    let source = r#"
        Table users { id integer }
        Table users { id integer }
        Table empty { }
        Ref: users.id > orders.id
    "#;

    let outcome = parse(source).expect("Failed to parse schema");
    let standalone = validate(&parse_document(source).expect("Failed to raw-parse"));

    assert_eq!(outcome.errors.len(), standalone.errors.len());
    for (embedded, own) in outcome.errors.iter().zip(standalone.errors.iter()) {
        assert_eq!(embedded.code, Some(own.code));
        assert_eq!(embedded.message, own.message);
        assert_eq!(embedded.kind, ErrorKind::Validation);
        assert_eq!(embedded.line, 0);
    }
}

/// Property: graph → text → graph preserves names, columns, flags, and
/// cardinalities.
#[test]
fn test_graph_text_round_trip() {
    let graph = to_graph(&parse_document(BLOG_SCHEMA).expect("Failed to raw-parse"));

    // The many-to-many edge needs the distinct style to survive; the legacy
    // collapse is exercised separately below.
    let options = EmitOptions {
        ref_style: RefStyle::Distinct,
    };
    let text = to_text(&graph, &options);
    let round_tripped = to_graph(&parse_document(&text).expect("Emitted text must reparse"));

    assert_eq!(round_tripped, graph);
}

/// Property: duplicate table names yield exactly one defect while the graph
/// keeps both nodes.
#[test]
fn test_duplicate_table_scenario() {
    let outcome = parse(
        r#"
        Table users { id integer }
        Table users { id integer }
    "#,
    )
    .expect("Failed to parse schema");

    let duplicates: Vec<_> = outcome
        .errors
        .iter()
        .filter(|e| e.code == Some(ErrorCode::DuplicateTable))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message.contains("users"));
    assert_eq!(outcome.graph.tables.len(), 2);
}

/// Property: a shape-valid ref to an undeclared table keeps its edge and
/// yields a dangling-table defect.
#[test]
fn test_dangling_reference_scenario() {
    let outcome = parse(
        r#"
        Table posts { user_id integer }
        Ref: posts.user_id > orders.id
    "#,
    )
    .expect("Failed to parse schema");

    let defect = outcome
        .errors
        .iter()
        .find(|e| e.code == Some(ErrorCode::InvalidReferenceTable))
        .expect("expected dangling-table defect");
    assert!(defect.message.contains("orders"));
    assert_eq!(outcome.graph.relationships.len(), 1);
    assert_eq!(outcome.graph.relationships[0].to_table, "orders");
}

/// Property: a ref declared before its target table is flagged even though
/// the table exists later in the document.
#[test]
fn test_forward_reference_scenario() {
    let outcome = parse(
        r#"
        Ref: posts.user_id > users.id
        Table users { id integer }
        Table posts { user_id integer }
    "#,
    )
    .expect("Failed to parse schema");

    assert!(
        outcome
            .errors
            .iter()
            .any(|e| e.code == Some(ErrorCode::InvalidReferenceTable))
    );
    // The edge itself is still converted.
    assert_eq!(outcome.graph.relationships.len(), 1);
}

/// Property: an empty table yields EMPTY_TABLE and nothing else.
#[test]
fn test_empty_table_scenario() {
    let outcome = parse("Table empty { }").expect("Failed to parse schema");

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code, Some(ErrorCode::EmptyTable));
}

/// Property: the legacy emitter collapses one-to-one and many-to-many onto
/// the same symbol.
#[test]
fn test_symbol_collapse_scenario() {
    let one_to_one = to_graph(&parse_document("Ref: a.x - b.y").expect("parse"));
    let many_to_many = to_graph(&parse_document("Ref: a.x <> b.y").expect("parse"));

    let options = EmitOptions::default();
    let one_text = to_text(&one_to_one, &options);
    let many_text = to_text(&many_to_many, &options);

    assert!(one_text.contains("a.x - b.y"));
    assert!(many_text.contains("a.x - b.y"));
}

/// A syntax fault is terminal and positioned; nothing else is returned.
#[test]
fn test_syntax_fault_shape() {
    let err = parse("Table users {\n  id integer [pk\n}").expect_err("should fail");

    assert_eq!(err.kind, ErrorKind::Syntax);
    assert!(err.code.is_none());
    assert!(err.line >= 2);
}

/// Canonical text re-hydrates into an equivalent tree and graph.
#[test]
fn test_rehydration_round_trip() {
    let outcome = parse(BLOG_SCHEMA).expect("Failed to parse schema");
    let rehydrated = rehydrate(&outcome.canonical_text).expect("Failed to rehydrate");

    assert_eq!(rehydrated.table_count(), 3);
    assert_eq!(rehydrated.ref_count(), 2);
    assert_eq!(to_graph(&rehydrated), outcome.graph);
}

/// Concurrent calls share no state; results are identical across threads.
#[test]
fn test_parallel_parse_calls() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| parse(BLOG_SCHEMA).expect("Failed to parse schema")))
        .collect();

    let baseline = parse(BLOG_SCHEMA).expect("Failed to parse schema");
    for handle in handles {
        let outcome = handle.join().expect("thread panicked");
        assert_eq!(outcome, baseline);
    }
}
