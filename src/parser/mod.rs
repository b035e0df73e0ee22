//! DBML document parser.
//!
//! Turns schema text into the raw tree. Parsing is a static call into a
//! zero-state pest parser, so concurrent invocations share nothing.

mod grammar;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use pest::Parser as _;
use pest::iterators::Pair;
use smol_str::SmolStr;

use crate::ast::*;
use crate::error::{SchemaError, SchemaResult};

pub use grammar::{DbmlParser, Rule};

/// Parse a DBML document into a raw tree.
///
/// All content lands in a single schema named `public`. Table aliases are
/// resolved to table names, and every shape-valid ref attaches its target
/// endpoint to the source field when that field exists.
pub fn parse_document(input: &str) -> SchemaResult<Database> {
    let mut pairs =
        DbmlParser::parse(Rule::document, input).map_err(|e| syntax_fault(input, e))?;

    let mut builder = DocumentBuilder::new();

    // The top-level parse result is a single "document" rule.
    let document = pairs.next().unwrap();
    for item in document.into_inner() {
        match item.as_rule() {
            Rule::table_def => builder.push_table(item),
            Rule::ref_def => builder.push_ref(item),
            Rule::EOI => {}
            _ => {}
        }
    }

    let mut database = Database::single(builder.schema);
    resolve_aliases(&mut database);
    attach_field_endpoints(&mut database);
    Ok(database)
}

/// Parse a DBML document from a file.
pub fn parse_document_file(path: impl AsRef<Path>) -> SchemaResult<Database> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_document(&content)
}

/// Incremental raw-tree builder fed by the pair walker.
struct DocumentBuilder {
    schema: Schema,
    next_table_id: u32,
    next_ref_id: u32,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            schema: Schema::default(),
            next_table_id: 0,
            next_ref_id: 0,
        }
    }

    fn push_table(&mut self, pair: Pair<'_, Rule>) {
        let span = span_of(&pair);
        let mut inner = pair.into_inner();

        let name = ident_text(inner.next().unwrap());
        self.next_table_id += 1;
        let mut table = Table::new(self.next_table_id, name, span);

        for item in inner {
            match item.as_rule() {
                Rule::table_alias => {
                    table.alias = Some(ident_text(item.into_inner().next().unwrap()));
                }
                Rule::table_note => {
                    table.note = Some(string_text(item.into_inner().next().unwrap()));
                }
                Rule::column_def => {
                    let field = self.parse_column(item, &table.name);
                    table.add_field(field);
                }
                _ => {}
            }
        }

        self.schema.tables.push(table);
    }

    fn parse_column(&mut self, pair: Pair<'_, Rule>, table_name: &SmolStr) -> Field {
        let span = span_of(&pair);
        let mut inner = pair.into_inner();

        let name = ident_text(inner.next().unwrap());
        let type_desc = TypeDescriptor::new(type_text(inner.next().unwrap()));
        let mut field = Field::new(name, Some(type_desc), span);

        if let Some(settings) = inner.next() {
            for setting in settings.into_inner() {
                match setting.as_rule() {
                    Rule::pk_setting | Rule::primary_key_setting => field.pk = true,
                    Rule::not_null_setting => field.not_null = true,
                    Rule::null_setting => field.not_null = false,
                    Rule::unique_setting => field.unique = true,
                    Rule::increment_setting => field.increment = true,
                    Rule::default_setting => {
                        field.default =
                            Some(parse_literal(setting.into_inner().next().unwrap()));
                    }
                    Rule::note_setting => {
                        field.note = Some(string_text(setting.into_inner().next().unwrap()));
                    }
                    Rule::inline_ref => {
                        let field_name = field.name.clone();
                        self.push_inline_ref(setting, table_name, &field_name, span);
                    }
                    _ => {}
                }
            }
        }

        field
    }

    /// An inline `ref:` setting becomes a full ref in document order; the
    /// field itself picks up its endpoint in the attachment pass.
    fn push_inline_ref(
        &mut self,
        pair: Pair<'_, Rule>,
        table_name: &SmolStr,
        field_name: &SmolStr,
        span: Span,
    ) {
        let mut inner = pair.into_inner();
        let op = inner.next().unwrap().as_str();
        let mut target = inner.next().unwrap().into_inner();
        let target_table = ident_text(target.next().unwrap());
        let target_field = ident_text(target.next().unwrap());

        let (from_card, to_card) = endpoint_cardinalities(op);
        let from = Endpoint::new(table_name.clone(), vec![field_name.clone()])
            .with_relation(RelationDescriptor::new(from_card));
        let to = Endpoint::new(target_table, vec![target_field])
            .with_relation(RelationDescriptor::new(to_card));

        self.next_ref_id += 1;
        self.schema
            .refs
            .push(Ref::new(self.next_ref_id, vec![from, to], span));
    }

    fn push_ref(&mut self, pair: Pair<'_, Rule>) {
        let span = span_of(&pair);

        let mut name = None;
        let mut endpoints = Vec::with_capacity(2);
        let mut op = "-";
        let mut on_delete = None;
        let mut on_update = None;

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::ref_name => {
                    name = Some(ident_text(item.into_inner().next().unwrap()));
                }
                Rule::ref_endpoint => endpoints.push(parse_endpoint(item)),
                Rule::rel_op => op = item.as_str(),
                Rule::ref_settings => {
                    for setting in item.into_inner() {
                        let mut kv = setting.into_inner();
                        let key = kv.next().unwrap().as_str().to_lowercase();
                        let value: SmolStr = kv.next().unwrap().as_str().trim().into();
                        match key.as_str() {
                            "delete" => on_delete = Some(value),
                            "update" => on_update = Some(value),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        let (from_card, to_card) = endpoint_cardinalities(op);
        let mut iter = endpoints.into_iter();
        let from = iter
            .next()
            .unwrap()
            .with_relation(action_descriptor(from_card, &on_delete, &on_update));
        let to = iter
            .next()
            .unwrap()
            .with_relation(action_descriptor(to_card, &on_delete, &on_update));

        self.next_ref_id += 1;
        let mut r = Ref::new(self.next_ref_id, vec![from, to], span);
        r.name = name;
        self.schema.refs.push(r);
    }
}

fn parse_endpoint(pair: Pair<'_, Rule>) -> Endpoint {
    let mut inner = pair.into_inner();
    let table = ident_text(inner.next().unwrap());
    let second = inner.next().unwrap();

    let fields = match second.as_rule() {
        Rule::column_group => second.into_inner().map(ident_text).collect(),
        _ => vec![ident_text(second)],
    };

    Endpoint::new(table, fields)
}

fn action_descriptor(
    cardinality: EndpointCardinality,
    on_delete: &Option<SmolStr>,
    on_update: &Option<SmolStr>,
) -> RelationDescriptor {
    let mut descriptor = RelationDescriptor::new(cardinality);
    descriptor.on_delete = on_delete.clone();
    descriptor.on_update = on_update.clone();
    descriptor
}

/// Map a relationship symbol to per-endpoint cardinality markers.
fn endpoint_cardinalities(op: &str) -> (EndpointCardinality, EndpointCardinality) {
    match op {
        "<" => (EndpointCardinality::One, EndpointCardinality::Many),
        ">" => (EndpointCardinality::Many, EndpointCardinality::One),
        "<>" => (EndpointCardinality::Many, EndpointCardinality::Many),
        _ => (EndpointCardinality::One, EndpointCardinality::One),
    }
}

fn parse_literal(pair: Pair<'_, Rule>) -> DefaultValue {
    match pair.as_rule() {
        Rule::boolean => DefaultValue::Boolean(pair.as_str().eq_ignore_ascii_case("true")),
        Rule::number => DefaultValue::Number(pair.as_str().parse().unwrap_or(0.0)),
        Rule::expression => {
            let text = pair.as_str();
            DefaultValue::Expression(text.trim_matches('`').to_string())
        }
        _ => DefaultValue::String(string_text(pair)),
    }
}

fn span_of(pair: &Pair<'_, Rule>) -> Span {
    let span = pair.as_span();
    Span::new(span.start(), span.end())
}

fn ident_text(pair: Pair<'_, Rule>) -> SmolStr {
    let text = pair.as_str();
    if pair.as_rule() == Rule::quoted_ident {
        SmolStr::new(&text[1..text.len() - 1])
    } else {
        SmolStr::new(text)
    }
}

fn type_text(pair: Pair<'_, Rule>) -> SmolStr {
    let text = pair.as_str();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        SmolStr::new(&text[1..text.len() - 1])
    } else {
        SmolStr::new(text)
    }
}

fn string_text(pair: Pair<'_, Rule>) -> String {
    let text = pair.as_str();
    if let Some(stripped) = text
        .strip_prefix("'''")
        .and_then(|t| t.strip_suffix("'''"))
    {
        stripped.trim().to_string()
    } else {
        text.strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(text)
            .to_string()
    }
}

/// Rewrite alias-valued endpoint table names to the aliased table's name.
/// Real table names take precedence over a clashing alias.
fn resolve_aliases(database: &mut Database) {
    for schema in &mut database.schemas {
        let mut aliases: HashMap<SmolStr, SmolStr> = HashMap::new();
        let mut names: HashSet<SmolStr> = HashSet::new();
        for table in &schema.tables {
            names.insert(table.name.clone());
            if let Some(alias) = &table.alias {
                aliases.entry(alias.clone()).or_insert(table.name.clone());
            }
        }

        for r in &mut schema.refs {
            for endpoint in &mut r.endpoints {
                if let Some(table_name) = &endpoint.table_name {
                    if !names.contains(table_name) {
                        if let Some(real) = aliases.get(table_name) {
                            endpoint.table_name = Some(real.clone());
                        }
                    }
                }
            }
        }
    }
}

/// Attach each shape-valid ref's target endpoint to its source field, so the
/// converter can derive a foreign key from the field alone.
fn attach_field_endpoints(database: &mut Database) {
    for schema in &mut database.schemas {
        let attachments: Vec<(SmolStr, SmolStr, Endpoint)> = schema
            .refs
            .iter()
            .filter_map(|r| {
                let from = r.endpoints.first()?;
                let to = r.endpoints.get(1)?;
                let from_table = from.table_name.clone()?;
                let from_field = from.first_field()?.clone();
                to.table_name.as_ref()?;
                Some((from_table, from_field, to.clone()))
            })
            .collect();

        for (table_name, field_name, endpoint) in attachments {
            if let Some(field) = schema
                .tables
                .iter_mut()
                .find(|t| t.name == table_name)
                .and_then(|t| t.fields.iter_mut().find(|f| f.name == field_name))
            {
                field.endpoints.push(endpoint);
            }
        }
    }
}

fn syntax_fault(input: &str, error: pest::error::Error<Rule>) -> SchemaError {
    let (line, column) = match error.line_col {
        pest::error::LineColLocation::Pos((line, column)) => (line, column),
        pest::error::LineColLocation::Span((line, column), _) => (line, column),
    };
    let (offset, len) = match error.location {
        pest::error::InputLocation::Pos(pos) => (pos, 1),
        pest::error::InputLocation::Span((start, end)) => (start, end.saturating_sub(start).max(1)),
    };
    let offset = offset.min(input.len());
    let len = len.min(input.len() - offset).max(if offset < input.len() { 1 } else { 0 });

    SchemaError::syntax(
        input.to_string(),
        offset,
        len,
        line,
        column,
        error.variant.message().into_owned(),
    )
}
