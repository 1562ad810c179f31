//! GraphML export.
//!
//! Uses `quick-xml`'s writer API, which escapes text and attribute values.
//! Every `<key>` is declared before the `<graph>` element, and key ids carry
//! a scope prefix (`n_` for nodes, `e_` for edges) so a node attribute and
//! an edge attribute with the same name never share a key.

use std::{borrow::Cow, io::Cursor};

use dossier_core::project::GraphSnapshot;
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{Error, Result, csv::TAG_SEPARATOR};

pub const NS_GRAPHML: &str = "http://graphml.graphdrawing.org/xmlns";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://graphml.graphdrawing.org/xmlns \
                               http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

// ─── Key declarations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  Node,
  Edge,
}

impl Scope {
  fn as_str(self) -> &'static str {
    match self {
      Self::Node => "node",
      Self::Edge => "edge",
    }
  }
}

/// A `<key>` declaration.
#[derive(Debug, Clone, Copy)]
pub struct Key {
  pub id:        &'static str,
  pub scope:     Scope,
  pub attr_name: &'static str,
  pub attr_type: &'static str,
}

const fn key(
  id: &'static str,
  scope: Scope,
  attr_name: &'static str,
  attr_type: &'static str,
) -> Key {
  Key {
    id,
    scope,
    attr_name,
    attr_type,
  }
}

pub const NODE_KEYS: [Key; 7] = [
  key("n_entity_type", Scope::Node, "entity_type", "string"),
  key("n_label", Scope::Node, "label", "string"),
  key("n_description", Scope::Node, "description", "string"),
  key("n_tags", Scope::Node, "tags", "string"),
  key("n_confidence", Scope::Node, "confidence", "double"),
  key("n_created_at", Scope::Node, "created_at", "string"),
  key("n_updated_at", Scope::Node, "updated_at", "string"),
];

pub const EDGE_KEYS: [Key; 6] = [
  key("e_relation_type", Scope::Edge, "relation_type", "string"),
  key("e_description", Scope::Edge, "description", "string"),
  key("e_weight", Scope::Edge, "weight", "double"),
  key("e_confidence", Scope::Edge, "confidence", "double"),
  key("e_source", Scope::Edge, "source", "string"),
  key("e_created_at", Scope::Edge, "created_at", "string"),
];

// ─── Rendering ───────────────────────────────────────────────────────────────

pub fn render(snapshot: &GraphSnapshot) -> Result<String> {
  let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

  emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

  let mut root = BytesStart::new("graphml");
  root.push_attribute(("xmlns", NS_GRAPHML));
  root.push_attribute(("xmlns:xsi", NS_XSI));
  root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
  emit(&mut w, Event::Start(root))?;

  for k in NODE_KEYS.iter().chain(EDGE_KEYS.iter()) {
    let mut el = BytesStart::new("key");
    el.push_attribute(("id", k.id));
    el.push_attribute(("for", k.scope.as_str()));
    el.push_attribute(("attr.name", k.attr_name));
    el.push_attribute(("attr.type", k.attr_type));
    emit(&mut w, Event::Empty(el))?;
  }

  let mut graph = BytesStart::new("graph");
  graph.push_attribute(("id", "G"));
  graph.push_attribute(("edgedefault", "directed"));
  emit(&mut w, Event::Start(graph))?;

  for e in &snapshot.entities {
    let mut node = BytesStart::new("node");
    node.push_attribute(("id", e.id.to_string().as_str()));
    emit(&mut w, Event::Start(node))?;

    write_data(&mut w, "n_entity_type", Some(e.entity_type.as_ref()))?;
    write_data(&mut w, "n_label", Some(e.label.as_str()))?;
    write_data(&mut w, "n_description", e.description.as_deref())?;
    if !e.tags.is_empty() {
      write_data(&mut w, "n_tags", Some(e.tags.join(TAG_SEPARATOR).as_str()))?;
    }
    write_data(&mut w, "n_confidence", Some(e.confidence.to_string().as_str()))?;
    write_data(&mut w, "n_created_at", Some(e.created_at.to_rfc3339().as_str()))?;
    write_data(&mut w, "n_updated_at", Some(e.updated_at.to_rfc3339().as_str()))?;

    emit(&mut w, Event::End(BytesEnd::new("node")))?;
  }

  for r in &snapshot.relationships {
    let mut edge = BytesStart::new("edge");
    edge.push_attribute(("id", r.id.to_string().as_str()));
    edge.push_attribute(("source", r.source_id.to_string().as_str()));
    edge.push_attribute(("target", r.target_id.to_string().as_str()));
    emit(&mut w, Event::Start(edge))?;

    write_data(&mut w, "e_relation_type", Some(r.relation_type.as_ref()))?;
    write_data(&mut w, "e_description", r.description.as_deref())?;
    write_data(&mut w, "e_weight", Some(r.weight.to_string().as_str()))?;
    write_data(&mut w, "e_confidence", Some(r.confidence.to_string().as_str()))?;
    write_data(&mut w, "e_source", r.source.as_deref())?;
    write_data(&mut w, "e_created_at", Some(r.created_at.to_rfc3339().as_str()))?;

    emit(&mut w, Event::End(BytesEnd::new("edge")))?;
  }

  emit(&mut w, Event::End(BytesEnd::new("graph")))?;
  emit(&mut w, Event::End(BytesEnd::new("graphml")))?;

  let bytes = w.into_inner().into_inner();
  let mut text = String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))?;
  text.push('\n');
  Ok(text)
}

// ─── XML writer helpers ──────────────────────────────────────────────────────

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<()> {
  w.write_event(event).map_err(|e| Error::Xml(e.to_string()))
}

/// Whether `c` may appear in an XML 1.0 document at all, escaped or not.
fn is_xml_char(c: char) -> bool {
  matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}')
    || c >= '\u{10000}'
}

/// `s` without the characters XML cannot carry (C0 controls other than
/// tab, newline and carriage return, plus U+FFFE and U+FFFF).
pub(crate) fn xml_safe(s: &str) -> Cow<'_, str> {
  if s.chars().all(is_xml_char) {
    Cow::Borrowed(s)
  } else {
    Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
  }
}

/// `<data key="...">value</data>`; nothing at all when `value` is absent.
fn write_data(w: &mut XmlWriter, key: &str, value: Option<&str>) -> Result<()> {
  let Some(value) = value else { return Ok(()) };
  let mut el = BytesStart::new("data");
  el.push_attribute(("key", key));
  emit(w, Event::Start(el))?;
  emit(w, Event::Text(BytesText::new(&xml_safe(value))))?;
  emit(w, Event::End(BytesEnd::new("data")))
}
