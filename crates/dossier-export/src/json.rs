//! JSON export: `{ "nodes": [...], "relationships": [...] }`.
//!
//! Field names are the record attribute names and timestamps are RFC 3339
//! strings, so the output loads back as a project.

use dossier_core::{entity::Entity, project::GraphSnapshot, relationship::Relationship};
use serde::Serialize;

use crate::Result;

#[derive(Serialize)]
struct Document<'a> {
  nodes:         &'a [Entity],
  relationships: &'a [Relationship],
}

pub fn render(snapshot: &GraphSnapshot) -> Result<String> {
  let doc = Document {
    nodes:         &snapshot.entities,
    relationships: &snapshot.relationships,
  };
  Ok(serde_json::to_string_pretty(&doc)?)
}
