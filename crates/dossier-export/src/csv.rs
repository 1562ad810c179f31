//! CSV export.
//!
//! One document, two sections separated by a blank line: entities first,
//! then relationships, each with its own header row. Quoting follows
//! RFC 4180: a field containing a comma, a double quote or a line break is
//! wrapped in double quotes with inner quotes doubled.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use dossier_core::project::GraphSnapshot;

pub const ENTITY_HEADER: [&str; 8] = [
  "id",
  "type",
  "label",
  "description",
  "tags",
  "confidence",
  "created_at",
  "updated_at",
];

pub const RELATIONSHIP_HEADER: [&str; 9] = [
  "id",
  "source_id",
  "target_id",
  "relation_type",
  "description",
  "weight",
  "confidence",
  "source",
  "created_at",
];

/// Separator used when flattening an entity's tags into one cell.
pub const TAG_SEPARATOR: &str = ";";

pub fn render(snapshot: &GraphSnapshot) -> String {
  let mut out = String::new();

  push_row(&mut out, &ENTITY_HEADER);
  for e in &snapshot.entities {
    push_row(&mut out, &[
      e.id.to_string().as_str(),
      e.entity_type.as_ref(),
      e.label.as_str(),
      e.description.as_deref().unwrap_or_default(),
      e.tags.join(TAG_SEPARATOR).as_str(),
      e.confidence.to_string().as_str(),
      timestamp(e.created_at).as_str(),
      timestamp(e.updated_at).as_str(),
    ]);
  }

  out.push('\n');

  push_row(&mut out, &RELATIONSHIP_HEADER);
  for r in &snapshot.relationships {
    push_row(&mut out, &[
      r.id.to_string().as_str(),
      r.source_id.to_string().as_str(),
      r.target_id.to_string().as_str(),
      r.relation_type.as_ref(),
      r.description.as_deref().unwrap_or_default(),
      r.weight.to_string().as_str(),
      r.confidence.to_string().as_str(),
      r.source.as_deref().unwrap_or_default(),
      timestamp(r.created_at).as_str(),
    ]);
  }

  out
}

fn timestamp(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn push_row(out: &mut String, fields: &[&str]) {
  for (i, f) in fields.iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    out.push_str(&escape(f));
  }
  out.push('\n');
}

/// Quote `field` if it needs quoting.
pub fn escape(field: &str) -> Cow<'_, str> {
  if field.contains([',', '"', '\n', '\r']) {
    Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
  } else {
    Cow::Borrowed(field)
  }
}
