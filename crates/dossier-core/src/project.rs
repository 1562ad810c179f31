//! Whole-graph values: the snapshot handed to exporters and the on-disk
//! project document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{attachment::Attachment, entity::Entity, relationship::Relationship};

/// Version string written into every saved project.
pub const PROJECT_FORMAT_VERSION: &str = "1.0.0";

/// A consistent, point-in-time copy of everything in a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
  pub entities:      Vec<Entity>,
  pub relationships: Vec<Relationship>,
  pub attachments:   Vec<Attachment>,
}

impl GraphSnapshot {
  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
      && self.relationships.is_empty()
      && self.attachments.is_empty()
  }
}

// ─── Project file ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHeader {
  pub name:     String,
  pub saved_at: DateTime<Utc>,
  pub version:  String,
}

/// The document written by a project save.
///
/// The entity and relationship arrays use the same keys as the JSON export,
/// and the header and attachments are optional on read, so a plain JSON
/// export loads as a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata:      Option<ProjectHeader>,
  #[serde(rename = "nodes")]
  pub entities:      Vec<Entity>,
  pub relationships: Vec<Relationship>,
  #[serde(default)]
  pub attachments:   Vec<Attachment>,
}

impl ProjectFile {
  pub fn new(name: impl Into<String>, snapshot: GraphSnapshot) -> Self {
    Self {
      metadata:      Some(ProjectHeader {
        name:     name.into(),
        saved_at: Utc::now(),
        version:  PROJECT_FORMAT_VERSION.to_owned(),
      }),
      entities:      snapshot.entities,
      relationships: snapshot.relationships,
      attachments:   snapshot.attachments,
    }
  }

  /// Split into the header (if any) and the graph contents.
  pub fn into_parts(self) -> (Option<ProjectHeader>, GraphSnapshot) {
    (self.metadata, GraphSnapshot {
      entities:      self.entities,
      relationships: self.relationships,
      attachments:   self.attachments,
    })
  }
}

/// Summary returned after a project has been loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
  pub project_name:       String,
  pub saved_at:           Option<DateTime<Utc>>,
  pub entity_count:       usize,
  pub relationship_count: usize,
  pub attachment_count:   usize,
}
