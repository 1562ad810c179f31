//! The `InvestigationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `dossier-store`).
//! Higher layers (`dossier-api`, project save/load) depend on this
//! abstraction, not on any concrete backend.
//!
//! Every method is a single atomic operation: a call that returns an error
//! leaves the store exactly as it was.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  attachment::{Attachment, NewAttachment},
  entity::{Entity, EntityPatch, NewEntity},
  project::GraphSnapshot,
  relationship::{NewRelationship, Relationship, RelationshipPatch},
};

/// What a cascading entity delete removed besides the entity itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
  pub relationships_removed: usize,
  pub attachments_removed:   usize,
}

pub trait InvestigationStore: Send + Sync {
  // ── Entities ──────────────────────────────────────────────────────────

  /// Validate and persist a new entity. The store assigns the id and both
  /// timestamps.
  fn create_entity(&self, input: NewEntity) -> Result<Entity>;

  /// Retrieve an entity by id. Returns `None` if not found.
  fn get_entity(&self, id: Uuid) -> Option<Entity>;

  /// Replace the supplied fields and refresh `updated_at`.
  fn update_entity(&self, id: Uuid, patch: EntityPatch) -> Result<Entity>;

  /// Delete an entity together with every relationship touching it and
  /// every attachment it owns.
  fn delete_entity(&self, id: Uuid) -> Result<CascadeReport>;

  /// All entities in insertion order.
  fn list_entities(&self) -> Vec<Entity>;

  /// Case-insensitive substring search over label, description and tags.
  /// An empty query returns every entity.
  fn search_entities(&self, query: &str) -> Vec<Entity>;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Persist a new edge. Both endpoints must exist at call time.
  fn create_relationship(&self, input: NewRelationship) -> Result<Relationship>;

  fn get_relationship(&self, id: Uuid) -> Option<Relationship>;

  fn update_relationship(
    &self,
    id: Uuid,
    patch: RelationshipPatch,
  ) -> Result<Relationship>;

  fn delete_relationship(&self, id: Uuid) -> Result<()>;

  /// All relationships whose endpoints both exist, in insertion order.
  fn list_relationships(&self) -> Vec<Relationship>;

  /// Relationships where `node_id` is the source or the target.
  fn relationships_for_node(&self, node_id: Uuid) -> Vec<Relationship>;

  // ── Attachments ───────────────────────────────────────────────────────

  fn save_attachment(&self, input: NewAttachment) -> Result<Attachment>;

  /// Attachments owned by `node_id`; empty for an unknown node.
  fn list_attachments(&self, node_id: Uuid) -> Vec<Attachment>;

  /// Delete attachment `id`, which must belong to `node_id`.
  fn delete_attachment(&self, id: Uuid, node_id: Uuid) -> Result<()>;

  // ── Whole graph ───────────────────────────────────────────────────────

  /// Remove everything. Never fails.
  fn clear_all(&self);

  /// A consistent copy of the whole graph.
  fn snapshot(&self) -> GraphSnapshot;

  /// Replace the whole graph with `snapshot`, preserving ids and
  /// timestamps. An inconsistent snapshot is rejected before anything is
  /// replaced.
  fn restore(&self, snapshot: GraphSnapshot) -> Result<()>;
}
