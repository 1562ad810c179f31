//! [`GraphStore`], the façade implementing [`InvestigationStore`].

use std::collections::HashSet;

use chrono::Utc;
use dossier_core::{
  Error, Result,
  attachment::{Attachment, NewAttachment},
  entity::{Entity, EntityPatch, NewEntity},
  project::GraphSnapshot,
  relationship::{NewRelationship, Relationship, RelationshipPatch},
  store::{CascadeReport, InvestigationStore},
  validate,
};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
  AttachmentStore, EntityStore, RelationshipPolicy, RelationshipStore,
  ids::{IdAllocator, RandomIds},
};

// ─── Graph ───────────────────────────────────────────────────────────────────

/// The three collections, always locked together.
#[derive(Debug, Default)]
struct Graph {
  entities:      EntityStore,
  relationships: RelationshipStore,
  attachments:   AttachmentStore,
}

impl Graph {
  fn id_in_use(&self, id: Uuid) -> bool {
    self.entities.contains(id)
      || self.relationships.get(id).is_some()
      || self.attachments.contains(id)
  }

  /// Relationships whose endpoints both exist. Edges are never stored
  /// orphaned, but reads do not rely on that.
  fn live_relationships(&self) -> impl Iterator<Item = &Relationship> + '_ {
    self.relationships.list_all().filter(move |r| {
      self.entities.contains(r.source_id) && self.entities.contains(r.target_id)
    })
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An investigation graph held entirely in memory.
///
/// Every mutating call takes the write lock exactly once, so a cascade
/// delete, a create or an update is atomic with respect to every other
/// call. Reads share the lock with each other.
pub struct GraphStore {
  graph:  RwLock<Graph>,
  ids:    Box<dyn IdAllocator>,
  policy: RelationshipPolicy,
}

impl Default for GraphStore {
  fn default() -> Self { Self::new() }
}

impl GraphStore {
  /// An empty store with random ids and the permissive relationship policy.
  pub fn new() -> Self { Self::with_policy(RelationshipPolicy::default()) }

  pub fn with_policy(policy: RelationshipPolicy) -> Self {
    Self {
      graph: RwLock::new(Graph::default()),
      ids: Box::new(RandomIds),
      policy,
    }
  }

  /// Replace the id allocator.
  pub fn with_ids(mut self, ids: impl IdAllocator + 'static) -> Self {
    self.ids = Box::new(ids);
    self
  }

  /// Draw ids until one is free across all three collections.
  fn fresh_id(&self, graph: &Graph) -> Uuid {
    loop {
      let id = self.ids.allocate();
      if !graph.id_in_use(id) {
        return id;
      }
    }
  }

  /// Stored edges with a missing endpoint, counted under one read lock and
  /// without the filtering every public read applies.
  #[cfg(test)]
  pub(crate) fn orphaned_relationships(&self) -> usize {
    let graph = self.graph.read();
    graph
      .relationships
      .list_all()
      .filter(|r| {
        !graph.entities.contains(r.source_id) || !graph.entities.contains(r.target_id)
      })
      .count()
  }

  /// Every entity, for export.
  pub fn all_entities(&self) -> Vec<Entity> { self.list_entities() }

  /// Every relationship whose endpoints both exist, for export.
  pub fn all_relationships(&self) -> Vec<Relationship> {
    self.list_relationships()
  }
}

impl InvestigationStore for GraphStore {
  // ── Entities ──────────────────────────────────────────────────────────────

  fn create_entity(&self, input: NewEntity) -> Result<Entity> {
    let mut graph = self.graph.write();
    let id = self.fresh_id(&graph);
    let entity = graph.entities.create(id, input, Utc::now())?.clone();
    tracing::debug!(%id, entity_type = %entity.entity_type, "created entity");
    Ok(entity)
  }

  fn get_entity(&self, id: Uuid) -> Option<Entity> {
    self.graph.read().entities.get(id).cloned()
  }

  fn update_entity(&self, id: Uuid, patch: EntityPatch) -> Result<Entity> {
    let mut graph = self.graph.write();
    let entity = graph.entities.update(id, patch, Utc::now())?.clone();
    tracing::debug!(%id, "updated entity");
    Ok(entity)
  }

  fn delete_entity(&self, id: Uuid) -> Result<CascadeReport> {
    let mut graph = self.graph.write();
    if !graph.entities.contains(id) {
      return Err(Error::EntityNotFound(id));
    }

    let report = CascadeReport {
      relationships_removed: graph.relationships.delete_for_node(id),
      attachments_removed:   graph.attachments.delete_for_node(id),
    };
    graph.entities.delete(id)?;

    tracing::info!(
      %id,
      relationships = report.relationships_removed,
      attachments = report.attachments_removed,
      "deleted entity",
    );
    Ok(report)
  }

  fn list_entities(&self) -> Vec<Entity> {
    self.graph.read().entities.list_all().cloned().collect()
  }

  fn search_entities(&self, query: &str) -> Vec<Entity> {
    self.graph.read().entities.search(query).cloned().collect()
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  fn create_relationship(&self, input: NewRelationship) -> Result<Relationship> {
    let mut graph = self.graph.write();
    let id = self.fresh_id(&graph);
    let Graph {
      entities,
      relationships,
      ..
    } = &mut *graph;
    let rel = relationships
      .create(id, input, entities, self.policy, Utc::now())?
      .clone();
    tracing::debug!(
      %id,
      source = %rel.source_id,
      target = %rel.target_id,
      relation_type = %rel.relation_type,
      "created relationship",
    );
    Ok(rel)
  }

  fn get_relationship(&self, id: Uuid) -> Option<Relationship> {
    self.graph.read().relationships.get(id).cloned()
  }

  fn update_relationship(
    &self,
    id: Uuid,
    patch: RelationshipPatch,
  ) -> Result<Relationship> {
    let mut graph = self.graph.write();
    let rel = graph
      .relationships
      .update(id, patch, self.policy, Utc::now())?
      .clone();
    tracing::debug!(%id, "updated relationship");
    Ok(rel)
  }

  fn delete_relationship(&self, id: Uuid) -> Result<()> {
    self.graph.write().relationships.delete(id)?;
    tracing::debug!(%id, "deleted relationship");
    Ok(())
  }

  fn list_relationships(&self) -> Vec<Relationship> {
    self.graph.read().live_relationships().cloned().collect()
  }

  fn relationships_for_node(&self, node_id: Uuid) -> Vec<Relationship> {
    self
      .graph
      .read()
      .live_relationships()
      .filter(|r| r.touches(node_id))
      .cloned()
      .collect()
  }

  // ── Attachments ───────────────────────────────────────────────────────────

  fn save_attachment(&self, input: NewAttachment) -> Result<Attachment> {
    let mut graph = self.graph.write();
    let id = self.fresh_id(&graph);
    let Graph {
      entities,
      attachments,
      ..
    } = &mut *graph;
    let attachment = attachments.save(id, input, entities)?.clone();
    tracing::debug!(
      %id,
      node = %attachment.node_id,
      bytes = attachment.content.len(),
      "saved attachment",
    );
    Ok(attachment)
  }

  fn list_attachments(&self, node_id: Uuid) -> Vec<Attachment> {
    self
      .graph
      .read()
      .attachments
      .list_for_node(node_id)
      .cloned()
      .collect()
  }

  fn delete_attachment(&self, id: Uuid, node_id: Uuid) -> Result<()> {
    self.graph.write().attachments.delete(id, node_id)?;
    tracing::debug!(%id, node = %node_id, "deleted attachment");
    Ok(())
  }

  // ── Whole graph ───────────────────────────────────────────────────────────

  fn clear_all(&self) {
    let mut graph = self.graph.write();
    graph.relationships.clear();
    graph.attachments.clear();
    graph.entities.clear();
    tracing::info!("cleared all data");
  }

  fn snapshot(&self) -> GraphSnapshot {
    let graph = self.graph.read();
    GraphSnapshot {
      entities:      graph.entities.list_all().cloned().collect(),
      relationships: graph.live_relationships().cloned().collect(),
      attachments:   graph.attachments.list_all().cloned().collect(),
    }
  }

  fn restore(&self, snapshot: GraphSnapshot) -> Result<()> {
    check_snapshot(&snapshot)?;

    let mut next = Graph::default();
    for entity in snapshot.entities {
      next.entities.insert(entity);
    }
    for rel in snapshot.relationships {
      next.relationships.insert(rel);
    }
    for attachment in snapshot.attachments {
      next.attachments.insert(attachment);
    }

    let mut graph = self.graph.write();
    *graph = next;
    tracing::info!(
      entities = graph.entities.len(),
      relationships = graph.relationships.len(),
      attachments = graph.attachments.len(),
      "restored graph",
    );
    Ok(())
  }
}

/// Reject a snapshot that would break any store invariant: repeated ids,
/// invalid field values, dangling endpoints or owners, corrupted content.
fn check_snapshot(snapshot: &GraphSnapshot) -> Result<()> {
  let mut seen = HashSet::new();
  let mut claim = |id: Uuid| {
    if seen.insert(id) {
      Ok(())
    } else {
      Err(Error::Validation(format!("id {id} appears more than once")))
    }
  };

  let mut entity_ids = HashSet::new();
  for e in &snapshot.entities {
    claim(e.id)?;
    validate::label(&e.label)?;
    validate::confidence(e.confidence)?;
    entity_ids.insert(e.id);
  }

  for r in &snapshot.relationships {
    claim(r.id)?;
    validate::confidence(r.confidence)?;
    validate::weight(r.weight)?;
    for endpoint in [r.source_id, r.target_id] {
      if !entity_ids.contains(&endpoint) {
        return Err(Error::Validation(format!(
          "relationship {} references missing entity {endpoint}",
          r.id
        )));
      }
    }
  }

  for a in &snapshot.attachments {
    claim(a.id)?;
    if !entity_ids.contains(&a.node_id) {
      return Err(Error::Validation(format!(
        "attachment {} belongs to missing entity {}",
        a.id, a.node_id
      )));
    }
    if !a.digest_matches() {
      return Err(Error::Validation(format!(
        "attachment {} content does not match its sha256 digest",
        a.id
      )));
    }
  }

  Ok(())
}
