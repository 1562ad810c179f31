//! [`RelationshipStore`], sole owner of relationship records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dossier_core::{
  Error, Result,
  relationship::{NewRelationship, RelationType, Relationship, RelationshipPatch},
};
use uuid::Uuid;

use crate::EntityStore;

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Which structurally valid edges are nevertheless refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipPolicy {
  /// Permit `source_id == target_id`.
  pub allow_self_loops: bool,
  /// Permit more than one edge with the same source, target and type.
  pub allow_duplicates: bool,
}

impl Default for RelationshipPolicy {
  fn default() -> Self {
    Self {
      allow_self_loops: true,
      allow_duplicates: true,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Relationships keyed by id, in insertion order. Each record refers to its
/// endpoints by id only; the entities themselves live in [`EntityStore`].
#[derive(Debug, Default, Clone)]
pub struct RelationshipStore {
  by_id: HashMap<Uuid, Relationship>,
  order: Vec<Uuid>,
}

impl RelationshipStore {
  pub fn new() -> Self { Self::default() }

  /// Validate `input`, resolve both endpoints against `entities` and store
  /// the edge under `id`. Nothing is stored on failure.
  pub fn create(
    &mut self,
    id: Uuid,
    input: NewRelationship,
    entities: &EntityStore,
    policy: RelationshipPolicy,
    now: DateTime<Utc>,
  ) -> Result<&Relationship> {
    let rel = input.into_relationship(id, now)?;

    for endpoint in [rel.source_id, rel.target_id] {
      if !entities.contains(endpoint) {
        return Err(Error::EntityNotFound(endpoint));
      }
    }
    self.check_policy(&rel, policy)?;

    Ok(self.insert(rel))
  }

  pub(crate) fn insert(&mut self, rel: Relationship) -> &Relationship {
    let id = rel.id;
    debug_assert!(!self.by_id.contains_key(&id), "duplicate relationship id {id}");
    self.order.push(id);
    self.by_id.entry(id).or_insert(rel)
  }

  fn check_policy(&self, rel: &Relationship, policy: RelationshipPolicy) -> Result<()> {
    if !policy.allow_self_loops && rel.source_id == rel.target_id {
      return Err(Error::Validation(format!(
        "self-relationships are not allowed (entity {})",
        rel.source_id
      )));
    }
    if !policy.allow_duplicates
      && self.has_parallel(rel.id, rel.source_id, rel.target_id, rel.relation_type)
    {
      return Err(Error::Validation(format!(
        "a {} relationship from {} to {} already exists",
        rel.relation_type, rel.source_id, rel.target_id
      )));
    }
    Ok(())
  }

  /// Whether an edge other than `except` already joins the same ordered pair
  /// with the same type.
  fn has_parallel(
    &self,
    except: Uuid,
    source_id: Uuid,
    target_id: Uuid,
    relation_type: RelationType,
  ) -> bool {
    self.by_id.values().any(|r| {
      r.id != except
        && r.source_id == source_id
        && r.target_id == target_id
        && r.relation_type == relation_type
    })
  }

  pub fn get(&self, id: Uuid) -> Option<&Relationship> { self.by_id.get(&id) }

  pub fn update(
    &mut self,
    id: Uuid,
    patch: RelationshipPatch,
    policy: RelationshipPolicy,
    now: DateTime<Utc>,
  ) -> Result<&Relationship> {
    let current = self.by_id.get(&id).ok_or(Error::RelationshipNotFound(id))?;
    patch.validate()?;

    let mut updated = current.clone();
    patch.apply(&mut updated, now);
    self.check_policy(&updated, policy)?;

    let slot = self.by_id.get_mut(&id).ok_or(Error::RelationshipNotFound(id))?;
    *slot = updated;
    Ok(slot)
  }

  pub fn delete(&mut self, id: Uuid) -> Result<Relationship> {
    let rel = self.by_id.remove(&id).ok_or(Error::RelationshipNotFound(id))?;
    self.order.retain(|x| *x != id);
    Ok(rel)
  }

  /// Every relationship in insertion order.
  pub fn list_all(&self) -> impl Iterator<Item = &Relationship> + '_ {
    self.order.iter().filter_map(move |id| self.by_id.get(id))
  }

  /// Relationships where `node_id` is the source or the target. Compare
  /// `source_id` with `node_id` (or use
  /// [`Relationship::direction_from`]) to tell outgoing from incoming.
  pub fn list_for_node(&self, node_id: Uuid) -> impl Iterator<Item = &Relationship> + '_ {
    self.list_all().filter(move |r| r.touches(node_id))
  }

  /// Remove every relationship touching `node_id`; returns how many went.
  pub fn delete_for_node(&mut self, node_id: Uuid) -> usize {
    let before = self.by_id.len();
    self.by_id.retain(|_, r| !r.touches(node_id));
    let by_id = &self.by_id;
    self.order.retain(|id| by_id.contains_key(id));
    before - self.by_id.len()
  }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }

  pub fn clear(&mut self) {
    self.by_id.clear();
    self.order.clear();
  }
}
