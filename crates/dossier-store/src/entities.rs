//! [`EntityStore`], sole owner of entity records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dossier_core::{
  Error, Result,
  entity::{Entity, EntityPatch, NewEntity},
};
use uuid::Uuid;

/// Entities keyed by id, remembering insertion order so listings are
/// stable.
///
/// Deleting here removes only the entity; cascading to relationships and
/// attachments is [`crate::GraphStore`]'s job.
#[derive(Debug, Default, Clone)]
pub struct EntityStore {
  by_id: HashMap<Uuid, Entity>,
  order: Vec<Uuid>,
}

impl EntityStore {
  pub fn new() -> Self { Self::default() }

  /// Validate `input` and store it under `id`.
  pub fn create(
    &mut self,
    id: Uuid,
    input: NewEntity,
    now: DateTime<Utc>,
  ) -> Result<&Entity> {
    let entity = input.into_entity(id, now)?;
    Ok(self.insert(entity))
  }

  /// Store an already-built record, e.g. one read back from a project file.
  pub(crate) fn insert(&mut self, entity: Entity) -> &Entity {
    let id = entity.id;
    debug_assert!(!self.by_id.contains_key(&id), "duplicate entity id {id}");
    self.order.push(id);
    self.by_id.entry(id).or_insert(entity)
  }

  pub fn get(&self, id: Uuid) -> Option<&Entity> { self.by_id.get(&id) }

  pub fn contains(&self, id: Uuid) -> bool { self.by_id.contains_key(&id) }

  /// Apply `patch`; nothing changes unless every supplied field is valid.
  pub fn update(
    &mut self,
    id: Uuid,
    patch: EntityPatch,
    now: DateTime<Utc>,
  ) -> Result<&Entity> {
    let entity = self.by_id.get_mut(&id).ok_or(Error::EntityNotFound(id))?;
    patch.validate()?;
    patch.apply(entity, now);
    Ok(entity)
  }

  pub fn delete(&mut self, id: Uuid) -> Result<Entity> {
    let entity = self.by_id.remove(&id).ok_or(Error::EntityNotFound(id))?;
    self.order.retain(|x| *x != id);
    Ok(entity)
  }

  /// Every entity in insertion order.
  pub fn list_all(&self) -> impl Iterator<Item = &Entity> + '_ {
    self.order.iter().filter_map(move |id| self.by_id.get(id))
  }

  pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Entity> + 'a {
    let needle = query.to_lowercase();
    self.list_all().filter(move |e| e.matches(&needle))
  }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }

  pub fn clear(&mut self) {
    self.by_id.clear();
    self.order.clear();
  }
}
