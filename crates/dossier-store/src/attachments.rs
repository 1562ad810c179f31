//! [`AttachmentStore`], sole owner of attachment payloads.

use std::collections::HashMap;

use dossier_core::{
  Error, Result,
  attachment::{Attachment, NewAttachment},
};
use uuid::Uuid;

use crate::EntityStore;

/// Attachments keyed by id, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct AttachmentStore {
  by_id: HashMap<Uuid, Attachment>,
  order: Vec<Uuid>,
}

impl AttachmentStore {
  pub fn new() -> Self { Self::default() }

  /// Store `input` under `id`. The owning entity must exist.
  pub fn save(
    &mut self,
    id: Uuid,
    input: NewAttachment,
    entities: &EntityStore,
  ) -> Result<&Attachment> {
    if !entities.contains(input.node_id) {
      return Err(Error::EntityNotFound(input.node_id));
    }
    Ok(self.insert(input.into_attachment(id)))
  }

  pub(crate) fn insert(&mut self, attachment: Attachment) -> &Attachment {
    let id = attachment.id;
    debug_assert!(!self.by_id.contains_key(&id), "duplicate attachment id {id}");
    self.order.push(id);
    self.by_id.entry(id).or_insert(attachment)
  }

  pub fn contains(&self, id: Uuid) -> bool { self.by_id.contains_key(&id) }

  pub fn list_for_node(&self, node_id: Uuid) -> impl Iterator<Item = &Attachment> + '_ {
    self.list_all().filter(move |a| a.node_id == node_id)
  }

  pub fn list_all(&self) -> impl Iterator<Item = &Attachment> + '_ {
    self.order.iter().filter_map(move |id| self.by_id.get(id))
  }

  /// Delete attachment `id` only if it belongs to `node_id`. An attachment
  /// owned by another entity is reported as not found.
  pub fn delete(&mut self, id: Uuid, node_id: Uuid) -> Result<Attachment> {
    let owned = self.by_id.get(&id).is_some_and(|a| a.node_id == node_id);
    if !owned {
      return Err(Error::AttachmentNotFound {
        attachment: id,
        node:       node_id,
      });
    }
    self.order.retain(|x| *x != id);
    self.by_id.remove(&id).ok_or(Error::AttachmentNotFound {
      attachment: id,
      node:       node_id,
    })
  }

  /// Remove every attachment owned by `node_id`; returns how many went.
  pub fn delete_for_node(&mut self, node_id: Uuid) -> usize {
    let before = self.by_id.len();
    self.by_id.retain(|_, a| a.node_id != node_id);
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
