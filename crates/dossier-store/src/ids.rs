//! Identifier allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Hands out opaque identifiers for entities, relationships and attachments.
///
/// Allocators need not guarantee global uniqueness on their own; the store
/// re-draws when an id is already taken.
pub trait IdAllocator: Send + Sync {
  fn allocate(&self) -> Uuid;
}

/// Random version-4 UUIDs. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdAllocator for RandomIds {
  fn allocate(&self) -> Uuid { Uuid::new_v4() }
}

/// Monotonic ids `…0001`, `…0002`, …; reproducible across runs.
#[derive(Debug, Default)]
pub struct SequentialIds {
  next: AtomicU64,
}

impl SequentialIds {
  pub fn new() -> Self { Self::default() }
}

impl IdAllocator for SequentialIds {
  fn allocate(&self) -> Uuid {
    let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
    Uuid::from_u128(u128::from(n))
  }
}
