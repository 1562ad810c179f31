//! In-memory backend for the Dossier investigation graph.
//!
//! [`GraphStore`] composes three independently owned collections (entities,
//! relationships, attachments) behind a single reader-writer lock, and
//! enforces the invariants that span them: referential integrity of edges
//! and attachments, and cascading deletion.

mod attachments;
mod entities;
mod graph;
mod relationships;

pub mod ids;
pub mod project;

pub use attachments::AttachmentStore;
pub use dossier_core::{Error, Result};
pub use entities::EntityStore;
pub use graph::GraphStore;
pub use relationships::{RelationshipPolicy, RelationshipStore};
