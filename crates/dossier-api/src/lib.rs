//! JSON REST API for Dossier.
//!
//! Exposes an axum [`Router`] backed by any
//! [`dossier_core::store::InvestigationStore`]. Transport concerns (binding,
//! request tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", dossier_api::api_router(store.clone()))
//! ```

pub mod attachments;
pub mod data;
pub mod error;
pub mod export;
pub mod nodes;
pub mod project;
pub mod relationships;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use dossier_core::store::InvestigationStore;
use serde::Serialize;
use uuid::Uuid;

pub use error::ApiError;

/// Body of every `201 Created` response.
#[derive(Debug, Serialize)]
pub struct Created {
  pub id: Uuid,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: InvestigationStore + 'static,
{
  Router::new()
    // Nodes
    .route("/nodes", get(nodes::list::<S>).post(nodes::create::<S>))
    .route("/nodes/search", get(nodes::search::<S>))
    .route(
      "/nodes/{id}",
      get(nodes::get_one::<S>)
        .patch(nodes::update::<S>)
        .delete(nodes::delete_one::<S>),
    )
    .route("/nodes/{id}/relationships", get(nodes::relationships::<S>))
    // Attachments
    .route(
      "/nodes/{id}/attachments",
      get(attachments::list::<S>).post(attachments::create::<S>),
    )
    .route(
      "/nodes/{id}/attachments/{attachment_id}",
      delete(attachments::delete_one::<S>),
    )
    // Relationships
    .route(
      "/relationships",
      get(relationships::list::<S>).post(relationships::create::<S>),
    )
    .route(
      "/relationships/{id}",
      get(relationships::get_one::<S>)
        .patch(relationships::update::<S>)
        .delete(relationships::delete_one::<S>),
    )
    // Files
    .route("/export/{format}", post(export::handler::<S>))
    .route("/project/save", post(project::save::<S>))
    .route("/project/load", post(project::load::<S>))
    .route("/data", delete(data::clear::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
