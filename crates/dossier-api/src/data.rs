//! Handler for `DELETE /data`: wipe every entity, relationship and
//! attachment.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use dossier_core::store::InvestigationStore;

/// `DELETE /data`
pub async fn clear<S>(State(store): State<Arc<S>>) -> StatusCode
where
  S: InvestigationStore,
{
  store.clear_all();
  StatusCode::NO_CONTENT
}
