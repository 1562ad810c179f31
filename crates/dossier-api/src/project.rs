//! Handlers for `/project` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/project/save` | Body: `{"file_path","project_name"}`; 204 |
//! | `POST` | `/project/load` | Body: `{"file_path"}`; returns [`ProjectMetadata`] |

use std::{path::PathBuf, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use dossier_core::{project::ProjectMetadata, store::InvestigationStore};
use dossier_store::project::{load_project, save_project};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SaveBody {
  pub file_path:    PathBuf,
  pub project_name: String,
}

/// `POST /project/save`
pub async fn save<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<SaveBody>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  save_project(store.as_ref(), &body.file_path, &body.project_name).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LoadBody {
  pub file_path: PathBuf,
}

/// `POST /project/load`. On failure the current graph is kept.
pub async fn load<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoadBody>,
) -> Result<Json<ProjectMetadata>, ApiError>
where
  S: InvestigationStore,
{
  Ok(Json(load_project(store.as_ref(), &body.file_path).await?))
}
