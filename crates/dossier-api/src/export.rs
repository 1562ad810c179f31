//! Handler for `POST /export/:format`.
//!
//! `format` is `json`, `csv` or `graphml`; the body names the destination
//! file: `{"file_path":"/tmp/case.graphml"}`. The graph is copied out of
//! the store before anything is rendered or written.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use dossier_core::store::InvestigationStore;
use dossier_export::ExportFormat;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ExportBody {
  pub file_path: PathBuf,
}

/// `POST /export/:format`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(format): Path<String>,
  Json(body): Json<ExportBody>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  let format = ExportFormat::parse(&format)?;
  let snapshot = store.snapshot();
  dossier_export::write(format, &snapshot, &body.file_path).await?;
  Ok(StatusCode::NO_CONTENT)
}
