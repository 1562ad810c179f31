//! Handlers for `/nodes/:id/attachments` endpoints.
//!
//! Content crosses the boundary as base64 text and is stored as bytes.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/nodes/:id/attachments` | Empty list for an unknown node |
//! | `POST`   | `/nodes/:id/attachments` | Body: `{"filename","content_base64"}`; 201 + `{"id"}` |
//! | `DELETE` | `/nodes/:id/attachments/:attachment_id` | 404 unless owned by `:id` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dossier_core::{
  attachment::{Attachment, NewAttachment},
  store::InvestigationStore,
};
use serde::Deserialize;

use crate::{
  Created,
  error::{ApiError, parse_id},
};

/// `GET /nodes/:id/attachments`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(node_id): Path<String>,
) -> Result<Json<Vec<Attachment>>, ApiError>
where
  S: InvestigationStore,
{
  Ok(Json(store.list_attachments(parse_id(&node_id)?)))
}

#[derive(Debug, Deserialize)]
pub struct CreateAttachmentBody {
  pub filename:       String,
  pub content_base64: String,
}

/// `POST /nodes/:id/attachments`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(node_id): Path<String>,
  Json(body): Json<CreateAttachmentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
{
  let input = NewAttachment::from_base64(
    parse_id(&node_id)?,
    body.filename,
    &body.content_base64,
  )?;
  let attachment = store.save_attachment(input)?;
  Ok((StatusCode::CREATED, Json(Created { id: attachment.id })))
}

/// `DELETE /nodes/:id/attachments/:attachment_id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path((node_id, attachment_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  store.delete_attachment(parse_id(&attachment_id)?, parse_id(&node_id)?)?;
  Ok(StatusCode::NO_CONTENT)
}
