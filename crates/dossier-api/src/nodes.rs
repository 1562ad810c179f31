//! Handlers for `/nodes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/nodes` | Every entity, insertion order |
//! | `POST`   | `/nodes` | Body: [`CreateNodeBody`]; returns 201 + `{"id"}` |
//! | `GET`    | `/nodes/search` | `?query=`; case-insensitive substring |
//! | `GET`    | `/nodes/:id` | The entity, or `null` |
//! | `PATCH`  | `/nodes/:id` | Body: [`UpdateNodeBody`]; returns 204 |
//! | `DELETE` | `/nodes/:id` | Cascades to relationships and attachments; 204 |
//! | `GET`    | `/nodes/:id/relationships` | Edges in either direction |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dossier_core::{
  entity::{Entity, EntityPatch, EntityType, NewEntity},
  relationship::Relationship,
  store::InvestigationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Created,
  error::{ApiError, parse_id},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /nodes`
pub async fn list<S>(State(store): State<Arc<S>>) -> Json<Vec<Entity>>
where
  S: InvestigationStore,
{
  Json(store.list_entities())
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub query: String,
}

/// `GET /nodes/search?query=<text>`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Json<Vec<Entity>>
where
  S: InvestigationStore,
{
  Json(store.search_entities(&params.query))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /nodes`.
#[derive(Debug, Deserialize)]
pub struct CreateNodeBody {
  /// One of the closed entity type names, e.g. `"CryptoWallet"`.
  pub entity_type: String,
  pub label:       String,
  pub description: Option<String>,
  #[serde(default)]
  pub tags:        Vec<String>,
  pub confidence:  Option<f64>,
}

impl TryFrom<CreateNodeBody> for NewEntity {
  type Error = ApiError;

  fn try_from(b: CreateNodeBody) -> Result<Self, ApiError> {
    Ok(NewEntity {
      entity_type: EntityType::parse(&b.entity_type)?,
      label:       b.label,
      description: b.description,
      tags:        b.tags,
      confidence:  b.confidence,
    })
  }
}

/// `POST /nodes`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateNodeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
{
  let entity = store.create_entity(NewEntity::try_from(body)?)?;
  Ok((StatusCode::CREATED, Json(Created { id: entity.id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /nodes/:id`. Unknown and malformed ids both yield `null`.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Json<Option<Entity>>
where
  S: InvestigationStore,
{
  Json(
    Uuid::parse_str(id.trim())
      .ok()
      .and_then(|id| store.get_entity(id)),
  )
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /nodes/:id`. Absent fields are left alone;
/// an empty `description` clears it.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateNodeBody {
  pub label:       Option<String>,
  pub description: Option<String>,
  pub tags:        Option<Vec<String>>,
  pub confidence:  Option<f64>,
}

impl From<UpdateNodeBody> for EntityPatch {
  fn from(b: UpdateNodeBody) -> Self {
    EntityPatch {
      label:       b.label,
      description: b.description,
      tags:        b.tags,
      confidence:  b.confidence,
    }
  }
}

/// `PATCH /nodes/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<UpdateNodeBody>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  store.update_entity(parse_id(&id)?, EntityPatch::from(body))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /nodes/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  store.delete_entity(parse_id(&id)?)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Relationships of one node ────────────────────────────────────────────────

/// `GET /nodes/:id/relationships`. An unknown node has no relationships.
pub async fn relationships<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Relationship>>, ApiError>
where
  S: InvestigationStore,
{
  Ok(Json(store.relationships_for_node(parse_id(&id)?)))
}
