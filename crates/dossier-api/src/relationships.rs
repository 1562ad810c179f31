//! Handlers for `/relationships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relationships` | Every live edge, insertion order |
//! | `POST`   | `/relationships` | Body: [`CreateRelationshipBody`]; returns 201 + `{"id"}` |
//! | `GET`    | `/relationships/:id` | 404 if not found |
//! | `PATCH`  | `/relationships/:id` | Body: [`UpdateRelationshipBody`]; returns 204 |
//! | `DELETE` | `/relationships/:id` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dossier_core::{
  Error,
  relationship::{NewRelationship, RelationType, Relationship, RelationshipPatch},
  store::InvestigationStore,
};
use serde::Deserialize;

use crate::{
  Created,
  error::{ApiError, parse_id},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /relationships`
pub async fn list<S>(State(store): State<Arc<S>>) -> Json<Vec<Relationship>>
where
  S: InvestigationStore,
{
  Json(store.list_relationships())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /relationships`.
#[derive(Debug, Deserialize)]
pub struct CreateRelationshipBody {
  pub source_id:     String,
  pub target_id:     String,
  /// One of the closed relation type names, e.g. `"TransactsWith"`.
  pub relation_type: String,
  pub description:   Option<String>,
  pub weight:        Option<f64>,
  pub confidence:    Option<f64>,
  /// Where the link was observed.
  pub source:        Option<String>,
}

impl TryFrom<CreateRelationshipBody> for NewRelationship {
  type Error = ApiError;

  fn try_from(b: CreateRelationshipBody) -> Result<Self, ApiError> {
    Ok(NewRelationship {
      source_id:     parse_id(&b.source_id)?,
      target_id:     parse_id(&b.target_id)?,
      relation_type: RelationType::parse(&b.relation_type)?,
      description:   b.description,
      weight:        b.weight,
      confidence:    b.confidence,
      source:        b.source,
    })
  }
}

/// `POST /relationships`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateRelationshipBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
{
  let rel = store.create_relationship(NewRelationship::try_from(body)?)?;
  Ok((StatusCode::CREATED, Json(Created { id: rel.id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /relationships/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Relationship>, ApiError>
where
  S: InvestigationStore,
{
  let id = parse_id(&id)?;
  let rel = store
    .get_relationship(id)
    .ok_or(Error::RelationshipNotFound(id))?;
  Ok(Json(rel))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /relationships/:id`. Endpoints cannot be
/// changed.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateRelationshipBody {
  pub relation_type: Option<String>,
  pub description:   Option<String>,
  pub weight:        Option<f64>,
  pub confidence:    Option<f64>,
  pub source:        Option<String>,
}

impl TryFrom<UpdateRelationshipBody> for RelationshipPatch {
  type Error = ApiError;

  fn try_from(b: UpdateRelationshipBody) -> Result<Self, ApiError> {
    Ok(RelationshipPatch {
      relation_type: b
        .relation_type
        .as_deref()
        .map(RelationType::parse)
        .transpose()?,
      description:   b.description,
      weight:        b.weight,
      confidence:    b.confidence,
      source:        b.source,
    })
  }
}

/// `PATCH /relationships/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<UpdateRelationshipBody>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  let id = parse_id(&id)?;
  store.update_relationship(id, RelationshipPatch::try_from(body)?)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /relationships/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: InvestigationStore,
{
  store.delete_relationship(parse_id(&id)?)?;
  Ok(StatusCode::NO_CONTENT)
}
