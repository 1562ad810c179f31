//! Directed, typed, confidence-scored edges between two
//! entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result, validate};

// ─── Relation type ───────────────────────────────────────────────────────────

/// How the source entity relates to the target entity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RelationType {
  Owns,
  Controls,
  /// Financial or business transactions between the two parties.
  TransactsWith,
  MemberOf,
  ConnectedTo,
  /// Both entities refer to the same real-world object.
  SameAs,
  RelatedTo,
  ParentOf,
  ChildOf,
}

impl RelationType {
  /// Convert a caller-supplied relation name. Matching ignores ASCII case.
  pub fn parse(s: &str) -> Result<Self> {
    s.trim().parse().map_err(|_| {
      Error::validation(format!("unknown relationship type: {s:?}"))
    })
  }
}

// ─── Relationship ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
  pub id:            Uuid,
  pub source_id:     Uuid,
  pub target_id:     Uuid,
  pub relation_type: RelationType,
  pub description:   Option<String>,
  /// General-purpose strength; any finite value.
  pub weight:        f64,
  pub confidence:    f64,
  /// Provenance: where the claim behind this edge comes from.
  pub source:        Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Which way an edge points relative to a given entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Outgoing,
  Incoming,
  SelfLoop,
}

impl Relationship {
  pub fn touches(&self, node_id: Uuid) -> bool {
    self.source_id == node_id || self.target_id == node_id
  }

  /// Direction of this edge as seen from `node_id`, or `None` if the node is
  /// not an endpoint.
  pub fn direction_from(&self, node_id: Uuid) -> Option<Direction> {
    match (self.source_id == node_id, self.target_id == node_id) {
      (true, true) => Some(Direction::SelfLoop),
      (true, false) => Some(Direction::Outgoing),
      (false, true) => Some(Direction::Incoming),
      (false, false) => None,
    }
  }
}

// ─── NewRelationship ─────────────────────────────────────────────────────────

/// Input to [`crate::store::InvestigationStore::create_relationship`].
#[derive(Debug, Clone)]
pub struct NewRelationship {
  pub source_id:     Uuid,
  pub target_id:     Uuid,
  pub relation_type: RelationType,
  pub description:   Option<String>,
  /// Defaults to [`validate::DEFAULT_WEIGHT`].
  pub weight:        Option<f64>,
  /// Defaults to [`validate::DEFAULT_RELATIONSHIP_CONFIDENCE`].
  pub confidence:    Option<f64>,
  pub source:        Option<String>,
}

impl NewRelationship {
  pub fn new(source_id: Uuid, target_id: Uuid, relation_type: RelationType) -> Self {
    Self {
      source_id,
      target_id,
      relation_type,
      description: None,
      weight: None,
      confidence: None,
      source: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_weight(mut self, weight: f64) -> Self {
    self.weight = Some(weight);
    self
  }

  pub fn with_confidence(mut self, confidence: f64) -> Self {
    self.confidence = Some(confidence);
    self
  }

  pub fn with_source(mut self, source: impl Into<String>) -> Self {
    self.source = Some(source.into());
    self
  }

  /// Validate field values and build the stored record. Endpoint existence
  /// is the store's concern and is not checked here.
  pub fn into_relationship(self, id: Uuid, now: DateTime<Utc>) -> Result<Relationship> {
    let weight = self
      .weight
      .map(validate::weight)
      .transpose()?
      .unwrap_or(validate::DEFAULT_WEIGHT);
    let confidence = self
      .confidence
      .map(validate::confidence)
      .transpose()?
      .unwrap_or(validate::DEFAULT_RELATIONSHIP_CONFIDENCE);

    Ok(Relationship {
      id,
      source_id: self.source_id,
      target_id: self.target_id,
      relation_type: self.relation_type,
      description: validate::description(self.description),
      weight,
      confidence,
      source: validate::description(self.source),
      created_at: now,
      updated_at: now,
    })
  }
}

// ─── RelationshipPatch ───────────────────────────────────────────────────────

/// A partial update. Endpoints are fixed for the life of a relationship.
#[derive(Debug, Clone, Default)]
pub struct RelationshipPatch {
  pub relation_type: Option<RelationType>,
  pub description:   Option<String>,
  pub weight:        Option<f64>,
  pub confidence:    Option<f64>,
  pub source:        Option<String>,
}

impl RelationshipPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(weight) = self.weight {
      validate::weight(weight)?;
    }
    if let Some(confidence) = self.confidence {
      validate::confidence(confidence)?;
    }
    Ok(())
  }

  /// Apply the patch. Callers must have run [`Self::validate`].
  pub fn apply(self, rel: &mut Relationship, now: DateTime<Utc>) {
    if let Some(relation_type) = self.relation_type {
      rel.relation_type = relation_type;
    }
    if let Some(description) = self.description {
      rel.description = validate::description(Some(description));
    }
    if let Some(weight) = self.weight {
      rel.weight = weight;
    }
    if let Some(confidence) = self.confidence {
      rel.confidence = confidence;
    }
    if let Some(source) = self.source {
      rel.source = validate::description(Some(source));
    }
    rel.updated_at = now;
  }
}
