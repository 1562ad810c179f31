//! Entities: the nodes of an investigation graph.
//!
//! An entity is a real-world object of interest: a person, a wallet, a
//! domain. Its kind is drawn from a closed set; free-form strings coming from
//! callers are converted at the boundary with [`EntityType::parse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result, validate};

// ─── Entity type ─────────────────────────────────────────────────────────────

/// The kind of object an entity represents.
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
pub enum EntityType {
  Person,
  Organization,
  CryptoWallet,
  SocialAccount,
  Domain,
  IpAddress,
  Email,
  Phone,
  Document,
  /// A time-based occurrence (meeting, transfer, incident).
  Event,
}

impl EntityType {
  /// Convert a caller-supplied type name. Matching ignores ASCII case;
  /// anything outside the closed set is a validation error.
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::validation(format!("unknown entity type: {s:?}")))
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
  pub id:          Uuid,
  pub entity_type: EntityType,
  pub label:       String,
  pub description: Option<String>,
  /// Unordered in meaning; kept in first-seen order for stable output.
  pub tags:        Vec<String>,
  pub confidence:  f64,
  /// Set once by the store; never changes afterwards.
  pub created_at:  DateTime<Utc>,
  /// Refreshed on every successful update.
  pub updated_at:  DateTime<Utc>,
}

impl Entity {
  /// Case-insensitive substring match over label, description and tags.
  ///
  /// `needle` must already be lower-cased. An empty needle matches
  /// everything.
  pub fn matches(&self, needle: &str) -> bool {
    if needle.is_empty() {
      return true;
    }
    self.label.to_lowercase().contains(needle)
      || self
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(needle))
      || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
  }
}

// ─── NewEntity ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::InvestigationStore::create_entity`].
/// `id` and the timestamps are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewEntity {
  pub entity_type: EntityType,
  pub label:       String,
  pub description: Option<String>,
  pub tags:        Vec<String>,
  /// Defaults to [`validate::DEFAULT_ENTITY_CONFIDENCE`].
  pub confidence:  Option<f64>,
}

impl NewEntity {
  pub fn new(entity_type: EntityType, label: impl Into<String>) -> Self {
    Self {
      entity_type,
      label: label.into(),
      description: None,
      tags: Vec::new(),
      confidence: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_confidence(mut self, confidence: f64) -> Self {
    self.confidence = Some(confidence);
    self
  }

  /// Validate and build the stored record.
  pub fn into_entity(self, id: Uuid, now: DateTime<Utc>) -> Result<Entity> {
    validate::label(&self.label)?;
    let confidence = self
      .confidence
      .map(validate::confidence)
      .transpose()?
      .unwrap_or(validate::DEFAULT_ENTITY_CONFIDENCE);

    Ok(Entity {
      id,
      entity_type: self.entity_type,
      label: self.label,
      description: validate::description(self.description),
      tags: validate::tags(self.tags),
      confidence,
      created_at: now,
      updated_at: now,
    })
  }
}

// ─── EntityPatch ─────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
  pub label:       Option<String>,
  /// `Some("")` clears the description.
  pub description: Option<String>,
  pub tags:        Option<Vec<String>>,
  pub confidence:  Option<f64>,
}

impl EntityPatch {
  /// Check every supplied field without applying anything.
  pub fn validate(&self) -> Result<()> {
    if let Some(label) = &self.label {
      validate::label(label)?;
    }
    if let Some(confidence) = self.confidence {
      validate::confidence(confidence)?;
    }
    Ok(())
  }

  /// Apply the patch to `entity`. Callers must have run [`Self::validate`].
  pub fn apply(self, entity: &mut Entity, now: DateTime<Utc>) {
    if let Some(label) = self.label {
      entity.label = label;
    }
    if let Some(description) = self.description {
      entity.description = validate::description(Some(description));
    }
    if let Some(tags) = self.tags {
      entity.tags = validate::tags(tags);
    }
    if let Some(confidence) = self.confidence {
      entity.confidence = confidence;
    }
    entity.updated_at = now;
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use strum::IntoEnumIterator;

  use super::*;

  fn alice() -> Entity {
    NewEntity::new(EntityType::Person, "Alice Smith")
      .with_description("Suspected courier")
      .with_tags(["Finance", "watchlist"])
      .into_entity(Uuid::nil(), Utc.timestamp_opt(0, 0).unwrap())
      .unwrap()
  }

  #[test]
  fn parse_accepts_canonical_and_any_case() {
    assert_eq!(EntityType::parse("CryptoWallet").unwrap(), EntityType::CryptoWallet);
    assert_eq!(EntityType::parse("ipaddress").unwrap(), EntityType::IpAddress);
    assert_eq!(EntityType::parse(" Person ").unwrap(), EntityType::Person);
  }

  #[test]
  fn parse_rejects_unknown_type() {
    let err = EntityType::parse("Spaceship").unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Validation);
  }

  #[test]
  fn display_is_the_canonical_name() {
    assert_eq!(EntityType::SocialAccount.to_string(), "SocialAccount");
    assert_eq!(EntityType::Event.as_ref(), "Event");
  }

  #[test]
  fn new_entity_defaults_confidence_to_one() {
    let e = alice();
    assert_eq!(e.confidence, 1.0);
    assert_eq!(e.created_at, e.updated_at);
  }

  #[test]
  fn new_entity_rejects_empty_label() {
    let err = NewEntity::new(EntityType::Domain, "  ")
      .into_entity(Uuid::nil(), Utc::now())
      .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Validation);
  }

  #[test]
  fn search_matches_label_description_and_tags() {
    let e = alice();
    assert!(e.matches("alice"));
    assert!(e.matches("smith"));
    assert!(e.matches("courier"));
    assert!(e.matches("finance"));
    assert!(e.matches(""));
    assert!(!e.matches("bob"));
  }

  #[test]
  fn patch_only_touches_supplied_fields() {
    let mut e = alice();
    let later = Utc.timestamp_opt(60, 0).unwrap();
    EntityPatch {
      confidence: Some(0.4),
      ..Default::default()
    }
    .apply(&mut e, later);

    assert_eq!(e.label, "Alice Smith");
    assert_eq!(e.description.as_deref(), Some("Suspected courier"));
    assert_eq!(e.confidence, 0.4);
    assert_eq!(e.updated_at, later);
    assert_ne!(e.created_at, later);
  }

  #[test]
  fn patch_with_bad_confidence_fails_validation() {
    let patch = EntityPatch {
      confidence: Some(1.5),
      ..Default::default()
    };
    assert!(patch.validate().is_err());
  }

  #[test]
  fn every_type_survives_its_own_name() {
    for t in EntityType::iter() {
      assert_eq!(EntityType::parse(&t.to_string()).unwrap(), t);
      assert_eq!(EntityType::parse(&t.as_ref().to_uppercase()).unwrap(), t);
    }
    assert_eq!(EntityType::iter().count(), 10);
  }
}
