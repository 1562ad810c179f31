//! Field-level validation and normalisation shared by every backend.
//!
//! Stores call these before touching any state, so a rejected input never
//! leaves a partial write behind.

use crate::{Error, Result};

/// Confidence assigned to an entity when the caller supplies none.
pub const DEFAULT_ENTITY_CONFIDENCE: f64 = 1.0;

/// Confidence assigned to a relationship when the caller supplies none.
pub const DEFAULT_RELATIONSHIP_CONFIDENCE: f64 = 0.5;

/// Weight assigned to a relationship when the caller supplies none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Labels must contain at least one non-whitespace character.
pub fn label(label: &str) -> Result<()> {
  if label.trim().is_empty() {
    return Err(Error::validation("label must not be empty"));
  }
  Ok(())
}

/// Confidence must be a finite number in `[0.0, 1.0]`.
pub fn confidence(value: f64) -> Result<f64> {
  if !value.is_finite() || !(0.0..=1.0).contains(&value) {
    return Err(Error::validation(format!(
      "confidence must be between 0.0 and 1.0, got {value}"
    )));
  }
  Ok(value)
}

/// Weight is unconstrained apart from being representable in JSON.
pub fn weight(value: f64) -> Result<f64> {
  if !value.is_finite() {
    return Err(Error::validation(format!(
      "weight must be a finite number, got {value}"
    )));
  }
  Ok(value)
}

/// An empty or whitespace-only description is stored as no description.
pub fn description(description: Option<String>) -> Option<String> {
  description.filter(|d| !d.trim().is_empty())
}

/// Trim tags, drop empty ones and collapse duplicates, keeping the first
/// occurrence of each.
pub fn tags(tags: Vec<String>) -> Vec<String> {
  let mut out: Vec<String> = Vec::with_capacity(tags.len());
  for tag in tags {
    let tag = tag.trim();
    if tag.is_empty() || out.iter().any(|t| t == tag) {
      continue;
    }
    out.push(tag.to_owned());
  }
  out
}
