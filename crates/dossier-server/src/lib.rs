//! HTTP front end for Dossier.
//!
//! Wires a [`GraphStore`] built from [`ServerConfig`] to the JSON API and
//! mounts it under `/api`.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use dossier_store::{GraphStore, RelationshipPolicy, project::load_project};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `dossier.toml` and
/// `DOSSIER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                          String,
  #[serde(default = "default_port")]
  pub port:                          u16,
  #[serde(default = "default_true")]
  pub allow_self_loops:              bool,
  #[serde(default = "default_true")]
  pub allow_duplicate_relationships: bool,
  /// Project file loaded into the store before serving.
  #[serde(default)]
  pub autoload_project:              Option<PathBuf>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 7341 }

fn default_true() -> bool { true }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                          default_host(),
      port:                          default_port(),
      allow_self_loops:              true,
      allow_duplicate_relationships: true,
      autoload_project:              None,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn policy(&self) -> RelationshipPolicy {
    RelationshipPolicy {
      allow_self_loops: self.allow_self_loops,
      allow_duplicates: self.allow_duplicate_relationships,
    }
  }
}

// ─── Start-up ─────────────────────────────────────────────────────────────────

/// Build the store described by `config`, loading the autoload project if
/// one is configured.
pub async fn open_store(config: &ServerConfig) -> dossier_core::Result<Arc<GraphStore>> {
  let store = Arc::new(GraphStore::with_policy(config.policy()));
  if let Some(path) = &config.autoload_project {
    let meta = load_project(store.as_ref(), path).await?;
    tracing::info!(
      project = %meta.project_name,
      entities = meta.entity_count,
      "autoloaded project",
    );
  }
  Ok(store)
}

/// The full application router: the JSON API under `/api`, with request
/// tracing.
pub fn router(store: Arc<GraphStore>) -> Router {
  Router::new()
    .nest("/api", dossier_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
