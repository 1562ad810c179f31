//! Export renderers for the Dossier investigation graph.
//!
//! Turns a [`GraphSnapshot`] into JSON, CSV or GraphML text. Rendering is
//! pure and synchronous; [`write`] is the only function that touches the
//! file system.
//!
//! # Quick start
//!
//! ```no_run
//! use dossier_core::project::GraphSnapshot;
//! use dossier_export::{ExportFormat, render};
//!
//! let snapshot = GraphSnapshot::default();
//! let graphml = render(ExportFormat::GraphMl, &snapshot).unwrap();
//! assert!(graphml.contains("<graphml"));
//! ```

pub mod csv;
pub mod error;
pub mod graphml;
pub mod json;

use std::path::Path;

use dossier_core::project::GraphSnapshot;
use strum::{AsRefStr, Display, EnumString};

pub use error::{Error, Result};

/// The formats a graph can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
  Json,
  Csv,
  GraphMl,
}

impl ExportFormat {
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownFormat(s.to_owned()))
  }

  /// Conventional file extension, without the dot.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Json => "json",
      Self::Csv => "csv",
      Self::GraphMl => "graphml",
    }
  }
}

/// Render `snapshot` in `format`.
pub fn render(format: ExportFormat, snapshot: &GraphSnapshot) -> Result<String> {
  match format {
    ExportFormat::Json => json::render(snapshot),
    ExportFormat::Csv => Ok(csv::render(snapshot)),
    ExportFormat::GraphMl => graphml::render(snapshot),
  }
}

/// Render `snapshot` and write it to `path` in one piece.
pub async fn write(
  format: ExportFormat,
  snapshot: &GraphSnapshot,
  path: impl AsRef<Path>,
) -> Result<()> {
  let path = path.as_ref();
  let text = render(format, snapshot)?;
  tokio::fs::write(path, text).await?;
  tracing::info!(
    %format,
    path = %path.display(),
    entities = snapshot.entities.len(),
    relationships = snapshot.relationships.len(),
    "exported graph",
  );
  Ok(())
}
