//! Error types for the export renderers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown export format: {0:?}")]
  UnknownFormat(String),

  #[error("xml error: {0}")]
  Xml(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}

impl From<Error> for dossier_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::UnknownFormat(_) => Self::Validation(e.to_string()),
      Error::Io(io) => Self::Io(io),
      Error::Xml(_) | Error::Json(_) => {
        Self::Io(std::io::Error::other(e.to_string()))
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
