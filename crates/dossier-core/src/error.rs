//! Error types for `dossier-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("entity not found: {0}")]
  EntityNotFound(Uuid),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(Uuid),

  #[error("attachment {attachment} not found on entity {node}")]
  AttachmentNotFound { attachment: Uuid, node: Uuid },

  #[error("validation error: {0}")]
  Validation(String),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("parse error: {0}")]
  Parse(String),
}

/// The four failure classes callers of the command surface distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  Io,
  Parse,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::EntityNotFound(_)
      | Self::RelationshipNotFound(_)
      | Self::AttachmentNotFound { .. } => ErrorKind::NotFound,
      Self::Validation(_) => ErrorKind::Validation,
      Self::Io(_) => ErrorKind::Io,
      Self::Parse(_) => ErrorKind::Parse,
    }
  }

  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Self::Parse(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
