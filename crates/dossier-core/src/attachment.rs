//! Binary evidence files attached to entities.
//!
//! Content is held as raw bytes and crosses every serialisation boundary as
//! standard base64 under the key `content_base64`.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result};

/// Extensions rendered as images by consumers; anything else is a generic
/// file.
const IMAGE_EXTENSIONS: &[&str] =
  &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
  pub id:        Uuid,
  /// The owning entity.
  pub node_id:   Uuid,
  pub filename:  String,
  /// Lower-cased extension of `filename`; empty when there is none.
  pub file_type: String,
  /// SHA-256 hex digest of `content`.
  pub sha256:    String,
  #[serde(rename = "content_base64", with = "base64_bytes")]
  pub content:   Vec<u8>,
}

impl Attachment {
  pub fn is_image(&self) -> bool {
    IMAGE_EXTENSIONS.contains(&self.file_type.as_str())
  }

  /// Whether `sha256` still describes `content`.
  pub fn digest_matches(&self) -> bool { self.sha256 == digest(&self.content) }
}

/// Input to [`crate::store::InvestigationStore::save_attachment`].
#[derive(Debug, Clone)]
pub struct NewAttachment {
  pub node_id:  Uuid,
  pub filename: String,
  pub content:  Vec<u8>,
}

impl NewAttachment {
  /// Decode boundary-format content. Malformed base64 is a validation error.
  pub fn from_base64(
    node_id: Uuid,
    filename: impl Into<String>,
    content_base64: &str,
  ) -> Result<Self> {
    let content = B64.decode(content_base64.trim()).map_err(|e| {
      Error::validation(format!("attachment content is not valid base64: {e}"))
    })?;
    Ok(Self {
      node_id,
      filename: filename.into(),
      content,
    })
  }

  pub fn into_attachment(self, id: Uuid) -> Attachment {
    Attachment {
      id,
      node_id: self.node_id,
      file_type: file_type_of(&self.filename),
      sha256: digest(&self.content),
      filename: self.filename,
      content: self.content,
    }
  }
}

/// Lower-cased extension of `filename`, or an empty string.
pub fn file_type_of(filename: &str) -> String {
  Path::new(filename)
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase)
    .unwrap_or_default()
}

fn digest(content: &[u8]) -> String { hex::encode(Sha256::digest(content)) }

mod base64_bytes {
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&B64.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
    let text = String::deserialize(d)?;
    B64.decode(text.as_bytes()).map_err(D::Error::custom)
  }
}
