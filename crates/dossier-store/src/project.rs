//! Project save and load.
//!
//! A project file is the whole graph plus a small header, written as pretty
//! UTF-8 JSON. Both directions keep file I/O outside the store's lock: save
//! copies the graph first and then serialises and writes; load reads and
//! parses first and then swaps the graph in one write.

use std::path::Path;

use dossier_core::{
  Error, ErrorKind, Result,
  project::{ProjectFile, ProjectMetadata},
  store::InvestigationStore,
};

/// Write everything in `store` to `path` under the name `project_name`.
pub async fn save_project<S>(
  store: &S,
  path: impl AsRef<Path>,
  project_name: &str,
) -> Result<()>
where
  S: InvestigationStore + ?Sized,
{
  let path = path.as_ref();
  let file = ProjectFile::new(project_name, store.snapshot());
  let json = serde_json::to_string_pretty(&file)?;
  tokio::fs::write(path, json).await?;

  tracing::info!(
    path = %path.display(),
    project = project_name,
    entities = file.entities.len(),
    relationships = file.relationships.len(),
    attachments = file.attachments.len(),
    "saved project",
  );
  Ok(())
}

/// Replace the contents of `store` with the project at `path`.
///
/// An unreadable file is an I/O error. Malformed JSON, or a document that
/// would violate a store invariant, is a parse error; in both cases the
/// store is left untouched. A document without a header (such as a plain
/// JSON export) takes its project name from the file stem.
pub async fn load_project<S>(
  store: &S,
  path: impl AsRef<Path>,
) -> Result<ProjectMetadata>
where
  S: InvestigationStore + ?Sized,
{
  let path = path.as_ref();
  let bytes = tokio::fs::read(path).await?;
  let file: ProjectFile = serde_json::from_slice(&bytes)?;
  let (header, snapshot) = file.into_parts();

  let metadata = ProjectMetadata {
    project_name:       header
      .as_ref()
      .map(|h| h.name.clone())
      .unwrap_or_else(|| fallback_name(path)),
    saved_at:           header.as_ref().map(|h| h.saved_at),
    entity_count:       snapshot.entities.len(),
    relationship_count: snapshot.relationships.len(),
    attachment_count:   snapshot.attachments.len(),
  };

  store.restore(snapshot).map_err(|e| match e.kind() {
    ErrorKind::Validation => {
      Error::Parse(format!("{}: {e}", path.display()))
    }
    _ => e,
  })?;

  tracing::info!(
    path = %path.display(),
    project = %metadata.project_name,
    entities = metadata.entity_count,
    relationships = metadata.relationship_count,
    "loaded project",
  );
  Ok(metadata)
}

fn fallback_name(path: &Path) -> String {
  path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "Untitled".to_owned())
}
