//! Commits rendered artifacts to the output root.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::generator::writers::{Artifact, ArtifactKind};

/// What one emission did, in artifact order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EmitSummary {
  pub written: Vec<PathBuf>,
  pub skipped_stubs: Vec<PathBuf>,
}

impl EmitSummary {
  #[must_use]
  pub fn files_written(&self) -> usize {
    self.written.len()
  }
}

/// Writes every artifact under `out_root`, creating directories as needed.
///
/// Generated files are overwritten unconditionally. Editable stubs are
/// written only when the destination is absent, so a stub the application
/// has adopted or edited in place is never clobbered by a later pass.
pub async fn emit(out_root: &Path, artifacts: &[Artifact]) -> anyhow::Result<EmitSummary> {
  let mut summary = EmitSummary::default();

  for artifact in artifacts {
    let dest = out_root.join(&artifact.path);
    if artifact.kind == ArtifactKind::EditableStub && tokio::fs::try_exists(&dest).await? {
      summary.skipped_stubs.push(artifact.path.clone());
      continue;
    }
    if let Some(parent) = dest.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("creating `{}`", parent.display()))?;
    }
    tokio::fs::write(&dest, &artifact.contents)
      .await
      .with_context(|| format!("writing `{}`", dest.display()))?;
    summary.written.push(artifact.path.clone());
  }

  Ok(summary)
}
