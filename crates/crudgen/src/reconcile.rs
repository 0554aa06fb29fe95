//! One-shot adoption of editable stubs into the application source tree.
//!
//! Generation always renders stubs into the output root. This utility moves
//! them home: every file under the generated root whose head carries the
//! editable marker is copied to the same relative path under the source
//! root, only if nothing exists there yet, and the generated copy is removed
//! either way. Running it twice is the same as running it once.

use std::path::{Path, PathBuf};

use anyhow::Context;
use crudgen_support::EDITABLE_MARKER;

/// What one reconcile run did, as paths relative to the roots.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
  /// Stubs copied into the source root.
  pub adopted: Vec<PathBuf>,
  /// Stubs dropped because the source root already had the file.
  pub discarded: Vec<PathBuf>,
}

impl ReconcileReport {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.adopted.is_empty() && self.discarded.is_empty()
  }
}

/// Moves every marked stub under `generated_root` into `source_root`.
pub fn reconcile(generated_root: &Path, source_root: &Path) -> anyhow::Result<ReconcileReport> {
  let mut marked = Vec::new();
  collect_marked(generated_root, generated_root, &mut marked)?;
  marked.sort();

  let mut report = ReconcileReport::default();
  for rel in marked {
    let from = generated_root.join(&rel);
    let to = source_root.join(&rel);

    if to.exists() {
      report.discarded.push(rel);
    } else {
      if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("creating `{}`", parent.display()))?;
      }
      std::fs::copy(&from, &to).with_context(|| format!("adopting `{}`", rel.display()))?;
      report.adopted.push(rel);
    }
    std::fs::remove_file(&from).with_context(|| format!("removing `{}`", from.display()))?;
  }

  prune_empty_dirs(generated_root, generated_root)?;
  Ok(report)
}

fn collect_marked(root: &Path, dir: &Path, marked: &mut Vec<PathBuf>) -> anyhow::Result<()> {
  for entry in std::fs::read_dir(dir).with_context(|| format!("reading `{}`", dir.display()))? {
    let path = entry?.path();
    if path.is_dir() {
      collect_marked(root, &path, marked)?;
    } else if is_marked(&path)? {
      marked.push(path.strip_prefix(root)?.to_path_buf());
    }
  }
  Ok(())
}

/// The marker must sit in the banner, not just anywhere in the file, so a
/// generated file that merely mentions it is not swept up.
fn is_marked(path: &Path) -> anyhow::Result<bool> {
  if path.extension().is_none_or(|ext| ext != "rs") {
    return Ok(false);
  }
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("reading `{}`", path.display()))?;
  Ok(
    contents
      .lines()
      .take(2)
      .any(|line| line.contains(EDITABLE_MARKER)),
  )
}

/// Drops directories the sweep emptied. The root itself stays.
fn prune_empty_dirs(root: &Path, dir: &Path) -> anyhow::Result<()> {
  for entry in std::fs::read_dir(dir)? {
    let path = entry?.path();
    if path.is_dir() {
      prune_empty_dirs(root, &path)?;
      if std::fs::read_dir(&path)?.next().is_none() {
        std::fs::remove_dir(&path)?;
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stub_contents(body: &str) -> String {
    format!("// {EDITABLE_MARKER}\n// Written once as a starting point. This file is yours to edit.\n{body}")
  }

  fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
  }

  #[test]
  fn adopts_marked_stubs_and_keeps_generated_files() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    write(out.path(), "pet/stubs.rs", &stub_contents("pub struct S;\n"));
    write(out.path(), "pet/dto.rs", "// Generated by crudgen.\npub struct D;\n");

    let report = reconcile(out.path(), src.path()).unwrap();

    assert_eq!(report.adopted, vec![PathBuf::from("pet/stubs.rs")]);
    assert!(report.discarded.is_empty());
    assert!(src.path().join("pet/stubs.rs").exists());
    assert!(!out.path().join("pet/stubs.rs").exists());
    assert!(out.path().join("pet/dto.rs").exists(), "unmarked files stay put");
  }

  #[test]
  fn existing_sources_win_and_the_copy_is_dropped() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    write(out.path(), "pet/stubs.rs", &stub_contents("pub struct Fresh;\n"));
    write(src.path(), "pet/stubs.rs", "pub struct HandEdited;\n");

    let report = reconcile(out.path(), src.path()).unwrap();

    assert_eq!(report.discarded, vec![PathBuf::from("pet/stubs.rs")]);
    let kept = std::fs::read_to_string(src.path().join("pet/stubs.rs")).unwrap();
    assert_eq!(kept, "pub struct HandEdited;\n");
    assert!(!out.path().join("pet/stubs.rs").exists());
  }

  #[test]
  fn rerunning_changes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    write(out.path(), "pet/stubs.rs", &stub_contents("pub struct S;\n"));
    write(out.path(), "owner/stubs.rs", &stub_contents("pub struct O;\n"));

    let first = reconcile(out.path(), src.path()).unwrap();
    assert_eq!(first.adopted.len(), 2);

    let second = reconcile(out.path(), src.path()).unwrap();
    assert!(second.is_empty());
    assert!(src.path().join("pet/stubs.rs").exists());
    assert!(src.path().join("owner/stubs.rs").exists());
  }

  #[test]
  fn emptied_module_directories_are_pruned() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    write(out.path(), "pet/stubs.rs", &stub_contents("pub struct S;\n"));

    reconcile(out.path(), src.path()).unwrap();

    assert!(!out.path().join("pet").exists());
    assert!(out.path().exists(), "the output root itself survives");
  }

  #[test]
  fn marker_mentions_outside_the_banner_do_not_count() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let contents = format!("// Generated by crudgen.\n\n// documented marker: {EDITABLE_MARKER}\n");
    write(out.path(), "pet/notes.rs", &contents);

    let report = reconcile(out.path(), src.path()).unwrap();

    assert!(report.is_empty());
    assert!(out.path().join("pet/notes.rs").exists());
  }
}
