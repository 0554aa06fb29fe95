use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

use super::Manifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
  #[default]
  Yaml,
  Json,
}

impl ManifestFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "json" => Self::Json,
      _ => Self::Yaml,
    }
  }
}

/// Memory-maps a manifest file and parses it with located errors, so a typo
/// deep inside an entity reports its full path.
pub struct ManifestLoader {
  file: AsyncMmapFile,
  format: ManifestFormat,
}

impl ManifestLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(ManifestFormat::default(), ManifestFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open manifest {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<Manifest> {
    match self.format {
      ManifestFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice())?;
        manifest_from_yaml(content)
      }
      ManifestFormat::Json => manifest_from_json(self.file.as_slice()),
    }
  }
}

pub fn manifest_from_yaml(content: &str) -> anyhow::Result<Manifest> {
  let de = serde_yaml_ng::Deserializer::from_str(content);
  serde_path_to_error::deserialize(de).map_err(|err| anyhow::anyhow!("manifest error at `{}`: {}", err.path(), err))
}

pub fn manifest_from_json(content: &[u8]) -> anyhow::Result<Manifest> {
  let mut de = serde_json::Deserializer::from_slice(content);
  serde_path_to_error::deserialize(&mut de)
    .map_err(|err| anyhow::anyhow!("manifest error at `{}`: {}", err.path(), err))
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn yaml_errors_carry_paths() {
    let err = manifest_from_yaml(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: yes-please }
",
    )
    .unwrap_err();

    assert!(err.to_string().contains("entities.pet.fields.id.id"), "{err}");
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let err = manifest_from_yaml(
      r"
entities:
  pet:
    fieldz:
      id: { type: i64 }
",
    )
    .unwrap_err();

    assert!(err.to_string().contains("fieldz"), "{err}");
  }

  #[test]
  fn json_manifests_parse() {
    let manifest = manifest_from_json(
      br#"{"entities": {"pet": {"fields": {"id": {"type": "i64", "id": true}}}}}"#,
    )
    .unwrap();

    assert!(manifest.entities.contains_key("pet"));
  }

  #[tokio::test]
  async fn loader_sniffs_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("pets.yaml");
    let mut f = std::fs::File::create(&yaml_path).unwrap();
    writeln!(f, "entities:").unwrap();
    writeln!(f, "  pet:").unwrap();
    writeln!(f, "    fields:").unwrap();
    writeln!(f, "      id: {{ type: i64, id: true }}").unwrap();
    drop(f);

    let loader = ManifestLoader::open(&yaml_path).await.unwrap();
    let manifest = loader.parse().unwrap();
    assert_eq!(manifest.entities.len(), 1);

    let json_path = dir.path().join("pets.json");
    std::fs::write(
      &json_path,
      br#"{"entities": {"pet": {"fields": {"id": {"type": "i64", "id": true}}}}}"#,
    )
    .unwrap();

    let loader = ManifestLoader::open(&json_path).await.unwrap();
    assert!(loader.parse().is_ok());
  }
}
