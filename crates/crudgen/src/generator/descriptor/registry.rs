use anyhow::bail;
use indexmap::IndexMap;
use strum::IntoEnumIterator;

use super::{
  extract::{EndpointOptionsExtractor, FlagsExtractor, IdentityExtractor, PartExtractor, SecurityExtractor},
  parts::PartKind,
};

/// Holds one extractor per part family, in extraction order.
///
/// The registry is assembled once per generation pass. A missing entry is a
/// wiring mistake, not an input problem, so lookups fail the whole pass
/// rather than a single entity.
pub struct ExtractorRegistry {
  extractors: IndexMap<PartKind, Box<dyn PartExtractor>>,
}

impl ExtractorRegistry {
  /// The standard extractor set covering every part family.
  #[must_use]
  pub fn standard() -> Self {
    Self::with_extractors(vec![
      Box::new(IdentityExtractor),
      Box::new(FlagsExtractor),
      Box::new(EndpointOptionsExtractor),
      Box::new(SecurityExtractor),
    ])
  }

  #[must_use]
  pub fn with_extractors(extractors: Vec<Box<dyn PartExtractor>>) -> Self {
    let extractors = extractors.into_iter().map(|e| (e.kind(), e)).collect();
    Self { extractors }
  }

  pub fn get(&self, kind: PartKind) -> anyhow::Result<&dyn PartExtractor> {
    match self.extractors.get(&kind) {
      Some(extractor) => Ok(extractor.as_ref()),
      None => bail!("no extractor registered for descriptor part `{kind}`"),
    }
  }

  /// Confirms every part family has an extractor before any entity is parsed.
  pub fn verify(&self) -> anyhow::Result<()> {
    for kind in PartKind::iter() {
      self.get(kind)?;
    }
    Ok(())
  }
}

impl Default for ExtractorRegistry {
  fn default() -> Self {
    Self::standard()
  }
}
