//! The generation pass: manifest in, rendered artifacts and stats out.
//!
//! One pass walks the manifest's generated entities in declaration order.
//! Each entity is parsed into a descriptor, its endpoint set is resolved,
//! and every applicable writer runs. Failures are isolated per entity: a
//! broken declaration costs that entity's module and one diagnostic, never
//! the pass. Only a misassembled extractor registry aborts outright.
//!
//! Artifacts for one entity are buffered and committed together, so a
//! half-written module never reaches the caller.

use anyhow::Context;
use quote::quote;

use crate::{
  generator::{
    ast::ModuleToken,
    codegen,
    composer::route_for,
    descriptor::{DescriptorError, DescriptorParser, ExtractorRegistry, ModelDescriptor},
    endpoint::{EndpointTag, catalog, resolve_endpoints},
    metrics::{Diagnostic, GenerationStats},
    writers::{Artifact, ArtifactKind, WriteContext, WriterRegistry},
  },
  manifest::{Manifest, RelationGraph},
};

/// Entity selection for one pass. Empty `only` means every generated entity.
#[derive(Debug, Clone, Default)]
pub struct PassOptions {
  pub only: Vec<String>,
  pub exclude: Vec<String>,
}

impl PassOptions {
  fn selects(&self, entity: &str) -> bool {
    (self.only.is_empty() || self.only.iter().any(|name| name == entity))
      && !self.exclude.iter().any(|name| name == entity)
  }
}

/// Everything one pass produced. Artifacts carry paths relative to the
/// output root; the emitter decides where that root lives.
#[derive(Debug, Default)]
pub struct GenerationOutput {
  pub artifacts: Vec<Artifact>,
  pub stats: GenerationStats,
}

/// One row of the endpoint plan: what `generate` would wire up, without
/// rendering anything.
#[derive(Debug, Clone)]
pub struct PlannedEndpoint {
  pub entity: String,
  pub module: String,
  pub tag: EndpointTag,
  pub method_name: &'static str,
  pub verb: http::Method,
  pub path: String,
}

pub struct Orchestrator {
  extractors: ExtractorRegistry,
  writers: WriterRegistry,
}

impl Orchestrator {
  #[must_use]
  pub fn standard() -> Self {
    Self {
      extractors: ExtractorRegistry::standard(),
      writers: WriterRegistry::standard(),
    }
  }

  #[must_use]
  pub fn with_parts(extractors: ExtractorRegistry, writers: WriterRegistry) -> Self {
    Self { extractors, writers }
  }

  /// Runs one full generation pass.
  ///
  /// Returns `Ok` even when entities failed; callers inspect
  /// [`GenerationStats::has_failures`] to decide how loudly to report.
  pub fn run(&self, manifest: &Manifest, options: &PassOptions) -> anyhow::Result<GenerationOutput> {
    self.extractors.verify().context("extractor registry")?;

    let mut stats = GenerationStats::default();
    let relations = RelationGraph::analyze(manifest);
    stats.record_cycles(relations.cycles().iter().cloned());

    let parser = DescriptorParser::new(&self.extractors);
    let mut artifacts = Vec::new();
    let mut modules: Vec<ModuleToken> = Vec::new();

    for (entity, _) in manifest.described_entities() {
      if !options.selects(entity) {
        continue;
      }

      let Some(descriptor) = parse_isolated(&parser, entity, manifest, &mut stats)? else {
        continue;
      };

      if modules.contains(descriptor.module()) {
        fail_entity(
          &mut stats,
          entity,
          format!("module `{}` is already generated by an earlier entity", descriptor.module()),
        );
        continue;
      }

      let resolved = match resolve_endpoints(&descriptor, manifest) {
        Ok(resolved) => resolved,
        Err(err) => {
          fail_entity(&mut stats, entity, err.to_string());
          continue;
        }
      };
      let ctx = WriteContext {
        manifest,
        relations: &relations,
        resolved: &resolved,
      };
      match self.writers.write_all(&descriptor, &ctx) {
        Ok(mut produced) => {
          stats.record_endpoints(resolved.len());
          stats.record_artifacts(&produced);
          artifacts.append(&mut produced);
          modules.push(descriptor.module().clone());
        }
        Err(err) => fail_entity(&mut stats, entity, format!("{err:#}")),
      }
    }

    if !modules.is_empty() {
      let index = root_index(manifest, &modules)?;
      stats.record_artifact(&index);
      artifacts.push(index);
    }

    Ok(GenerationOutput { artifacts, stats })
  }

  /// Resolves endpoints for every selected entity without rendering. Rows
  /// come out in declaration order, then catalog order within an entity.
  pub fn plan(
    &self,
    manifest: &Manifest,
    options: &PassOptions,
  ) -> anyhow::Result<(Vec<PlannedEndpoint>, GenerationStats)> {
    self.extractors.verify().context("extractor registry")?;

    let mut stats = GenerationStats::default();
    let parser = DescriptorParser::new(&self.extractors);
    let mut rows = Vec::new();

    for (entity, _) in manifest.described_entities() {
      if !options.selects(entity) {
        continue;
      }
      let Some(descriptor) = parse_isolated(&parser, entity, manifest, &mut stats)? else {
        continue;
      };
      let resolved = match resolve_endpoints(&descriptor, manifest) {
        Ok(resolved) => resolved,
        Err(err) => {
          fail_entity(&mut stats, entity, err.to_string());
          continue;
        }
      };
      stats.record_endpoints(resolved.len());

      for spec in catalog().iter().filter(|spec| resolved.contains(&spec.tag)) {
        let route = route_for(spec.tag, &descriptor);
        rows.push(PlannedEndpoint {
          entity: entity.clone(),
          module: descriptor.module().to_string(),
          tag: spec.tag,
          method_name: spec.method_name,
          verb: route.verb,
          path: route.path,
        });
      }
    }

    Ok((rows, stats))
  }
}

impl Default for Orchestrator {
  fn default() -> Self {
    Self::standard()
  }
}

/// Parses one entity, converting entity-level failures into diagnostics.
/// Only wiring errors propagate.
fn parse_isolated(
  parser: &DescriptorParser<'_>,
  entity: &str,
  manifest: &Manifest,
  stats: &mut GenerationStats,
) -> anyhow::Result<Option<ModelDescriptor>> {
  match parser.parse(entity, manifest, stats) {
    Ok(descriptor) => Ok(Some(descriptor)),
    Err(DescriptorError::Entity(err)) => {
      fail_entity(stats, entity, format!("{err:#}"));
      Ok(None)
    }
    Err(DescriptorError::Wiring(err)) => {
      Err(err.context(format!("parsing entity `{entity}`")))
    }
  }
}

fn fail_entity(stats: &mut GenerationStats, entity: &str, error: String) {
  stats.record_entity_failure();
  stats.record_diagnostic(Diagnostic::EntityFailed {
    entity: entity.to_string(),
    error,
  });
}

/// The root `mod.rs` declaring every module the pass produced.
fn root_index(manifest: &Manifest, modules: &[ModuleToken]) -> anyhow::Result<Artifact> {
  let doc = match &manifest.name {
    Some(name) => format!(" Generated modules for `{name}`."),
    None => " Generated modules.".to_string(),
  };
  let decls = modules.iter().map(|module| quote! { pub mod #module; });
  let contents = codegen::render_file(
    ArtifactKind::Generated,
    quote! {
      #![doc = #doc]
      #(#decls)*
    },
  )?;
  Ok(Artifact::new("mod.rs", ArtifactKind::Generated, contents))
}
