use quote::quote;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext, has_repository};
use crate::generator::{codegen, descriptor::ModelDescriptor, endpoint::EndpointTag};

/// Renders the per-module `mod.rs` that declares whichever siblings the other
/// writers produced. Runs last so its view of the module is complete.
pub struct ModuleIndexWriter;

impl ArtifactWriter for ModuleIndexWriter {
  fn name(&self) -> &'static str {
    "module_index"
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let has_endpoints = !ctx.resolved.is_empty();
    let handlers = has_endpoints.then(|| quote!(pub mod handlers;));
    let mapper = has_endpoints.then(|| quote!(pub mod mapper;));
    let query = ctx
      .resolved
      .contains(&EndpointTag::Search)
      .then(|| quote!(pub mod query;));
    let repository = has_repository(ctx.resolved).then(|| quote!(pub mod repository;));
    let stubs =
      (descriptor.flags.editable_stubs && has_endpoints).then(|| quote!(pub mod stubs;));

    let doc = format!(" Generated `{}` module for the `{}` entity.", descriptor.module(), descriptor.entity());
    let contents = codegen::render_file(
      ArtifactKind::Generated,
      quote! {
        #![doc = #doc]
        pub mod dto;
        #handlers
        #mapper
        #query
        #repository
        #stubs
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/mod.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    generator::{
      descriptor::{DescriptorParser, ExtractorRegistry},
      endpoint::resolve_endpoints,
      metrics::GenerationStats,
    },
    manifest::{Manifest, RelationGraph, loader::manifest_from_yaml},
  };

  fn render(manifest: &Manifest, entity: &str) -> String {
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry)
      .parse(entity, manifest, &mut stats)
      .unwrap();
    let relations = RelationGraph::analyze(manifest);
    let resolved = resolve_endpoints(&descriptor, manifest).unwrap();
    let ctx = WriteContext {
      manifest,
      relations: &relations,
      resolved: &resolved,
    };
    let mut artifacts = ModuleIndexWriter.write(&descriptor, &ctx).unwrap();
    artifacts.pop().unwrap().contents
  }

  #[test]
  fn full_module_declares_every_sibling() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    for line in [
      "pub mod dto;",
      "pub mod handlers;",
      "pub mod mapper;",
      "pub mod query;",
      "pub mod repository;",
      "pub mod stubs;",
    ] {
      assert!(code.contains(line), "missing `{line}` in:\n{code}");
    }
  }

  #[test]
  fn index_tracks_what_other_writers_skip() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: bare
    editable_stubs: false
    endpoints: { include: [VALIDATE] }
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("pub mod dto;"));
    assert!(code.contains("pub mod handlers;"));
    assert!(code.contains("pub mod mapper;"));
    assert!(!code.contains("pub mod query;"));
    assert!(!code.contains("pub mod repository;"));
    assert!(!code.contains("pub mod stubs;"));
  }

  #[test]
  fn endpointless_module_is_dto_only() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: bare
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("pub mod dto;"));
    assert!(!code.contains("handlers"));
    assert!(!code.contains("mapper"));
  }
}
