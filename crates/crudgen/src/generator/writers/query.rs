//! Search filter rendering.

use quote::quote;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext, searchable_scalar};
use crate::generator::{
  ast::{DeriveTrait, Documentation, PayloadDef, PayloadFieldDef, default_payload_derives},
  codegen,
  descriptor::ModelDescriptor,
  endpoint::EndpointTag,
};

/// Renders `query.rs`: the conjunctive filter over searchable fields, used
/// by the search endpoint.
pub struct QueryWriter;

impl ArtifactWriter for QueryWriter {
  fn name(&self) -> &'static str {
    "query"
  }

  fn applies(&self, _descriptor: &ModelDescriptor, ctx: &WriteContext<'_>) -> bool {
    ctx.resolved.contains(&EndpointTag::Search)
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let decl = ctx.manifest.entity(descriptor.entity())?;
    let fields = decl
      .searchable_fields()
      .filter_map(|(name, field)| {
        let (ty, _) = searchable_scalar(ctx.manifest, field)?;
        Some(
          PayloadFieldDef::builder()
            .name(name.as_str())
            .docs(Documentation::from_optional(field.doc.as_ref()))
            .ty(ty.with_option())
            .build(),
        )
      })
      .collect::<Vec<_>>();

    let mut derives = default_payload_derives();
    derives.insert(DeriveTrait::Default);
    let def = PayloadDef::builder()
      .name(descriptor.filter_type())
      .docs(Documentation::from_raw(&format!(
        "Conjunctive filter over searchable `{}` fields. `None` fields match everything.",
        descriptor.domain_type()
      )))
      .fields(fields)
      .derives(derives)
      .build();

    let contents = codegen::render_file(ArtifactKind::Generated, quote! { #def })?;
    Ok(vec![Artifact::new(
      format!("{}/query.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;
  use crate::{
    generator::{
      descriptor::{DescriptorParser, ExtractorRegistry},
      metrics::GenerationStats,
    },
    manifest::{RelationGraph, loader::manifest_from_yaml},
  };

  const MANIFEST: &str = "
name: shop
entities:
  Pet:
    fields:
      id: { type: i64, id: true }
      name: { type: string, searchable: true }
      status: { type: string, optional: true, searchable: true }
      owner:
        type: i64
        searchable: true
        relation: { target: Owner, cardinality: one, owned: false }
      toys:
        type: string
        searchable: true
        relation: { target: Toy, cardinality: many, owned: true }
  Owner:
    fields:
      id: { type: i64, id: true }
  Toy:
    fields:
      id: { type: i64, id: true }
";

  fn render() -> String {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry)
      .parse("Pet", &manifest, &mut stats)
      .unwrap();
    let relations = RelationGraph::analyze(&manifest);
    let resolved = BTreeSet::from([EndpointTag::Search]);
    let ctx = WriteContext {
      manifest: &manifest,
      relations: &relations,
      resolved: &resolved,
    };
    let mut artifacts = QueryWriter.write(&descriptor, &ctx).unwrap();
    artifacts.pop().unwrap().contents
  }

  #[test]
  fn filter_wraps_searchable_scalars_in_options() {
    let code = render();
    assert!(code.contains("pub struct PetFilter {"));
    assert!(code.contains("pub name: Option<String>,"));
    // Optional fields still filter on the bare value.
    assert!(code.contains("pub status: Option<String>,"));
    // Unowned single relations filter by target id.
    assert!(code.contains("pub owner: Option<i64>,"));
    // Owned collections have no scalar form.
    assert!(!code.contains("pub toys"));
    assert!(!code.contains("pub id:"));
  }

  #[test]
  fn skipped_without_search_endpoint() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry)
      .parse("Pet", &manifest, &mut stats)
      .unwrap();
    let relations = RelationGraph::analyze(&manifest);
    let resolved = BTreeSet::from([EndpointTag::GetOne]);
    let ctx = WriteContext {
      manifest: &manifest,
      relations: &relations,
      resolved: &resolved,
    };
    assert!(!QueryWriter.applies(&descriptor, &ctx));
  }
}
