//! Mapper trait rendering.

use quote::quote;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext};
use crate::generator::{
  codegen,
  descriptor::{ModelDescriptor, PayloadRole},
};

/// Renders `mapper.rs`: the conversion trait between the domain record and
/// its payloads.
///
/// The surface is deliberately fixed rather than endpoint-driven, so a
/// hand-written impl keeps compiling when endpoints are added to the
/// manifest later.
pub struct MapperWriter;

impl ArtifactWriter for MapperWriter {
  fn name(&self) -> &'static str {
    "mapper"
  }

  fn applies(&self, _descriptor: &ModelDescriptor, ctx: &WriteContext<'_>) -> bool {
    !ctx.resolved.is_empty()
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    _ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let trait_name = descriptor.mapper_trait();
    let domain = descriptor.domain_type();
    let detail = descriptor.payload_type(PayloadRole::Detail);
    let summary = descriptor.payload_type(PayloadRole::Summary);
    let create = descriptor.payload_type(PayloadRole::Create);
    let update = descriptor.payload_type(PayloadRole::Update);
    let doc = format!("Conversions between `{domain}` and its generated payloads.");

    let contents = codegen::render_file(
      ArtifactKind::Generated,
      quote! {
        use super::dto::{#domain, #create, #detail, #summary, #update};

        #[doc = #doc]
        pub trait #trait_name {
          fn to_detail(&self, entity: &#domain) -> #detail;
          fn to_summary(&self, entity: &#domain) -> #summary;
          /// Builds a fresh record from a create payload. Server-assigned
          /// fields such as the id start at their defaults.
          fn from_create(&self, payload: #create) -> #domain;
          /// Applies the set fields of `payload` onto `current`.
          fn apply_update(&self, current: #domain, payload: #update) -> #domain;
          /// Column names for CSV export, aligned with [`Self::export_row`].
          fn export_header(&self) -> Vec<String>;
          fn export_row(&self, entity: &#domain) -> Vec<String>;
        }
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/mapper.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}
