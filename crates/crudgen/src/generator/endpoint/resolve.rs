use std::collections::BTreeSet;

use super::tags::EndpointTag;
use crate::{
  generator::descriptor::ModelDescriptor,
  manifest::{Manifest, MarkerError},
};

/// Computes the effective endpoint set for one entity.
///
/// The template's tags and the explicit includes union first. Omissions are
/// applied next and win over both. A named deny policy is applied last.
/// Unknown spellings inside a deny list are skipped so one shared policy can
/// name tags an entity never resolved, but an unknown policy name is an
/// error since it usually means a typo.
pub fn resolve_endpoints(
  descriptor: &ModelDescriptor,
  manifest: &Manifest,
) -> Result<BTreeSet<EndpointTag>, MarkerError> {
  let mut resolved = descriptor.flags.template.tags();
  resolved.extend(descriptor.endpoints.include.iter().copied());

  for tag in &descriptor.endpoints.omit {
    resolved.remove(tag);
  }

  if let Some(name) = &descriptor.endpoints.policy {
    let policy = manifest.endpoint_policy(descriptor.entity(), name)?;
    for spelling in &policy.deny {
      if let Some(tag) = EndpointTag::parse_lenient(spelling) {
        resolved.remove(&tag);
      }
    }
  }

  Ok(resolved)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    generator::{
      descriptor::{DescriptorParser, ExtractorRegistry},
      metrics::GenerationStats,
    },
    manifest::loader::manifest_from_yaml,
  };

  fn describe(yaml: &str, entity: &str) -> (Manifest, ModelDescriptor) {
    let manifest = manifest_from_yaml(yaml).unwrap();
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry).parse(entity, &manifest, &mut stats).unwrap();
    (manifest, descriptor)
  }

  #[test]
  fn full_template_resolves_every_tag() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: true }
",
      "pet",
    );

    let resolved = resolve_endpoints(&descriptor, &manifest).unwrap();
    assert_eq!(resolved.len(), EndpointTag::COUNT);
  }

  #[test]
  fn includes_build_on_a_bare_template() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    template: bare
    endpoints:
      include: [GET_ONE, POST]
    fields:
      id: { type: i64, id: true }
",
      "pet",
    );

    let resolved = resolve_endpoints(&descriptor, &manifest).unwrap();
    assert_eq!(resolved, BTreeSet::from([EndpointTag::GetOne, EndpointTag::Post]));
  }

  #[test]
  fn omit_wins_over_include() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    template: bare
    endpoints:
      include: [GET_ONE, DELETE]
      omit: [DELETE]
    fields:
      id: { type: i64, id: true }
",
      "pet",
    );

    let resolved = resolve_endpoints(&descriptor, &manifest).unwrap();
    assert_eq!(resolved, BTreeSet::from([EndpointTag::GetOne]));
  }

  #[test]
  fn deny_policies_strip_last_and_skip_unknown_spellings() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    template: crud
    endpoints:
      policy: no-bulk
    fields:
      id: { type: i64, id: true }
endpoint_policies:
  no-bulk:
    deny: [POST_BATCH, delete, get-page, not_a_real_tag]
",
      "pet",
    );

    let resolved = resolve_endpoints(&descriptor, &manifest).unwrap();
    assert!(!resolved.contains(&EndpointTag::Delete));
    assert!(!resolved.contains(&EndpointTag::GetPage));
    assert!(resolved.contains(&EndpointTag::GetOne));
    assert!(resolved.contains(&EndpointTag::Post));
  }

  #[test]
  fn unknown_policy_name_is_an_error() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    endpoints:
      policy: nope
    fields:
      id: { type: i64, id: true }
",
      "pet",
    );

    let err = resolve_endpoints(&descriptor, &manifest).unwrap_err();
    assert!(matches!(err, MarkerError::UnknownEndpointPolicy { .. }));
  }

  #[test]
  fn resolution_is_deterministic() {
    let (manifest, descriptor) = describe(
      r"
entities:
  pet:
    template: read-only
    endpoints:
      include: [POST]
      omit: [EXPORT]
    fields:
      id: { type: i64, id: true }
",
      "pet",
    );

    let first = resolve_endpoints(&descriptor, &manifest).unwrap();
    let second = resolve_endpoints(&descriptor, &manifest).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(&EndpointTag::Post));
    assert!(!first.contains(&EndpointTag::Export));
  }
}
