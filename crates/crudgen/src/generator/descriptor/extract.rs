use super::parts::{DescriptorPart, EndpointOptionsPart, FlagsPart, IdentityPart, PartKind, SecurityPart, TablePolicy};
use crate::{
  generator::{
    ast::{FieldNameToken, ModuleToken, TypeNameToken, TypeRef},
    endpoint::{EndpointTag, EndpointTemplate},
  },
  manifest::{EntityDecl, Manifest},
};

/// Extracts one part family from an entity declaration.
///
/// Extractors run independently of each other and must not assume another
/// part exists; cross-part consistency is the parser's job.
pub trait PartExtractor: Send + Sync {
  fn kind(&self) -> PartKind;

  fn extract(&self, entity: &str, decl: &EntityDecl, manifest: &Manifest) -> anyhow::Result<DescriptorPart>;
}

pub struct IdentityExtractor;

impl PartExtractor for IdentityExtractor {
  fn kind(&self) -> PartKind {
    PartKind::Identity
  }

  fn extract(&self, entity: &str, decl: &EntityDecl, _manifest: &Manifest) -> anyhow::Result<DescriptorPart> {
    let (id_name, id_decl) = decl.id_field(entity)?;

    let module = decl
      .module
      .as_deref()
      .map_or_else(|| ModuleToken::from(entity), ModuleToken::from);

    Ok(DescriptorPart::Identity(
      IdentityPart::builder()
        .entity(entity)
        .type_name(TypeNameToken::from(entity))
        .module(module)
        .id_field(FieldNameToken::from(id_name.as_str()))
        .id_ty(TypeRef::parse(&id_decl.ty))
        .build(),
    ))
  }
}

pub struct FlagsExtractor;

impl PartExtractor for FlagsExtractor {
  fn kind(&self) -> PartKind {
    PartKind::Flags
  }

  fn extract(&self, entity: &str, decl: &EntityDecl, _manifest: &Manifest) -> anyhow::Result<DescriptorPart> {
    let template = match decl.template.as_deref() {
      Some(spelling) => EndpointTemplate::parse_marker(entity, spelling)?,
      None => EndpointTemplate::default(),
    };

    Ok(DescriptorPart::Flags(FlagsPart {
      editable_stubs: decl.editable_stubs.unwrap_or(true),
      secure: decl.secure.unwrap_or(true),
      template,
    }))
  }
}

pub struct EndpointOptionsExtractor;

impl PartExtractor for EndpointOptionsExtractor {
  fn kind(&self) -> PartKind {
    PartKind::Endpoints
  }

  fn extract(&self, entity: &str, decl: &EntityDecl, _manifest: &Manifest) -> anyhow::Result<DescriptorPart> {
    Ok(DescriptorPart::Endpoints(EndpointOptionsPart {
      include: parse_tags(entity, &decl.endpoints.include)?,
      omit: parse_tags(entity, &decl.endpoints.omit)?,
      // The policy is a name only; it is resolved when endpoints are.
      policy: decl.endpoints.policy.clone(),
    }))
  }
}

fn parse_tags(entity: &str, spellings: &[String]) -> anyhow::Result<std::collections::BTreeSet<EndpointTag>> {
  spellings
    .iter()
    .map(|s| EndpointTag::parse_marker(entity, s).map_err(Into::into))
    .collect()
}

pub struct SecurityExtractor;

impl PartExtractor for SecurityExtractor {
  fn kind(&self) -> PartKind {
    PartKind::Security
  }

  fn extract(&self, entity: &str, decl: &EntityDecl, manifest: &Manifest) -> anyhow::Result<DescriptorPart> {
    let policy = match decl.security.policy.as_deref() {
      None => TablePolicy::Permissive,
      Some(name) => {
        let declared = manifest.security_policy(entity, name)?;
        TablePolicy::Guarded {
          read: declared.read.clone(),
          write: declared.write.clone(),
          delete: declared.delete.clone(),
        }
      }
    };

    Ok(DescriptorPart::Security(SecurityPart {
      policy,
      row_handler: decl.security.row_handler.clone(),
      field_handler: decl.security.field_handler.clone(),
    }))
  }
}
