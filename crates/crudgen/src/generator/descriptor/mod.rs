//! Model descriptors and the extraction pipeline that produces them.
//!
//! A [`ModelDescriptor`] is the writers' only view of an entity: four part
//! families (identity, flags, endpoint options, security) pulled out of the
//! manifest by independent [`PartExtractor`]s. Writers never touch raw
//! declarations for anything a part already answers.

mod extract;
mod parts;
mod registry;

pub use extract::{EndpointOptionsExtractor, FlagsExtractor, IdentityExtractor, PartExtractor, SecurityExtractor};
pub use parts::{
  DescriptorPart, EndpointOptionsPart, FlagsPart, IdentityPart, PartKind, SecurityPart, TablePolicy,
};
pub use registry::ExtractorRegistry;

use anyhow::anyhow;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
  generator::{
    ast::{FieldNameToken, ModuleToken, TypeNameToken, TypeRef},
    metrics::{Diagnostic, GenerationStats},
  },
  manifest::Manifest,
  naming,
};

/// Generated payload structs derived from one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PayloadRole {
  Detail,
  Summary,
  Create,
  Update,
}

/// Everything the writers know about one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
  pub identity: IdentityPart,
  pub flags: FlagsPart,
  pub endpoints: EndpointOptionsPart,
  pub security: SecurityPart,
}

impl ModelDescriptor {
  #[must_use]
  pub fn entity(&self) -> &str {
    &self.identity.entity
  }

  #[must_use]
  pub fn domain_type(&self) -> &TypeNameToken {
    &self.identity.type_name
  }

  #[must_use]
  pub fn module(&self) -> &ModuleToken {
    &self.identity.module
  }

  #[must_use]
  pub fn id_field(&self) -> &FieldNameToken {
    &self.identity.id_field
  }

  #[must_use]
  pub fn id_ty(&self) -> &TypeRef {
    &self.identity.id_ty
  }

  #[must_use]
  pub fn route_base(&self) -> String {
    naming::route_base(&self.identity.entity)
  }

  #[must_use]
  pub fn payload_type(&self, role: PayloadRole) -> TypeNameToken {
    TypeNameToken::from_normalized(&naming::payload_type_name(
      self.identity.type_name.as_str(),
      &role.to_string(),
    ))
  }

  #[must_use]
  pub fn filter_type(&self) -> TypeNameToken {
    TypeNameToken::from_normalized(&naming::filter_type_name(self.identity.type_name.as_str()))
  }

  #[must_use]
  pub fn repository_trait(&self) -> TypeNameToken {
    TypeNameToken::from_normalized(&naming::repository_trait_name(self.identity.type_name.as_str()))
  }

  #[must_use]
  pub fn mapper_trait(&self) -> TypeNameToken {
    TypeNameToken::from_normalized(&naming::mapper_trait_name(self.identity.type_name.as_str()))
  }

  #[must_use]
  pub fn service_trait(&self) -> TypeNameToken {
    TypeNameToken::from_normalized(&naming::service_trait_name(self.identity.type_name.as_str()))
  }
}

/// Why a descriptor could not be produced.
///
/// Entity failures are isolated: the pass records them and moves on. Wiring
/// failures mean the generator itself is assembled wrong, and the pass stops.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error(transparent)]
  Entity(anyhow::Error),
  #[error("descriptor extraction misconfigured: {0}")]
  Wiring(anyhow::Error),
}

/// Runs every registered extractor against one entity and assembles the
/// parts into a descriptor.
pub struct DescriptorParser<'a> {
  registry: &'a ExtractorRegistry,
}

impl<'a> DescriptorParser<'a> {
  #[must_use]
  pub fn new(registry: &'a ExtractorRegistry) -> Self {
    Self { registry }
  }

  pub fn parse(
    &self,
    entity: &str,
    manifest: &Manifest,
    stats: &mut GenerationStats,
  ) -> Result<ModelDescriptor, DescriptorError> {
    stats.record_diagnostic(Diagnostic::ParsingEntity { entity: entity.to_owned() });
    let decl = manifest.entity(entity).map_err(|err| DescriptorError::Entity(err.into()))?;

    let mut identity = None;
    let mut flags = None;
    let mut endpoints = None;
    let mut security = None;

    for kind in PartKind::iter() {
      let extractor = self.registry.get(kind).map_err(DescriptorError::Wiring)?;
      let part = extractor
        .extract(entity, decl, manifest)
        .map_err(|err| DescriptorError::Entity(err.context(format!("extracting `{kind}` part"))))?;
      match (kind, part) {
        (PartKind::Identity, DescriptorPart::Identity(part)) => identity = Some(part),
        (PartKind::Flags, DescriptorPart::Flags(part)) => flags = Some(part),
        (PartKind::Endpoints, DescriptorPart::Endpoints(part)) => endpoints = Some(part),
        (PartKind::Security, DescriptorPart::Security(part)) => security = Some(part),
        (kind, part) => {
          return Err(DescriptorError::Wiring(anyhow!(
            "extractor registered for `{kind}` produced a `{}` part",
            part.kind()
          )));
        }
      }
    }

    let (Some(identity), Some(flags), Some(endpoints), Some(security)) = (identity, flags, endpoints, security)
    else {
      return Err(DescriptorError::Wiring(anyhow!("entity `{entity}` is missing a part after extraction")));
    };

    stats.record_descriptor();
    Ok(ModelDescriptor { identity, flags, endpoints, security })
  }
}
