use std::collections::BTreeSet;

use crate::{
  generator::{
    ast::{FieldNameToken, GuardExpr, ModuleToken, TypeNameToken, TypeRef},
    endpoint::{EndpointTag, EndpointTemplate, GuardAction},
  },
  naming,
};

/// The four part families a model descriptor is assembled from. Each kind
/// is produced by exactly one registered extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PartKind {
  Identity,
  Flags,
  Endpoints,
  Security,
}

/// One extracted descriptor part, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorPart {
  Identity(IdentityPart),
  Flags(FlagsPart),
  Endpoints(EndpointOptionsPart),
  Security(SecurityPart),
}

impl DescriptorPart {
  #[must_use]
  pub fn kind(&self) -> PartKind {
    match self {
      Self::Identity(_) => PartKind::Identity,
      Self::Flags(_) => PartKind::Flags,
      Self::Endpoints(_) => PartKind::Endpoints,
      Self::Security(_) => PartKind::Security,
    }
  }
}

/// Who the entity is: names and the identifier.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct IdentityPart {
  /// Manifest key, kept verbatim for error messages and lookups.
  #[builder(into)]
  pub entity: String,
  pub type_name: TypeNameToken,
  pub module: ModuleToken,
  pub id_field: FieldNameToken,
  pub id_ty: TypeRef,
}

/// Boolean toggles plus the endpoint template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagsPart {
  pub editable_stubs: bool,
  pub secure: bool,
  pub template: EndpointTemplate,
}

impl Default for FlagsPart {
  fn default() -> Self {
    Self {
      editable_stubs: true,
      secure: true,
      template: EndpointTemplate::default(),
    }
  }
}

/// Explicit endpoint selection. Tags are parsed strictly here; the policy
/// name is looked up later, at resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointOptionsPart {
  pub include: BTreeSet<EndpointTag>,
  pub omit: BTreeSet<EndpointTag>,
  pub policy: Option<String>,
}

/// Resolved table-level security policy plus hook names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityPart {
  pub policy: TablePolicy,
  pub row_handler: Option<String>,
  pub field_handler: Option<String>,
}

/// Grant table for an entity. Absent policies leave every endpoint open;
/// a present policy guards every action, falling back to the conventional
/// `entity:action` grant where no explicit grant is named.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TablePolicy {
  #[default]
  Permissive,
  Guarded {
    read: Option<String>,
    write: Option<String>,
    delete: Option<String>,
  },
}

impl TablePolicy {
  #[must_use]
  pub fn expression(&self, entity: &str, action: GuardAction) -> GuardExpr {
    match self {
      Self::Permissive => GuardExpr::Allow,
      Self::Guarded { read, write, delete } => {
        let explicit = match action {
          GuardAction::Read => read,
          GuardAction::Write => write,
          GuardAction::Delete => delete,
        };
        let grant = explicit
          .clone()
          .unwrap_or_else(|| naming::grant(entity, &action.to_string()));
        GuardExpr::Require(grant)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn permissive_policy_allows_everything() {
    let policy = TablePolicy::Permissive;
    assert_eq!(policy.expression("pet", GuardAction::Read), GuardExpr::Allow);
    assert_eq!(policy.expression("pet", GuardAction::Delete), GuardExpr::Allow);
  }

  #[test]
  fn guarded_policy_prefers_explicit_grants() {
    let policy = TablePolicy::Guarded {
      read: None,
      write: Some("staff".to_string()),
      delete: None,
    };

    assert_eq!(
      policy.expression("pet", GuardAction::Write),
      GuardExpr::Require("staff".to_string())
    );
    // Unnamed actions fall back to the conventional grant.
    assert_eq!(
      policy.expression("pet", GuardAction::Read),
      GuardExpr::Require("pet:read".to_string())
    );
  }

  #[test]
  fn parts_report_their_kind() {
    let part = DescriptorPart::Flags(FlagsPart::default());
    assert_eq!(part.kind(), PartKind::Flags);
    assert_eq!(part.kind().to_string(), "flags");
  }
}
