/// A marker in the manifest references something that does not exist, or a
/// required marker is missing. Raised at the point of use so one bad entity
/// does not poison the others.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
  #[error("entity `{0}` is not declared in the manifest")]
  UnknownEntity(String),

  #[error("entity `{entity}` references unknown field `{field}`")]
  UnknownField { entity: String, field: String },

  #[error("entity `{entity}` has no field marked `id: true`")]
  MissingId { entity: String },

  #[error("entity `{entity}` marks both `{first}` and `{second}` as identifiers")]
  DuplicateId {
    entity: String,
    first: String,
    second: String,
  },

  #[error("entity `{entity}` references unknown endpoint tag `{tag}`")]
  UnknownTag { entity: String, tag: String },

  #[error("entity `{entity}` references unknown endpoint template `{template}`")]
  UnknownTemplate { entity: String, template: String },

  #[error("entity `{entity}` references unknown endpoint policy `{policy}`")]
  UnknownEndpointPolicy { entity: String, policy: String },

  #[error("entity `{entity}` references unknown security policy `{policy}`")]
  UnknownSecurityPolicy { entity: String, policy: String },

  #[error("relation on `{entity}.{field}` targets unknown entity `{target}`")]
  UnknownRelationTarget {
    entity: String,
    field: String,
    target: String,
  },
}
