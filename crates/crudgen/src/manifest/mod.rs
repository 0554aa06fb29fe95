//! The entity manifest: the declarative input every generation pass starts
//! from.
//!
//! A manifest declares entities, their fields, and the markers that drive
//! generation (identifier flags, payload variants, endpoint selections,
//! security policies). Parsing is strict: unknown keys are rejected so typos
//! surface as located errors instead of silently changing output.

pub mod error;
pub mod loader;
pub mod relations;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;

pub use self::{
  error::MarkerError,
  loader::ManifestLoader,
  relations::RelationGraph,
};

fn default_true() -> bool {
  true
}

/// Root of a parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
  /// Optional display name used in logs and banners.
  #[serde(default)]
  pub name: Option<String>,
  pub entities: IndexMap<String, EntityDecl>,
  /// Named endpoint deny-lists referenced by `endpoints.policy`.
  #[serde(default)]
  pub endpoint_policies: IndexMap<String, EndpointPolicyDecl>,
  /// Named grant tables referenced by `security.policy`.
  #[serde(default)]
  pub security_policies: IndexMap<String, SecurityPolicyDecl>,
}

impl Manifest {
  pub fn entity(&self, name: &str) -> Result<&EntityDecl, MarkerError> {
    self
      .entities
      .get(name)
      .ok_or_else(|| MarkerError::UnknownEntity(name.to_string()))
  }

  /// Entities selected for generation, in declaration order.
  pub fn described_entities(&self) -> impl Iterator<Item = (&String, &EntityDecl)> {
    self.entities.iter().filter(|(_, decl)| decl.generate)
  }

  pub fn endpoint_policy(&self, entity: &str, name: &str) -> Result<&EndpointPolicyDecl, MarkerError> {
    self
      .endpoint_policies
      .get(name)
      .ok_or_else(|| MarkerError::UnknownEndpointPolicy {
        entity: entity.to_string(),
        policy: name.to_string(),
      })
  }

  pub fn security_policy(&self, entity: &str, name: &str) -> Result<&SecurityPolicyDecl, MarkerError> {
    self
      .security_policies
      .get(name)
      .ok_or_else(|| MarkerError::UnknownSecurityPolicy {
        entity: entity.to_string(),
        policy: name.to_string(),
      })
  }
}

/// One entity declaration and its generation markers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDecl {
  /// Entities can be declared for reference only.
  #[serde(default = "default_true")]
  pub generate: bool,
  /// Target module name; defaults to the snake_case entity name.
  #[serde(default)]
  pub module: Option<String>,
  /// Whether repository and mapper stubs are written for hand editing.
  #[serde(default)]
  pub editable_stubs: Option<bool>,
  /// Master switch for guard emission on this entity's handlers.
  #[serde(default)]
  pub secure: Option<bool>,
  /// Endpoint template name; defaults to `full`.
  #[serde(default)]
  pub template: Option<String>,
  #[serde(default)]
  pub endpoints: EndpointOptionsDecl,
  #[serde(default)]
  pub security: SecurityDecl,
  #[serde(default)]
  pub doc: Option<String>,
  pub fields: IndexMap<String, FieldDecl>,
}

impl EntityDecl {
  /// The single field marked `id: true`.
  pub fn id_field(&self, entity: &str) -> Result<(&String, &FieldDecl), MarkerError> {
    let mut marked = self.fields.iter().filter(|(_, f)| f.id);

    let Some(first) = marked.next() else {
      return Err(MarkerError::MissingId {
        entity: entity.to_string(),
      });
    };

    if let Some(second) = marked.next() {
      return Err(MarkerError::DuplicateId {
        entity: entity.to_string(),
        first: first.0.clone(),
        second: second.0.clone(),
      });
    }

    Ok(first)
  }

  pub fn field(&self, entity: &str, name: &str) -> Result<&FieldDecl, MarkerError> {
    self.fields.get(name).ok_or_else(|| MarkerError::UnknownField {
      entity: entity.to_string(),
      field: name.to_string(),
    })
  }

  /// Variant names declared anywhere on this entity's fields, deduplicated
  /// in first-seen order.
  pub fn declared_variants(&self) -> Vec<&str> {
    self
      .fields
      .values()
      .flat_map(|field| field.variants.iter().map(String::as_str))
      .unique()
      .collect()
  }

  pub fn searchable_fields(&self) -> impl Iterator<Item = (&String, &FieldDecl)> {
    self.fields.iter().filter(|(_, f)| f.searchable)
  }

  pub fn has_searchable_fields(&self) -> bool {
    self.fields.values().any(|f| f.searchable)
  }
}

/// Explicit endpoint selection on top of the entity's template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointOptionsDecl {
  #[serde(default)]
  pub include: Vec<String>,
  #[serde(default)]
  pub omit: Vec<String>,
  /// Name of an entry in `endpoint_policies`.
  #[serde(default)]
  pub policy: Option<String>,
}

/// Security markers for an entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityDecl {
  /// Name of an entry in `security_policies`.
  #[serde(default)]
  pub policy: Option<String>,
  /// Hook name recorded for row-level filtering in the repository stub.
  #[serde(default)]
  pub row_handler: Option<String>,
  /// Hook name recorded for field-level redaction in the mapper stub.
  #[serde(default)]
  pub field_handler: Option<String>,
}

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
  /// Manifest type spelling, e.g. `string`, `i64`, `datetime`, or a custom
  /// domain type name.
  #[serde(rename = "type")]
  pub ty: String,
  /// Marks the entity identifier. Exactly one field per entity.
  #[serde(default)]
  pub id: bool,
  /// Payload variants this field participates in.
  #[serde(default)]
  pub variants: Vec<String>,
  #[serde(default)]
  pub searchable: bool,
  /// Grants that may read this field. Restricted fields stay out of the
  /// mapper's export columns.
  #[serde(default)]
  pub roles: Vec<String>,
  #[serde(default)]
  pub optional: bool,
  #[serde(default)]
  pub relation: Option<RelationDecl>,
  #[serde(default)]
  pub constraints: Option<ConstraintsDecl>,
  #[serde(default)]
  pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDecl {
  /// Entity name the relation points at.
  pub target: String,
  pub cardinality: Cardinality,
  /// Owned relations embed the target payload; unowned ones embed only the
  /// target identifier.
  #[serde(default)]
  pub owned: bool,
}

/// Relation arity. `one` and `many` are accepted as short spellings of the
/// owning side's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Cardinality {
  #[serde(alias = "one")]
  OneToOne,
  #[serde(alias = "many")]
  OneToMany,
  ManyToOne,
  ManyToMany,
}

impl Cardinality {
  /// True when the relation holds at most one target.
  #[must_use]
  pub fn is_single(self) -> bool {
    matches!(self, Cardinality::OneToOne | Cardinality::ManyToOne)
  }
}

/// Declarative constraints carried onto generated payload fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintsDecl {
  #[serde(default)]
  pub min_length: Option<u64>,
  #[serde(default)]
  pub max_length: Option<u64>,
  #[serde(default)]
  pub min: Option<serde_json::Number>,
  #[serde(default)]
  pub max: Option<serde_json::Number>,
}

impl ConstraintsDecl {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.min_length.is_none() && self.max_length.is_none() && self.min.is_none() && self.max.is_none()
  }
}

/// A named deny-list: resolved endpoints minus the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointPolicyDecl {
  #[serde(default)]
  pub deny: Vec<String>,
}

/// A named grant table mapped onto read, write, and delete actions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityPolicyDecl {
  #[serde(default)]
  pub read: Option<String>,
  #[serde(default)]
  pub write: Option<String>,
  #[serde(default)]
  pub delete: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn manifest(yaml: &str) -> Manifest {
    loader::manifest_from_yaml(yaml).unwrap()
  }

  #[test]
  fn id_field_requires_exactly_one_marker() {
    let m = manifest(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: true }
      name: { type: string }
  orphan:
    fields:
      name: { type: string }
  twins:
    fields:
      a: { type: i64, id: true }
      b: { type: i64, id: true }
",
    );

    let pet = m.entity("pet").unwrap();
    let (name, decl) = pet.id_field("pet").unwrap();
    assert_eq!(name, "id");
    assert!(decl.id);

    let orphan = m.entity("orphan").unwrap();
    assert_eq!(
      orphan.id_field("orphan").unwrap_err(),
      MarkerError::MissingId {
        entity: "orphan".to_string()
      }
    );

    let twins = m.entity("twins").unwrap();
    assert!(matches!(
      twins.id_field("twins").unwrap_err(),
      MarkerError::DuplicateId { .. }
    ));
  }

  #[test]
  fn described_entities_skip_generate_false() {
    let m = manifest(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: true }
  audit:
    generate: false
    fields:
      id: { type: i64, id: true }
",
    );

    let names: Vec<_> = m.described_entities().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["pet"]);
  }

  #[test]
  fn declared_variants_dedupe_in_order() {
    let m = manifest(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: true, variants: [summary, detail] }
      name: { type: string, variants: [detail, summary, admin] }
",
    );

    let pet = m.entity("pet").unwrap();
    assert_eq!(pet.declared_variants(), vec!["summary", "detail", "admin"]);
  }

  #[test]
  fn unknown_policy_lookups_are_marker_errors() {
    let m = manifest(
      r"
entities:
  pet:
    fields:
      id: { type: i64, id: true }
",
    );

    assert_eq!(
      m.endpoint_policy("pet", "nope").unwrap_err(),
      MarkerError::UnknownEndpointPolicy {
        entity: "pet".to_string(),
        policy: "nope".to_string()
      }
    );
    assert!(matches!(
      m.security_policy("pet", "nope").unwrap_err(),
      MarkerError::UnknownSecurityPolicy { .. }
    ));
  }
}
