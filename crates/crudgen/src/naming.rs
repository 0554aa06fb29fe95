//! Naming conventions shared by every writer.
//!
//! All derived names funnel through here so that handlers, repositories, and
//! module indexes agree on what a generated item is called.

use inflections::Inflect;

use crate::reserved::{to_rust_module_name, to_rust_type_name};

pub(crate) const DETAIL_SUFFIX: &str = "Detail";
pub(crate) const SUMMARY_SUFFIX: &str = "Summary";
pub(crate) const CREATE_SUFFIX: &str = "Create";
pub(crate) const UPDATE_SUFFIX: &str = "Update";
pub(crate) const REPOSITORY_SUFFIX: &str = "Repository";
pub(crate) const MAPPER_SUFFIX: &str = "Mapper";
pub(crate) const FILTER_SUFFIX: &str = "Filter";
pub(crate) const SERVICE_SUFFIX: &str = "Service";

/// URL segment that anchors every route for an entity: `order_item` becomes
/// `order-items`.
pub(crate) fn route_base(entity: &str) -> String {
  cruet::to_plural(&to_rust_module_name(entity)).to_kebab_case()
}

/// Name of a payload struct for a given variant: (`Pet`, `summary`) becomes
/// `PetSummary`.
pub(crate) fn payload_type_name(type_name: &str, variant: &str) -> String {
  format!("{type_name}{}", to_rust_type_name(variant))
}

pub(crate) fn repository_trait_name(type_name: &str) -> String {
  format!("{type_name}{REPOSITORY_SUFFIX}")
}

pub(crate) fn mapper_trait_name(type_name: &str) -> String {
  format!("{type_name}{MAPPER_SUFFIX}")
}

pub(crate) fn filter_type_name(type_name: &str) -> String {
  format!("{type_name}{FILTER_SUFFIX}")
}

pub(crate) fn service_trait_name(type_name: &str) -> String {
  format!("{type_name}{SERVICE_SUFFIX}")
}

pub(crate) fn in_memory_repository_name(type_name: &str) -> String {
  format!("InMemory{type_name}{REPOSITORY_SUFFIX}")
}

pub(crate) fn default_mapper_name(type_name: &str) -> String {
  format!("Default{type_name}{MAPPER_SUFFIX}")
}

/// Grant string checked by generated guards, e.g. `pet:read`.
pub(crate) fn grant(entity: &str, action: &str) -> String {
  format!("{}:{action}", to_rust_module_name(entity))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn route_bases_are_plural_kebab() {
    assert_eq!(route_base("pet"), "pets");
    assert_eq!(route_base("OrderItem"), "order-items");
    assert_eq!(route_base("category"), "categories");
  }

  #[test]
  fn payload_names_compose() {
    assert_eq!(payload_type_name("Pet", "summary"), "PetSummary");
    assert_eq!(payload_type_name("Pet", "admin-view"), "PetAdminView");
    assert_eq!(repository_trait_name("Pet"), "PetRepository");
    assert_eq!(mapper_trait_name("Pet"), "PetMapper");
    assert_eq!(filter_type_name("Pet"), "PetFilter");
    assert_eq!(service_trait_name("Pet"), "PetService");
    assert_eq!(in_memory_repository_name("Pet"), "InMemoryPetRepository");
    assert_eq!(default_mapper_name("Pet"), "DefaultPetMapper");
  }

  #[test]
  fn grants_use_module_names() {
    assert_eq!(grant("OrderItem", "read"), "order_item:read");
    assert_eq!(grant("pet", "delete"), "pet:delete");
  }
}
