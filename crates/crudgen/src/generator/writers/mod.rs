//! Artifact writers and the registry that sequences them.
//!
//! Each writer renders one file family for an entity module (payload structs,
//! handlers, repository, mapper, query filter, module index). The registry
//! runs every applicable writer for a descriptor and fails the entity as a
//! whole on the first writer error, so a module is either complete on disk or
//! absent.

mod dto;
mod handlers;
mod mapper;
mod module_index;
mod query;
mod repository;
mod stubs;

pub use dto::DtoWriter;
pub use handlers::HandlersWriter;
pub use mapper::MapperWriter;
pub use module_index::ModuleIndexWriter;
pub use query::QueryWriter;
pub use repository::RepositoryWriter;
pub use stubs::StubsWriter;

use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Context;

use crate::{
  generator::{
    descriptor::{ModelDescriptor, PayloadRole},
    endpoint::EndpointTag,
  },
  manifest::{EntityDecl, FieldDecl, Manifest, RelationGraph},
};

/// How the emitter and reconciler treat a produced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactKind {
  /// Regenerated on every pass and never hand-edited.
  Generated,
  /// Written once as a starting point, then owned by the application.
  EditableStub,
}

/// One rendered file, with a path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub path: PathBuf,
  pub kind: ArtifactKind,
  pub contents: String,
}

impl Artifact {
  pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind, contents: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      kind,
      contents: contents.into(),
    }
  }
}

/// Shared inputs for one entity's writers.
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
  pub manifest: &'a Manifest,
  pub relations: &'a RelationGraph,
  /// The endpoint set already resolved for this entity.
  pub resolved: &'a BTreeSet<EndpointTag>,
}

/// Renders source artifacts for one descriptor.
pub trait ArtifactWriter: Send + Sync {
  fn name(&self) -> &'static str;

  /// Whether this writer produces anything for the descriptor. Writers that
  /// return `false` are skipped without being counted as failures.
  fn applies(&self, _descriptor: &ModelDescriptor, _ctx: &WriteContext<'_>) -> bool {
    true
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>>;
}

/// The ordered writer list for a generation pass.
pub struct WriterRegistry {
  writers: Vec<Box<dyn ArtifactWriter>>,
}

impl WriterRegistry {
  #[must_use]
  pub fn standard() -> Self {
    Self::with_writers(vec![
      Box::new(DtoWriter),
      Box::new(QueryWriter),
      Box::new(RepositoryWriter),
      Box::new(MapperWriter),
      Box::new(StubsWriter),
      Box::new(HandlersWriter),
      Box::new(ModuleIndexWriter),
    ])
  }

  #[must_use]
  pub fn with_writers(writers: Vec<Box<dyn ArtifactWriter>>) -> Self {
    Self { writers }
  }

  /// Runs every applicable writer and collects their artifacts. The first
  /// writer error aborts the entity so partial modules never reach disk.
  pub fn write_all(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();
    for writer in &self.writers {
      if !writer.applies(descriptor, ctx) {
        continue;
      }
      let mut produced = writer.write(descriptor, ctx).with_context(|| {
        format!(
          "writer `{}` on entity `{}`",
          writer.name(),
          descriptor.entity()
        )
      })?;
      artifacts.append(&mut produced);
    }
    Ok(artifacts)
  }
}

impl Default for WriterRegistry {
  fn default() -> Self {
    Self::standard()
  }
}

/// Fields participating in a payload role, in declaration order.
///
/// A role with at least one explicit `variants` membership uses exactly the
/// declared fields. Otherwise each role falls back: detail takes every field,
/// summary mirrors detail, create drops the id and owned relations, and
/// update mirrors create with the id forced back in so batch mutations can
/// address elements.
pub(crate) fn role_fields<'a>(
  decl: &'a EntityDecl,
  role: PayloadRole,
) -> Vec<(&'a String, &'a FieldDecl)> {
  let declared = |variant: &str| -> Option<Vec<(&'a String, &'a FieldDecl)>> {
    decl
      .fields
      .values()
      .any(|field| field.variants.iter().any(|v| v == variant))
      .then(|| {
        decl
          .fields
          .iter()
          .filter(|(_, field)| field.variants.iter().any(|v| v == variant))
          .collect()
      })
  };

  match role {
    PayloadRole::Detail => declared("detail").unwrap_or_else(|| decl.fields.iter().collect()),
    PayloadRole::Summary => {
      declared("summary").unwrap_or_else(|| role_fields(decl, PayloadRole::Detail))
    }
    PayloadRole::Create => declared("create").unwrap_or_else(|| {
      decl
        .fields
        .iter()
        .filter(|(_, field)| !field.id && !field.relation.as_ref().is_some_and(|r| r.owned))
        .collect()
    }),
    PayloadRole::Update => {
      let mut fields =
        declared("update").unwrap_or_else(|| role_fields(decl, PayloadRole::Create));
      if let Some(id) = decl.fields.iter().find(|(_, field)| field.id)
        && !fields.iter().any(|(name, _)| *name == id.0)
      {
        fields.insert(0, id);
      }
      fields
    }
  }
}

/// Whether the resolved endpoints leave anything for a repository to do.
pub(crate) fn has_repository(resolved: &BTreeSet<EndpointTag>) -> bool {
  !repository::required_methods(resolved).is_empty()
}

/// Scalar view of a searchable field: the filter value type plus whether the
/// domain field is optional. Owned embeds and id collections have no scalar
/// filter form and yield `None`.
pub(crate) fn searchable_scalar(
  manifest: &Manifest,
  field: &FieldDecl,
) -> Option<(crate::generator::ast::TypeRef, bool)> {
  use crate::generator::ast::TypeRef;

  match &field.relation {
    None => Some((TypeRef::parse(&field.ty), field.optional)),
    Some(relation) if !relation.owned && relation.cardinality.is_single() => {
      let target = manifest.entity(&relation.target).ok()?;
      let (_, id_decl) = target.id_field(&relation.target).ok()?;
      Some((TypeRef::parse(&id_decl.ty), field.optional))
    }
    Some(_) => None,
  }
}
