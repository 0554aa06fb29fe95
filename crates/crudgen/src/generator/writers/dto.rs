//! Domain record and payload struct rendering.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use strum::IntoEnumIterator;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext, role_fields};
use crate::{
  generator::{
    ast::{
      DeriveTrait, Documentation, IdAccessor, ModuleToken, PayloadDef, PayloadFieldDef,
      TypeNameToken, TypeRef, ValidationRule, default_payload_derives,
    },
    codegen,
    descriptor::{ModelDescriptor, PayloadRole},
  },
  manifest::{EntityDecl, FieldDecl, MarkerError, RelationDecl},
  naming,
  reserved::to_rust_type_name,
};

/// Renders `dto.rs`: the domain record plus one struct per payload role and
/// declared extra variant.
pub struct DtoWriter;

impl ArtifactWriter for DtoWriter {
  fn name(&self) -> &'static str {
    "dto"
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let decl = ctx.manifest.entity(descriptor.entity())?;
    let imports = relation_imports(descriptor.entity(), decl);

    let mut defs = vec![domain_def(descriptor, decl, ctx)?];
    for role in PayloadRole::iter() {
      defs.push(role_def(descriptor, decl, ctx, role)?);
    }
    for variant in decl.declared_variants() {
      if !matches!(variant, "detail" | "summary" | "create" | "update") {
        defs.push(variant_def(descriptor, decl, ctx, variant)?);
      }
    }

    let contents = codegen::render_file(
      ArtifactKind::Generated,
      quote! {
        #(#imports)*
        #(#defs)*
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/dto.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}

/// Imports for summary types embedded from other entity modules.
fn relation_imports(entity: &str, decl: &EntityDecl) -> Vec<TokenStream> {
  let mut seen = BTreeSet::new();
  decl
    .fields
    .values()
    .filter_map(|field| field.relation.as_ref())
    .filter(|relation| relation.owned && relation.target != entity)
    .filter(|relation| seen.insert(relation.target.clone()))
    .map(|relation| {
      let module = ModuleToken::from(relation.target.as_str());
      let summary = summary_type(&relation.target);
      quote! { use super::super::#module::dto::#summary; }
    })
    .collect()
}

fn summary_type(target: &str) -> TypeNameToken {
  TypeNameToken::from_normalized(&naming::payload_type_name(
    &to_rust_type_name(target),
    "summary",
  ))
}

fn domain_def(
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
) -> anyhow::Result<PayloadDef> {
  let mut docs = Documentation::from_optional(decl.doc.as_ref());
  if docs.is_empty() {
    docs.push(format!(
      "Domain record backing the `{}` module.",
      descriptor.module()
    ));
  }
  let (_, id_decl) = decl.id_field(descriptor.entity())?;
  let fields = decl
    .fields
    .iter()
    .map(|(name, field)| field_def(descriptor.entity(), name, field, ctx, false, false))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(
    PayloadDef::builder()
      .name(descriptor.domain_type().clone())
      .docs(docs)
      .fields(fields)
      .derives(default_payload_derives())
      .id_accessor(IdAccessor {
        field: descriptor.id_field().clone(),
        ty: descriptor.id_ty().clone(),
        optional: id_decl.optional,
      })
      .build(),
  )
}

fn role_def(
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
  role: PayloadRole,
) -> anyhow::Result<PayloadDef> {
  let validations = matches!(role, PayloadRole::Create | PayloadRole::Update);
  let force_optional = role == PayloadRole::Update;
  let fields = role_fields(decl, role)
    .into_iter()
    .map(|(name, field)| {
      field_def(
        descriptor.entity(),
        name,
        field,
        ctx,
        validations,
        force_optional,
      )
    })
    .collect::<Result<Vec<_>, _>>()?;

  let mut derives = default_payload_derives();
  if validations {
    derives.insert(DeriveTrait::Validate);
  }
  // Update payloads address elements by id in batch mutations.
  let id_accessor = (role == PayloadRole::Update).then(|| IdAccessor {
    field: descriptor.id_field().clone(),
    ty: descriptor.id_ty().clone(),
    optional: true,
  });

  Ok(
    PayloadDef::builder()
      .name(descriptor.payload_type(role))
      .docs(role_docs(descriptor, role))
      .fields(fields)
      .derives(derives)
      .maybe_id_accessor(id_accessor)
      .build(),
  )
}

fn role_docs(descriptor: &ModelDescriptor, role: PayloadRole) -> Documentation {
  let ty = descriptor.domain_type();
  let line = match role {
    PayloadRole::Detail => format!("Full read view of a `{ty}`."),
    PayloadRole::Summary => format!("Compact listing view of a `{ty}`."),
    PayloadRole::Create => format!("Payload for creating a `{ty}`."),
    PayloadRole::Update => {
      format!("Partial update for a `{ty}`. Absent fields keep their current value.")
    }
  };
  Documentation::from_raw(&line)
}

fn variant_def(
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
  variant: &str,
) -> anyhow::Result<PayloadDef> {
  let fields = decl
    .fields
    .iter()
    .filter(|(_, field)| field.variants.iter().any(|v| v == variant))
    .map(|(name, field)| field_def(descriptor.entity(), name, field, ctx, false, false))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(
    PayloadDef::builder()
      .name(TypeNameToken::from_normalized(&naming::payload_type_name(
        descriptor.domain_type().as_str(),
        variant,
      )))
      .docs(Documentation::from_raw(&format!(
        "`{variant}` projection of a `{}`.",
        descriptor.domain_type()
      )))
      .fields(fields)
      .derives(default_payload_derives())
      .build(),
  )
}

/// The payload type a field renders as, relation mapping included. Shared
/// with the stub writer so mapper defaults agree with the structs.
pub(super) fn field_type(
  entity: &str,
  name: &str,
  field: &FieldDecl,
  ctx: &WriteContext<'_>,
) -> Result<TypeRef, MarkerError> {
  match &field.relation {
    Some(relation) => relation_type(entity, name, field, relation, ctx),
    None => {
      let parsed = TypeRef::parse(&field.ty);
      Ok(if field.optional {
        parsed.with_option()
      } else {
        parsed
      })
    }
  }
}

fn field_def(
  entity: &str,
  name: &str,
  field: &FieldDecl,
  ctx: &WriteContext<'_>,
  validations: bool,
  force_optional: bool,
) -> Result<PayloadFieldDef, MarkerError> {
  let mut ty = field_type(entity, name, field, ctx)?;
  if force_optional && !ty.nullable {
    ty = ty.with_option();
  }
  let rules = if validations {
    validation_rules(field)
  } else {
    Vec::new()
  };
  Ok(
    PayloadFieldDef::builder()
      .name(name)
      .docs(Documentation::from_optional(field.doc.as_ref()))
      .ty(ty)
      .validations(rules)
      .build(),
  )
}

/// Maps a relation onto a payload type. Owned relations embed the target's
/// summary; unowned relations carry the target's id. Single-valued embeds
/// inside a relation cycle are boxed so the structs stay finitely sized.
fn relation_type(
  entity: &str,
  name: &str,
  field: &FieldDecl,
  relation: &RelationDecl,
  ctx: &WriteContext<'_>,
) -> Result<TypeRef, MarkerError> {
  let target = ctx
    .manifest
    .entity(&relation.target)
    .map_err(|_| MarkerError::UnknownRelationTarget {
      entity: entity.to_string(),
      field: name.to_string(),
      target: relation.target.clone(),
    })?;

  if relation.owned {
    let ty = TypeRef::named(summary_type(&relation.target).as_str());
    if relation.cardinality.is_single() {
      let boxed = ctx.relations.is_cyclic(entity) && ctx.relations.is_cyclic(&relation.target);
      let ty = if boxed { ty.with_boxed() } else { ty };
      Ok(ty.with_option())
    } else {
      Ok(ty.with_vec())
    }
  } else {
    let (_, id_decl) = target.id_field(&relation.target)?;
    let ty = TypeRef::parse(&id_decl.ty);
    if relation.cardinality.is_single() {
      Ok(if field.optional { ty.with_option() } else { ty })
    } else {
      Ok(ty.with_vec())
    }
  }
}

fn validation_rules(field: &FieldDecl) -> Vec<ValidationRule> {
  let Some(constraints) = &field.constraints else {
    return Vec::new();
  };
  let mut rules = Vec::new();
  if constraints.min_length.is_some() || constraints.max_length.is_some() {
    rules.push(ValidationRule::Length {
      min: constraints.min_length,
      max: constraints.max_length,
    });
  }
  if constraints.min.is_some() || constraints.max.is_some() {
    rules.push(ValidationRule::Range {
      min: constraints.min.clone(),
      max: constraints.max.clone(),
    });
  }
  rules
}
