//! Editable stub rendering: an in-memory repository and a field-by-field
//! default mapper.
//!
//! Stubs are emitted once and then owned by the application, so everything
//! here aims for obvious, easily edited code rather than cleverness.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{
  Artifact, ArtifactKind, ArtifactWriter, WriteContext,
  dto::field_type,
  repository::{RepoMethod, required_methods},
  role_fields, searchable_scalar,
};
use crate::{
  generator::{
    ast::{FieldNameToken, RustPrimitive, TypeNameToken, TypeRef},
    codegen,
    descriptor::{ModelDescriptor, PayloadRole},
  },
  manifest::{EntityDecl, MarkerError},
  naming,
};

/// Renders `stubs.rs`, the one hand-editable file per module.
pub struct StubsWriter;

impl ArtifactWriter for StubsWriter {
  fn name(&self) -> &'static str {
    "stubs"
  }

  fn applies(&self, descriptor: &ModelDescriptor, ctx: &WriteContext<'_>) -> bool {
    descriptor.flags.editable_stubs && !ctx.resolved.is_empty()
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let decl = ctx.manifest.entity(descriptor.entity())?;
    let methods = required_methods(ctx.resolved);
    let has_repo = !methods.is_empty();

    let std_imports = has_repo.then(|| {
      quote! {
        use std::collections::BTreeMap;
        use std::sync::Mutex;
      }
    });
    let needs_page =
      methods.contains(&RepoMethod::ListPage) || methods.contains(&RepoMethod::Search);
    let page_import = needs_page.then(|| quote! { use crudgen_support::{Page, PageRequest}; });
    let mapper_trait = descriptor.mapper_trait();
    let filter_import = methods.contains(&RepoMethod::Search).then(|| {
      let filter = descriptor.filter_type();
      quote! { use super::query::#filter; }
    });
    let repo_import = has_repo.then(|| {
      let repo_trait = descriptor.repository_trait();
      quote! { use super::repository::{#repo_trait, RepoError}; }
    });

    let repository = has_repo
      .then(|| render_repository(descriptor, decl, ctx, &methods))
      .transpose()?;
    let mapper = render_mapper(descriptor, decl, ctx)?;

    let contents = codegen::render_file(
      ArtifactKind::EditableStub,
      quote! {
        #std_imports
        #page_import
        use super::dto::*;
        use super::mapper::#mapper_trait;
        #filter_import
        #repo_import

        #repository
        #mapper
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/stubs.rs", descriptor.module()),
      ArtifactKind::EditableStub,
      contents,
    )])
  }
}

/// How the stub assigns ids on insert.
#[derive(Clone, Copy, PartialEq, Eq)]
enum IdStrategy {
  /// Highest existing integer id plus one.
  Sequential,
  /// Fresh `uuid::Uuid::new_v4()`.
  Random,
  /// Whatever the caller put in the record.
  Provided,
}

fn id_strategy(id_ty: &TypeRef) -> IdStrategy {
  match id_ty.base_type {
    RustPrimitive::I8
    | RustPrimitive::I16
    | RustPrimitive::I32
    | RustPrimitive::I64
    | RustPrimitive::U8
    | RustPrimitive::U16
    | RustPrimitive::U32
    | RustPrimitive::U64 => IdStrategy::Sequential,
    RustPrimitive::Uuid => IdStrategy::Random,
    _ => IdStrategy::Provided,
  }
}

fn render_repository(
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
  methods: &BTreeSet<RepoMethod>,
) -> anyhow::Result<TokenStream> {
  let store = TypeNameToken::from_normalized(&naming::in_memory_repository_name(
    descriptor.domain_type().as_str(),
  ));
  let repo_trait = descriptor.repository_trait();
  let domain = descriptor.domain_type();
  let id_ty = descriptor.id_ty();
  let (_, id_decl) = decl.id_field(descriptor.entity())?;

  let shape = StoreShape {
    id: descriptor.id_field().clone(),
    id_optional: id_decl.optional,
    copy_id: id_ty.base_type.is_copy(),
    strategy: id_strategy(id_ty),
  };
  let impls: Vec<TokenStream> = methods
    .iter()
    .map(|method| impl_method(*method, descriptor, decl, ctx, &shape))
    .collect();

  let mut docs = vec![format!("`BTreeMap`-backed `{repo_trait}` for development and tests.")];
  if let Some(hook) = &descriptor.security.row_handler {
    docs.push(format!("Row-level filtering expects the `{hook}` hook on every query."));
  }
  Ok(quote! {
    #(#[doc = #docs])*
    #[derive(Debug, Default)]
    pub struct #store {
      records: Mutex<BTreeMap<#id_ty, #domain>>,
    }

    impl #repo_trait for #store {
      #(#impls)*
    }
  })
}

struct StoreShape {
  id: FieldNameToken,
  id_optional: bool,
  copy_id: bool,
  strategy: IdStrategy,
}

impl StoreShape {
  /// Expression stored into the record's id field from a local `id` binding.
  fn assign(&self) -> TokenStream {
    if self.id_optional {
      quote!(Some(id))
    } else {
      quote!(id)
    }
  }

  /// Expression stored into the record's id field from the `&id` parameter.
  fn reassign(&self) -> TokenStream {
    match (self.copy_id, self.id_optional) {
      (true, false) => quote!(*id),
      (true, true) => quote!(Some(*id)),
      (false, false) => quote!(id.clone()),
      (false, true) => quote!(Some(id.clone())),
    }
  }

  fn key(&self) -> TokenStream {
    if self.copy_id {
      quote!(*id)
    } else {
      quote!(id.clone())
    }
  }
}

fn impl_method(
  method: RepoMethod,
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
  shape: &StoreShape,
) -> TokenStream {
  let domain = descriptor.domain_type();
  let id_ty = descriptor.id_ty();
  let id = &shape.id;

  match method {
    RepoMethod::FindById => quote! {
      async fn find_by_id(&self, id: &#id_ty) -> Result<Option<#domain>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.get(id).cloned())
      }
    },
    RepoMethod::FindByIds => quote! {
      async fn find_by_ids(&self, ids: &[#id_ty]) -> Result<Vec<#domain>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
      }
    },
    RepoMethod::ListAll => quote! {
      async fn list_all(&self) -> Result<Vec<#domain>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.values().cloned().collect())
      }
    },
    RepoMethod::ListPage => quote! {
      async fn list_page(&self, page: &PageRequest) -> Result<Page<#domain>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        let total = records.len() as u64;
        let items = records
          .values()
          .skip(page.offset() as usize)
          .take(page.size as usize)
          .cloned()
          .collect();
        Ok(Page::new(items, page, total))
      }
    },
    RepoMethod::Search => {
      let filter_ty = descriptor.filter_type();
      let clauses = search_clauses(decl, ctx);
      let filter_param = if clauses.is_empty() {
        format_ident!("_filter")
      } else {
        format_ident!("filter")
      };
      let predicate = if clauses.is_empty() {
        quote!(|_entity| true)
      } else {
        quote!(|entity| #(#clauses)&&*)
      };
      quote! {
        async fn search(&self, #filter_param: &#filter_ty, page: &PageRequest) -> Result<Page<#domain>, RepoError> {
          let records = self.records.lock().expect("lock poisoned");
          let matches: Vec<#domain> = records.values().filter(#predicate).cloned().collect();
          let total = matches.len() as u64;
          let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
          Ok(Page::new(items, page, total))
        }
      }
    }
    RepoMethod::Exists => quote! {
      async fn exists(&self, id: &#id_ty) -> Result<bool, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.contains_key(id))
      }
    },
    RepoMethod::Count => quote! {
      async fn count(&self) -> Result<u64, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.len() as u64)
      }
    },
    RepoMethod::Insert => {
      let assign = shape.assign();
      match shape.strategy {
        IdStrategy::Sequential => quote! {
          async fn insert(&self, mut entity: #domain) -> Result<#domain, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let id = records.keys().max().copied().unwrap_or_default() + 1;
            entity.#id = #assign;
            records.insert(id, entity.clone());
            Ok(entity)
          }
        },
        IdStrategy::Random => quote! {
          async fn insert(&self, mut entity: #domain) -> Result<#domain, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let id = uuid::Uuid::new_v4();
            entity.#id = #assign;
            records.insert(id, entity.clone());
            Ok(entity)
          }
        },
        IdStrategy::Provided if shape.id_optional => quote! {
          async fn insert(&self, entity: #domain) -> Result<#domain, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let id = entity.#id.clone().ok_or("entity missing an id")?;
            records.insert(id, entity.clone());
            Ok(entity)
          }
        },
        IdStrategy::Provided => quote! {
          async fn insert(&self, entity: #domain) -> Result<#domain, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            records.insert(entity.#id.clone(), entity.clone());
            Ok(entity)
          }
        },
      }
    }
    RepoMethod::InsertBatch => {
      let assign = shape.assign();
      match shape.strategy {
        IdStrategy::Sequential => quote! {
          async fn insert_batch(&self, entities: Vec<#domain>) -> Result<Vec<#domain>, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let mut id = records.keys().max().copied().unwrap_or_default() + 1;
            let mut inserted = Vec::with_capacity(entities.len());
            for mut entity in entities {
              entity.#id = #assign;
              records.insert(id, entity.clone());
              inserted.push(entity);
              id += 1;
            }
            Ok(inserted)
          }
        },
        IdStrategy::Random => quote! {
          async fn insert_batch(&self, entities: Vec<#domain>) -> Result<Vec<#domain>, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let mut inserted = Vec::with_capacity(entities.len());
            for mut entity in entities {
              let id = uuid::Uuid::new_v4();
              entity.#id = #assign;
              records.insert(id, entity.clone());
              inserted.push(entity);
            }
            Ok(inserted)
          }
        },
        IdStrategy::Provided if shape.id_optional => quote! {
          async fn insert_batch(&self, entities: Vec<#domain>) -> Result<Vec<#domain>, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let mut inserted = Vec::with_capacity(entities.len());
            for entity in entities {
              let id = entity.#id.clone().ok_or("entity missing an id")?;
              records.insert(id, entity.clone());
              inserted.push(entity);
            }
            Ok(inserted)
          }
        },
        IdStrategy::Provided => quote! {
          async fn insert_batch(&self, entities: Vec<#domain>) -> Result<Vec<#domain>, RepoError> {
            let mut records = self.records.lock().expect("lock poisoned");
            let mut inserted = Vec::with_capacity(entities.len());
            for entity in entities {
              records.insert(entity.#id.clone(), entity.clone());
              inserted.push(entity);
            }
            Ok(inserted)
          }
        },
      }
    }
    RepoMethod::Replace => {
      let reassign = shape.reassign();
      let key = shape.key();
      quote! {
        async fn replace(&self, id: &#id_ty, mut entity: #domain) -> Result<Option<#domain>, RepoError> {
          let mut records = self.records.lock().expect("lock poisoned");
          if !records.contains_key(id) {
            return Ok(None);
          }
          entity.#id = #reassign;
          records.insert(#key, entity.clone());
          Ok(Some(entity))
        }
      }
    }
    RepoMethod::Remove => quote! {
      async fn remove(&self, id: &#id_ty) -> Result<bool, RepoError> {
        let mut records = self.records.lock().expect("lock poisoned");
        Ok(records.remove(id).is_some())
      }
    },
    RepoMethod::RemoveBatch => quote! {
      async fn remove_batch(&self, ids: &[#id_ty]) -> Result<(), RepoError> {
        let mut records = self.records.lock().expect("lock poisoned");
        for id in ids {
          records.remove(id);
        }
        Ok(())
      }
    },
  }
}

fn search_clauses(decl: &EntityDecl, ctx: &WriteContext<'_>) -> Vec<TokenStream> {
  decl
    .searchable_fields()
    .filter_map(|(name, field)| {
      let (_, optional) = searchable_scalar(ctx.manifest, field)?;
      let field_name = FieldNameToken::from(name.as_str());
      Some(if optional {
        quote! { filter.#field_name.as_ref().is_none_or(|value| entity.#field_name.as_ref() == Some(value)) }
      } else {
        quote! { filter.#field_name.as_ref().is_none_or(|value| &entity.#field_name == value) }
      })
    })
    .collect()
}

struct FieldView<'a> {
  name: FieldNameToken,
  ty: TypeRef,
  raw: &'a str,
  relation: bool,
  restricted: bool,
}

fn field_views<'a>(
  descriptor: &ModelDescriptor,
  decl: &'a EntityDecl,
  ctx: &WriteContext<'_>,
) -> Result<Vec<FieldView<'a>>, MarkerError> {
  decl
    .fields
    .iter()
    .map(|(name, field)| {
      Ok(FieldView {
        name: FieldNameToken::from(name.as_str()),
        ty: field_type(descriptor.entity(), name, field, ctx)?,
        raw: name.as_str(),
        relation: field.relation.is_some(),
        restricted: !field.roles.is_empty(),
      })
    })
    .collect()
}

fn is_copy_ty(ty: &TypeRef) -> bool {
  ty.base_type.is_copy() && !ty.is_array && !ty.boxed
}

fn role_names(decl: &EntityDecl, role: PayloadRole) -> BTreeSet<&str> {
  role_fields(decl, role)
    .into_iter()
    .map(|(name, _)| name.as_str())
    .collect()
}

fn render_mapper(
  descriptor: &ModelDescriptor,
  decl: &EntityDecl,
  ctx: &WriteContext<'_>,
) -> anyhow::Result<TokenStream> {
  let mapper_trait = descriptor.mapper_trait();
  let mapper_name = TypeNameToken::from_normalized(&naming::default_mapper_name(
    descriptor.domain_type().as_str(),
  ));
  let domain = descriptor.domain_type();
  let detail = descriptor.payload_type(PayloadRole::Detail);
  let summary = descriptor.payload_type(PayloadRole::Summary);
  let create = descriptor.payload_type(PayloadRole::Create);
  let update = descriptor.payload_type(PayloadRole::Update);

  let views = field_views(descriptor, decl, ctx)?;
  let detail_set = role_names(decl, PayloadRole::Detail);
  let summary_set = role_names(decl, PayloadRole::Summary);
  let create_set = role_names(decl, PayloadRole::Create);
  let update_set = role_names(decl, PayloadRole::Update);

  let clone_inits = |set: &BTreeSet<&str>| -> Vec<TokenStream> {
    views
      .iter()
      .filter(|view| set.contains(view.raw))
      .map(|view| {
        let name = &view.name;
        if is_copy_ty(&view.ty) {
          quote!(#name: entity.#name,)
        } else {
          quote!(#name: entity.#name.clone(),)
        }
      })
      .collect()
  };
  let detail_inits = clone_inits(&detail_set);
  let summary_inits = clone_inits(&summary_set);

  let create_inits: Vec<TokenStream> = views
    .iter()
    .map(|view| {
      let name = &view.name;
      if create_set.contains(view.raw) {
        quote!(#name: payload.#name,)
      } else {
        quote!(#name: Default::default(),)
      }
    })
    .collect();
  let create_param = if create_set.is_empty() {
    format_ident!("_payload")
  } else {
    format_ident!("payload")
  };

  let update_inits: Vec<TokenStream> = views
    .iter()
    .map(|view| {
      let name = &view.name;
      if !update_set.contains(view.raw) {
        quote!(#name: current.#name,)
      } else if view.ty.nullable {
        quote!(#name: payload.#name.or(current.#name),)
      } else {
        quote!(#name: payload.#name.unwrap_or(current.#name),)
      }
    })
    .collect();

  // Fields carrying access roles stay out of the export surface.
  let columns: Vec<&FieldView<'_>> = views
    .iter()
    .filter(|view| {
      detail_set.contains(view.raw)
        && !view.relation
        && !view.restricted
        && !view.ty.is_array
        && !matches!(view.ty.base_type, RustPrimitive::Bytes | RustPrimitive::Unit)
    })
    .collect();
  let headers = columns.iter().map(|view| {
    let label = view.raw;
    quote!(#label.to_string(),)
  });
  let cells = columns.iter().map(|view| {
    let name = &view.name;
    if view.ty.nullable {
      quote!(entity.#name.as_ref().map(ToString::to_string).unwrap_or_default(),)
    } else {
      quote!(entity.#name.to_string(),)
    }
  });
  let row_param = if columns.is_empty() {
    format_ident!("_entity")
  } else {
    format_ident!("entity")
  };

  let mut docs = vec![format!(
    "Field-by-field `{mapper_trait}`. Adjust where the defaults fall short."
  )];
  if let Some(hook) = &descriptor.security.field_handler {
    docs.push(format!("Field-level redaction expects the `{hook}` hook on every read view."));
  }
  Ok(quote! {
    #(#[doc = #docs])*
    #[derive(Debug, Clone, Copy, Default)]
    pub struct #mapper_name;

    impl #mapper_trait for #mapper_name {
      fn to_detail(&self, entity: &#domain) -> #detail {
        #detail {
          #(#detail_inits)*
        }
      }

      fn to_summary(&self, entity: &#domain) -> #summary {
        #summary {
          #(#summary_inits)*
        }
      }

      fn from_create(&self, #create_param: #create) -> #domain {
        #domain {
          #(#create_inits)*
        }
      }

      fn apply_update(&self, current: #domain, payload: #update) -> #domain {
        #domain {
          #(#update_inits)*
        }
      }

      fn export_header(&self) -> Vec<String> {
        vec![#(#headers)*]
      }

      fn export_row(&self, #row_param: &#domain) -> Vec<String> {
        vec![#(#cells)*]
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    generator::{
      descriptor::{DescriptorParser, ExtractorRegistry},
      endpoint::{EndpointTag, resolve_endpoints},
      metrics::GenerationStats,
    },
    manifest::{Manifest, RelationGraph, loader::manifest_from_yaml},
  };

  const MANIFEST: &str = "
name: shop
entities:
  Pet:
    template: full
    fields:
      id: { type: i64, id: true }
      name: { type: string, searchable: true }
      status: { type: string, optional: true, searchable: true }
      owner:
        type: string
        relation: { target: Owner, cardinality: one, owned: true }
  Owner:
    fields:
      id: { type: uuid, id: true }
      email: { type: string }
";

  fn render(manifest: &Manifest, entity: &str) -> String {
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry)
      .parse(entity, manifest, &mut stats)
      .unwrap();
    let relations = RelationGraph::analyze(manifest);
    let resolved = resolve_endpoints(&descriptor, manifest).unwrap();
    let ctx = WriteContext {
      manifest,
      relations: &relations,
      resolved: &resolved,
    };
    let mut artifacts = StubsWriter.write(&descriptor, &ctx).unwrap();
    let artifact = artifacts.pop().unwrap();
    assert_eq!(artifact.kind, ArtifactKind::EditableStub);
    artifact.contents
  }

  #[test]
  fn stub_is_marked_editable() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Pet");
    let head = code.lines().next().unwrap();
    assert!(head.contains(crudgen_support::EDITABLE_MARKER));
  }

  #[test]
  fn integer_ids_are_assigned_sequentially() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains("pub struct InMemoryPetRepository {"));
    assert!(code.contains("records: Mutex<BTreeMap<i64, Pet>>,"));
    assert!(code.contains("let id = records.keys().max().copied().unwrap_or_default() + 1;"));
    assert!(code.contains("entity.id = id;"));
  }

  #[test]
  fn uuid_ids_are_randomly_assigned() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Owner");
    assert!(code.contains("records: Mutex<BTreeMap<uuid::Uuid, Owner>>,"));
    assert!(code.contains("let id = uuid::Uuid::new_v4();"));
  }

  #[test]
  fn search_filters_each_searchable_field() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains("async fn search("));
    assert!(code.contains(".is_none_or(|value| &entity.name == value)"));
    assert!(code.contains(".is_none_or(|value| entity.status.as_ref() == Some(value))"));
  }

  #[test]
  fn default_mapper_moves_fields_role_by_role() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains("pub struct DefaultPetMapper;"));
    // Create payloads never carry the id or owned embeds.
    assert!(code.contains("id: Default::default(),"));
    assert!(code.contains("owner: Default::default(),"));
    assert!(code.contains("name: payload.name,"));
    // Updates keep current values where the payload is silent.
    assert!(code.contains("name: payload.name.unwrap_or(current.name),"));
    assert!(code.contains("status: payload.status.or(current.status),"));
    assert!(code.contains("owner: current.owner,"));
  }

  #[test]
  fn export_skips_embeds_and_stringifies_options() {
    let manifest = manifest_from_yaml(MANIFEST).unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains(r#"vec!["id".to_string(), "name".to_string(), "status".to_string()]"#));
    assert!(code.contains("entity.id.to_string(),"));
    assert!(code.contains("entity.status.as_ref().map(ToString::to_string).unwrap_or_default(),"));
    assert!(!code.contains("entity.owner.to_string()"));
  }

  #[test]
  fn role_restricted_fields_stay_out_of_exports() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    fields:
      id: { type: i64, id: true }
      name: { type: string }
      microchip: { type: string, roles: [staff] }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains(r#"vec!["id".to_string(), "name".to_string()]"#));
    assert!(!code.contains(r#""microchip".to_string()"#));
    // The restricted field still reaches the read payloads.
    assert!(code.contains("microchip: entity.microchip.clone(),"));
  }

  #[test]
  fn security_hooks_surface_in_stub_docs() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    security:
      row_handler: tenant_scope
      field_handler: redact_pii
    fields:
      id: { type: i64, id: true }
      name: { type: string }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");
    assert!(code.contains("Row-level filtering expects the `tenant_scope` hook on every query."));
    assert!(code.contains("Field-level redaction expects the `redact_pii` hook on every read view."));
  }

  #[test]
  fn disabled_stubs_are_skipped() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    editable_stubs: false
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let registry = ExtractorRegistry::standard();
    let mut stats = GenerationStats::default();
    let descriptor = DescriptorParser::new(&registry)
      .parse("Pet", &manifest, &mut stats)
      .unwrap();
    let relations = RelationGraph::analyze(&manifest);
    let resolved = std::collections::BTreeSet::from([EndpointTag::GetOne]);
    let ctx = WriteContext {
      manifest: &manifest,
      relations: &relations,
      resolved: &resolved,
    };
    assert!(!StubsWriter.applies(&descriptor, &ctx));
  }
}
