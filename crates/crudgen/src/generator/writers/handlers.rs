//! Handler module rendering: the service trait, the error surface, one
//! handler per resolved endpoint, and the router that mounts them.

use anyhow::Context;
use proc_macro2::TokenStream;
use quote::quote;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext, has_repository};
use crate::generator::{
  ast::{GuardExpr, HandlerMethodDef, HandlerParam, ParamBinding, ReturnShape},
  codegen,
  composer::MethodComposer,
  descriptor::ModelDescriptor,
  endpoint::{EndpointTag, catalog},
};

/// Renders `handlers.rs` for every module with at least one resolved
/// endpoint.
pub struct HandlersWriter;

impl ArtifactWriter for HandlersWriter {
  fn name(&self) -> &'static str {
    "handlers"
  }

  fn applies(&self, _descriptor: &ModelDescriptor, ctx: &WriteContext<'_>) -> bool {
    !ctx.resolved.is_empty()
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let composer = MethodComposer::standard();
    let methods = catalog()
      .iter()
      .filter(|spec| ctx.resolved.contains(&spec.tag))
      .map(|spec| composer.compose(spec, descriptor))
      .collect::<anyhow::Result<Vec<_>>>()?;

    let usage = Usage::scan(&methods, ctx);
    let has_repo = has_repository(ctx.resolved);

    let imports = render_imports(descriptor, ctx, &usage, has_repo);
    let service = render_service_trait(descriptor, has_repo);
    let errors = render_error_surface(&usage, has_repo);
    let handlers = methods
      .iter()
      .map(|method| render_method(descriptor, method))
      .collect::<anyhow::Result<Vec<_>>>()?;
    let router = render_router(descriptor, &methods)?;

    let contents = codegen::render_file(
      ArtifactKind::Generated,
      quote! {
        #imports
        #service
        #errors
        #(#handlers)*
        #router
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/handlers.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}

/// Which imports and helpers the composed methods actually touch. Keeps the
/// emitted file free of unused-import warnings.
#[derive(Default)]
struct Usage {
  path: bool,
  query: bool,
  json: bool,
  extension: bool,
  page: bool,
  access: bool,
  has_id: bool,
  validate: bool,
  invalid: bool,
}

impl Usage {
  fn scan(methods: &[HandlerMethodDef], ctx: &WriteContext<'_>) -> Self {
    let mut usage = Usage::default();
    for method in methods {
      for param in &method.params {
        match param.binding {
          ParamBinding::Path => usage.path = true,
          ParamBinding::Query => usage.query = true,
          ParamBinding::Json => usage.json = true,
          ParamBinding::Extension => usage.extension = true,
        }
      }
      usage.access |= matches!(method.guard, Some(GuardExpr::Require(_)));
      match method.ret {
        Some(ReturnShape::Json(_)) | Some(ReturnShape::Created(_)) => usage.json = true,
        Some(ReturnShape::Page(_)) => {
          usage.json = true;
          usage.page = true;
        }
        _ => {}
      }
    }
    usage.has_id = ctx.resolved.iter().any(|tag| {
      matches!(
        tag,
        EndpointTag::PutBatch | EndpointTag::PatchBatch | EndpointTag::DeleteBatch
      )
    });
    usage.validate = ctx.resolved.iter().any(|tag| {
      matches!(
        tag,
        EndpointTag::Post
          | EndpointTag::Put
          | EndpointTag::Patch
          | EndpointTag::PostBatch
          | EndpointTag::PutBatch
          | EndpointTag::PatchBatch
          | EndpointTag::Validate
      )
    });
    // The validate endpoint reports violations instead of failing, so it
    // never calls the `invalid` helper.
    usage.invalid = ctx.resolved.iter().any(|tag| {
      matches!(
        tag,
        EndpointTag::Post
          | EndpointTag::Put
          | EndpointTag::Patch
          | EndpointTag::PostBatch
          | EndpointTag::PutBatch
          | EndpointTag::PatchBatch
      )
    });
    usage
  }
}

fn render_imports(
  descriptor: &ModelDescriptor,
  ctx: &WriteContext<'_>,
  usage: &Usage,
  has_repo: bool,
) -> TokenStream {
  let mut extract_items = Vec::new();
  if usage.extension {
    extract_items.push(quote!(Extension));
  }
  if usage.path {
    extract_items.push(quote!(Path));
  }
  if usage.query {
    extract_items.push(quote!(Query));
  }
  extract_items.push(quote!(State));
  let json_item = usage.json.then(|| quote!(Json,));

  let mut support_items = Vec::new();
  if usage.access {
    support_items.push(quote!(Access));
  }
  if usage.has_id {
    support_items.push(quote!(HasId));
  }
  if usage.page {
    support_items.push(quote!(Page));
  }
  if usage.query {
    support_items.push(quote!(PageRequest));
  }
  let support_import =
    (!support_items.is_empty()).then(|| quote! { use crudgen_support::{#(#support_items),*}; });
  let validate_import = usage.validate.then(|| quote! { use validator::Validate; });

  let mapper_trait = descriptor.mapper_trait();
  let repo_import = has_repo.then(|| {
    let repo_trait = descriptor.repository_trait();
    quote! { use super::repository::#repo_trait; }
  });
  let query_import = ctx.resolved.contains(&EndpointTag::Search).then(|| {
    let filter = descriptor.filter_type();
    quote! { use super::query::#filter; }
  });

  quote! {
    use std::sync::Arc;

    use axum::{
      #json_item Router,
      extract::{#(#extract_items),*},
      http::StatusCode,
      response::{IntoResponse, Response},
    };
    #support_import
    #validate_import

    use super::dto::*;
    use super::mapper::#mapper_trait;
    #query_import
    #repo_import
  }
}

fn render_service_trait(descriptor: &ModelDescriptor, has_repo: bool) -> TokenStream {
  let service_trait = descriptor.service_trait();
  let mapper_trait = descriptor.mapper_trait();
  let bounds = if has_repo {
    let repo_trait = descriptor.repository_trait();
    quote!(#repo_trait + #mapper_trait)
  } else {
    quote!(#mapper_trait)
  };
  let doc = format!(
    "Everything the `{}` handlers need from shared state, in one bound.",
    descriptor.module()
  );
  quote! {
    #[doc = #doc]
    pub trait #service_trait: #bounds + Send + Sync + 'static {}

    impl<T> #service_trait for T where T: #bounds + Send + Sync + 'static {}
  }
}

fn render_error_surface(usage: &Usage, has_repo: bool) -> TokenStream {
  let internal_helper = has_repo.then(|| {
    quote! {
      fn internal<E: std::fmt::Display>(err: E) -> ApiError {
        ApiError::Internal(err.to_string())
      }
    }
  });
  let invalid_helper = usage.invalid.then(|| {
    quote! {
      fn invalid<E: std::fmt::Display>(err: E) -> ApiError {
        ApiError::Invalid(err.to_string())
      }
    }
  });

  quote! {
    /// Error surface every generated handler returns.
    #[derive(Debug)]
    pub enum ApiError {
      NotFound,
      AccessDenied,
      Invalid(String),
      Internal(String),
    }

    impl IntoResponse for ApiError {
      fn into_response(self) -> Response {
        match self {
          ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
          ApiError::AccessDenied => StatusCode::FORBIDDEN.into_response(),
          ApiError::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, message).into_response(),
          ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
        }
      }
    }

    #internal_helper
    #invalid_helper
  }
}

fn render_method(
  descriptor: &ModelDescriptor,
  method: &HandlerMethodDef,
) -> anyhow::Result<TokenStream> {
  let service_trait = descriptor.service_trait();
  let docs = &method.docs;
  let name = &method.name;
  let params = method.params.iter().map(render_param);
  let ret = render_return(
    method
      .ret
      .as_ref()
      .with_context(|| format!("method `{name}` has no return shape"))?,
  );
  let guard = guard_line(method.guard.as_ref());
  let body = &method.body;
  anyhow::ensure!(!body.is_empty(), "method `{name}` has no body");

  Ok(quote! {
    #docs
    pub async fn #name<S: #service_trait>(
      State(service): State<Arc<S>>,
      #(#params),*
    ) -> #ret {
      #guard
      #body
    }
  })
}

fn render_param(param: &HandlerParam) -> TokenStream {
  let name = &param.name;
  let ty = &param.ty;
  match param.binding {
    ParamBinding::Path => quote! { Path(#name): Path<#ty> },
    ParamBinding::Query => quote! { Query(#name): Query<#ty> },
    ParamBinding::Json => quote! { Json(#name): Json<#ty> },
    ParamBinding::Extension => quote! { Extension(#name): Extension<#ty> },
  }
}

fn render_return(shape: &ReturnShape) -> TokenStream {
  match shape {
    ReturnShape::Json(ty) => quote!(Result<Json<#ty>, ApiError>),
    ReturnShape::Created(ty) => quote!(Result<(StatusCode, Json<#ty>), ApiError>),
    ReturnShape::Page(ty) => quote!(Result<Json<Page<#ty>>, ApiError>),
    ReturnShape::NoContent => quote!(Result<StatusCode, ApiError>),
    ReturnShape::Text => quote!(Result<Response, ApiError>),
  }
}

fn guard_line(guard: Option<&GuardExpr>) -> Option<TokenStream> {
  match guard {
    Some(GuardExpr::Require(grant)) => Some(quote! {
      crudgen_support::require(&access, #grant).map_err(|_| ApiError::AccessDenied)?;
    }),
    _ => None,
  }
}

fn render_router(
  descriptor: &ModelDescriptor,
  methods: &[HandlerMethodDef],
) -> anyhow::Result<TokenStream> {
  let service_trait = descriptor.service_trait();
  let routes = methods
    .iter()
    .map(|method| {
      let route = method
        .route
        .as_ref()
        .with_context(|| format!("method `{}` has no route", method.name))?;
      let path = &route.path;
      let name = &method.name;
      let register = match route.verb.as_str() {
        "GET" => quote!(get),
        "POST" => quote!(post),
        "PUT" => quote!(put),
        "PATCH" => quote!(patch),
        "DELETE" => quote!(delete),
        other => anyhow::bail!("no routing shorthand for `{other}`"),
      };
      Ok(quote! { .route(#path, axum::routing::#register(#name::<S>)) })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  let doc = format!(
    "Mounts every generated `{}` endpoint on a fresh router.",
    descriptor.module()
  );
  Ok(quote! {
    #[doc = #doc]
    pub fn routes<S: #service_trait>() -> Router<Arc<S>> {
      Router::new()
        #(#routes)*
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    generator::{
      descriptor::{DescriptorParser, ExtractorRegistry},
      endpoint::resolve_endpoints,
      metrics::GenerationStats,
    },
    manifest::{Manifest, RelationGraph, loader::manifest_from_yaml},
  };

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
    let mut artifacts = HandlersWriter.write(&descriptor, &ctx).unwrap();
    artifacts.pop().unwrap().contents
  }

  #[test]
  fn crud_module_renders_handlers_and_router() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: crud
    fields:
      id: { type: i64, id: true }
      name: { type: string }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("pub trait PetService: PetRepository + PetMapper + Send + Sync + 'static {}"));
    assert!(code.contains("pub async fn get_one<S: PetService>("));
    assert!(code.contains("Path(id): Path<i64>"));
    assert!(code.contains("Json(payload): Json<PetCreate>"));
    assert!(code.contains("pub fn routes<S: PetService>() -> Router<Arc<S>>"));
    assert!(code.contains(r#".route("/pets/{id}", axum::routing::get(get_one::<S>))"#));
    assert!(code.contains(r#".route("/pets", axum::routing::post(create::<S>))"#));
    assert!(code.contains("pub enum ApiError {"));
  }

  #[test]
  fn guarded_policies_emit_access_checks() {
    let manifest = manifest_from_yaml(
      "
name: shop
security_policies:
  locked: {}
entities:
  Pet:
    template: crud
    security: { policy: locked }
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("Extension(access): Extension<Access>"));
    assert!(code.contains(r#"crudgen_support::require(&access, "pet:read")"#));
    assert!(code.contains(r#"crudgen_support::require(&access, "pet:write")"#));
    assert!(code.contains(r#"crudgen_support::require(&access, "pet:delete")"#));
    assert!(code.contains(".map_err(|_| ApiError::AccessDenied)?;"));
  }

  #[test]
  fn permissive_modules_skip_access_plumbing() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: read-only
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(!code.contains("Extension"));
    assert!(!code.contains("crudgen_support::require"));
    assert!(!code.contains("validator::Validate"));
  }

  #[test]
  fn validate_only_module_needs_no_repository() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: bare
    endpoints: { include: [VALIDATE] }
    fields:
      id: { type: i64, id: true }
      name: { type: string }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("pub trait PetService: PetMapper + Send + Sync + 'static {}"));
    assert!(!code.contains("use super::repository::"));
    assert!(!code.contains("fn internal"));
    assert!(code.contains("use validator::Validate;"));
    assert!(code.contains(r#".route("/pets/validate", axum::routing::post(validate::<S>))"#));
  }

  #[test]
  fn export_returns_raw_text() {
    let manifest = manifest_from_yaml(
      "
name: shop
entities:
  Pet:
    template: bare
    endpoints: { include: [EXPORT] }
    fields:
      id: { type: i64, id: true }
",
    )
    .unwrap();
    let code = render(&manifest, "Pet");

    assert!(code.contains("pub async fn export<S: PetService>("));
    assert!(code.contains("-> Result<Response, ApiError>"));
    assert!(code.contains("text/csv; charset=utf-8"));
    // No JSON anywhere in a text-only module.
    assert!(!code.contains("Json"));
  }
}
