use http::Method;

use super::{ComposeComponent, context::{BuildContext, ComposeStage}};
use crate::generator::{
  ast::{GuardExpr, HandlerParam, ParamBinding, RouteDef, TypeRef},
  descriptor::ModelDescriptor,
  endpoint::EndpointTag,
};

/// Canonical route for a tag on a given entity.
pub fn route_for(tag: EndpointTag, descriptor: &ModelDescriptor) -> RouteDef {
  let base = descriptor.route_base();
  match tag {
    EndpointTag::GetOne => RouteDef::new(Method::GET, format!("/{base}/{{id}}")),
    EndpointTag::GetAll => RouteDef::new(Method::GET, format!("/{base}/all")),
    EndpointTag::GetPage => RouteDef::new(Method::GET, format!("/{base}")),
    EndpointTag::Post => RouteDef::new(Method::POST, format!("/{base}")),
    EndpointTag::Put => RouteDef::new(Method::PUT, format!("/{base}/{{id}}")),
    EndpointTag::Patch => RouteDef::new(Method::PATCH, format!("/{base}/{{id}}")),
    EndpointTag::Delete => RouteDef::new(Method::DELETE, format!("/{base}/{{id}}")),
    EndpointTag::PostBatch => RouteDef::new(Method::POST, format!("/{base}/batch")),
    EndpointTag::PutBatch => RouteDef::new(Method::PUT, format!("/{base}/batch")),
    EndpointTag::PatchBatch => RouteDef::new(Method::PATCH, format!("/{base}/batch")),
    EndpointTag::DeleteBatch => RouteDef::new(Method::DELETE, format!("/{base}/batch")),
    EndpointTag::DeleteByIds => RouteDef::new(Method::DELETE, format!("/{base}/by-ids")),
    EndpointTag::FindByIds => RouteDef::new(Method::POST, format!("/{base}/by-ids")),
    EndpointTag::Exists => RouteDef::new(Method::GET, format!("/{base}/{{id}}/exists")),
    EndpointTag::Count => RouteDef::new(Method::GET, format!("/{base}/count")),
    EndpointTag::Search => RouteDef::new(Method::POST, format!("/{base}/search")),
    EndpointTag::Validate => RouteDef::new(Method::POST, format!("/{base}/validate")),
    EndpointTag::Export => RouteDef::new(Method::GET, format!("/{base}/export")),
  }
}

/// Binds the HTTP verb and path.
pub struct RouteComponent;

impl ComposeComponent for RouteComponent {
  fn name(&self) -> &'static str {
    "route"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Routed
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    ctx.method.route = Some(route_for(ctx.spec.tag, ctx.descriptor));
    Ok(())
  }
}

/// Writes the baseline doc comment.
pub struct DocComponent;

impl ComposeComponent for DocComponent {
  fn name(&self) -> &'static str {
    "doc"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Documented
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    if let Some(route) = &ctx.method.route {
      ctx.method.docs.push(format!("Handles `{} {}`.", route.verb, route.path));
    }
    Ok(())
  }
}

/// Runs the catalog entry's parameter builders in declaration order.
pub struct ParamComponent;

impl ComposeComponent for ParamComponent {
  fn name(&self) -> &'static str {
    "param"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Parameterized
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    for build in ctx.spec.params {
      let param = build(ctx.descriptor);
      ctx.method.params.push(param);
    }
    Ok(())
  }
}

/// Resolves the guard and, when one applies, injects the access extension
/// ahead of any body-consuming parameter.
pub struct SecurityComponent;

impl ComposeComponent for SecurityComponent {
  fn name(&self) -> &'static str {
    "security"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Guarded
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    let guard = if ctx.descriptor.flags.secure {
      (ctx.spec.security)(ctx.descriptor)
    } else {
      GuardExpr::Allow
    };

    if let GuardExpr::Require(grant) = &guard {
      let access = HandlerParam::builder()
        .name("access")
        .binding(ParamBinding::Extension)
        .ty(TypeRef::named("Access"))
        .build();
      let at = ctx
        .method
        .params
        .iter()
        .position(|p| p.binding == ParamBinding::Json)
        .unwrap_or(ctx.method.params.len());
      ctx.method.params.insert(at, access);
      ctx.method.docs.push(format!("Requires the `{grant}` grant."));
    }

    ctx.method.guard = Some(guard);
    Ok(())
  }
}

/// Fixes the response shape.
pub struct ReturnComponent;

impl ComposeComponent for ReturnComponent {
  fn name(&self) -> &'static str {
    "return"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Shaped
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    ctx.method.ret = Some((ctx.spec.return_shape)(ctx.descriptor));
    Ok(())
  }
}

/// Renders the body statements and completes the method.
pub struct BodyComponent;

impl ComposeComponent for BodyComponent {
  fn name(&self) -> &'static str {
    "body"
  }

  fn stage(&self) -> ComposeStage {
    ComposeStage::Complete
  }

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()> {
    ctx.method.body = (ctx.spec.body)(ctx.descriptor).into();
    Ok(())
  }
}
