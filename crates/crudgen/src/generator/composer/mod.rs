//! Composition of controller methods.
//!
//! Every generated handler is assembled by an ordered list of components,
//! each responsible for one facet (route, docs, parameters, guard, return
//! shape, body). Components declare the [`ComposeStage`] they move the
//! context to, and the composer enforces forward-only progress so a
//! misassembled pipeline fails loudly instead of producing half-built
//! methods.

mod components;
mod context;

pub use components::{
  BodyComponent, DocComponent, ParamComponent, ReturnComponent, RouteComponent, SecurityComponent, route_for,
};
pub use context::{BuildContext, ComposeStage};

use anyhow::Context;

use crate::generator::{ast::HandlerMethodDef, descriptor::ModelDescriptor, endpoint::EndpointSpec};

/// One step of the composition pipeline.
pub trait ComposeComponent: Send + Sync {
  fn name(&self) -> &'static str;

  /// The stage the context reaches once this component has run.
  fn stage(&self) -> ComposeStage;

  fn apply(&self, ctx: &mut BuildContext<'_>) -> anyhow::Result<()>;
}

/// Drives an ordered component list over one endpoint spec at a time.
pub struct MethodComposer {
  components: Vec<Box<dyn ComposeComponent>>,
}

impl MethodComposer {
  /// The standard six-component pipeline.
  #[must_use]
  pub fn standard() -> Self {
    Self::with_components(vec![
      Box::new(RouteComponent),
      Box::new(DocComponent),
      Box::new(ParamComponent),
      Box::new(SecurityComponent),
      Box::new(ReturnComponent),
      Box::new(BodyComponent),
    ])
  }

  #[must_use]
  pub fn with_components(components: Vec<Box<dyn ComposeComponent>>) -> Self {
    Self { components }
  }

  pub fn compose(&self, spec: &EndpointSpec, descriptor: &ModelDescriptor) -> anyhow::Result<HandlerMethodDef> {
    let mut ctx = BuildContext::new(spec, descriptor);
    for component in &self.components {
      ctx
        .advance_to(component.stage())
        .with_context(|| format!("component `{}` composing `{}`", component.name(), spec.method_name))?;
      component
        .apply(&mut ctx)
        .with_context(|| format!("component `{}` composing `{}`", component.name(), spec.method_name))?;
    }
    ctx.into_method()
  }
}

impl Default for MethodComposer {
  fn default() -> Self {
    Self::standard()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::{
    ast::{GuardExpr, ParamBinding, ReturnShape, TypeRef},
    descriptor::{EndpointOptionsPart, FlagsPart, IdentityPart, SecurityPart, TablePolicy},
    endpoint::{EndpointTag, spec_for},
  };

  fn pet(policy: TablePolicy, secure: bool) -> ModelDescriptor {
    ModelDescriptor {
      identity: IdentityPart::builder()
        .entity("pet")
        .type_name("Pet".into())
        .module("pet".into())
        .id_field("id".into())
        .id_ty(TypeRef::parse("i64"))
        .build(),
      flags: FlagsPart { secure, ..FlagsPart::default() },
      endpoints: EndpointOptionsPart::default(),
      security: SecurityPart { policy, ..SecurityPart::default() },
    }
  }

  #[test]
  fn standard_pipeline_composes_get_one() {
    let descriptor = pet(TablePolicy::Permissive, true);
    let spec = spec_for(EndpointTag::GetOne).unwrap();
    let method = MethodComposer::standard().compose(spec, &descriptor).unwrap();

    assert_eq!(method.name.as_str(), "get_one");
    let route = method.route.unwrap();
    assert_eq!(route.verb, http::Method::GET);
    assert_eq!(route.path, "/pets/{id}");
    assert_eq!(method.params.len(), 1);
    assert_eq!(method.guard, Some(GuardExpr::Allow));
    assert_eq!(method.ret, Some(ReturnShape::Json(TypeRef::named("PetDetail"))));
    assert!(!method.body.is_empty());
    assert!(method.docs.lines()[0].contains("GET /pets/{id}"));
  }

  #[test]
  fn guarded_posts_check_grants_before_reading_the_body() {
    let descriptor = pet(TablePolicy::Guarded { read: None, write: None, delete: None }, true);
    let spec = spec_for(EndpointTag::Post).unwrap();
    let method = MethodComposer::standard().compose(spec, &descriptor).unwrap();

    assert_eq!(method.guard, Some(GuardExpr::Require("pet:write".into())));
    assert_eq!(method.params.len(), 2);
    assert_eq!(method.params[0].binding, ParamBinding::Extension);
    assert_eq!(method.params[1].binding, ParamBinding::Json);
    assert!(method.docs.lines().iter().any(|line| line.contains("pet:write")));
  }

  #[test]
  fn insecure_entities_never_guard() {
    let descriptor = pet(TablePolicy::Guarded { read: None, write: None, delete: None }, false);
    let spec = spec_for(EndpointTag::Delete).unwrap();
    let method = MethodComposer::standard().compose(spec, &descriptor).unwrap();

    assert_eq!(method.guard, Some(GuardExpr::Allow));
    assert!(method.params.iter().all(|param| param.binding != ParamBinding::Extension));
  }

  #[test]
  fn out_of_order_pipelines_are_rejected() {
    let descriptor = pet(TablePolicy::Permissive, true);
    let spec = spec_for(EndpointTag::Count).unwrap();
    let composer = MethodComposer::with_components(vec![Box::new(BodyComponent), Box::new(RouteComponent)]);

    let err = composer.compose(spec, &descriptor).unwrap_err();
    assert!(format!("{err:#}").contains("cannot move"));
  }

  #[test]
  fn incomplete_pipelines_are_rejected() {
    let descriptor = pet(TablePolicy::Permissive, true);
    let spec = spec_for(EndpointTag::Count).unwrap();
    let composer = MethodComposer::with_components(vec![Box::new(RouteComponent)]);

    let err = composer.compose(spec, &descriptor).unwrap_err();
    assert!(err.to_string().contains("stopped at"));
  }

  #[test]
  fn composition_is_deterministic() {
    let descriptor = pet(
      TablePolicy::Guarded { read: Some("pets:view".into()), write: None, delete: None },
      true,
    );
    let spec = spec_for(EndpointTag::Search).unwrap();
    let composer = MethodComposer::standard();

    let first = composer.compose(spec, &descriptor).unwrap();
    let second = composer.compose(spec, &descriptor).unwrap();
    assert_eq!(first, second);
  }
}
