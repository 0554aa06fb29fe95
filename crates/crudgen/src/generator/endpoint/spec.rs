use proc_macro2::TokenStream;

use super::tags::EndpointTag;
use crate::generator::{
  ast::{GuardExpr, HandlerParam, ReturnShape},
  descriptor::ModelDescriptor,
};

/// Produces the guard for a tag under the descriptor's table policy.
pub type SecurityFn = fn(&ModelDescriptor) -> GuardExpr;

/// Produces the response shape for a tag.
pub type ReturnFn = fn(&ModelDescriptor) -> ReturnShape;

/// Produces one handler parameter for a tag.
pub type ParamFn = fn(&ModelDescriptor) -> HandlerParam;

/// Produces the statements between guard check and response.
pub type BodyFn = fn(&ModelDescriptor) -> TokenStream;

/// One catalog entry: everything needed to compose the controller method for
/// a tag, expressed entity-independently through descriptor-driven factories.
///
/// Parameter builders run in declaration order, which is also the order the
/// generated handler lists its arguments in. Body-consuming parameters must
/// therefore come last.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
  pub tag: EndpointTag,
  pub method_name: &'static str,
  pub security: SecurityFn,
  pub return_shape: ReturnFn,
  pub params: &'static [ParamFn],
  pub body: BodyFn,
}
