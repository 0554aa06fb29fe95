//! Endpoint tags, the built-in catalog, and per-entity endpoint resolution.

mod catalog;
mod resolve;
mod spec;
mod tags;

pub use catalog::{catalog, spec_for};
pub use resolve::resolve_endpoints;
pub use spec::{BodyFn, EndpointSpec, ParamFn, ReturnFn, SecurityFn};
pub use tags::{EndpointTag, EndpointTemplate, GuardAction};
