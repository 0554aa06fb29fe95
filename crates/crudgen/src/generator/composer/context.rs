use anyhow::bail;

use crate::generator::{
  ast::HandlerMethodDef,
  descriptor::ModelDescriptor,
  endpoint::EndpointSpec,
};

/// Progress marker for one method composition.
///
/// Stages only ever move forward. A component that would move the context
/// sideways or backwards is a broken pipeline, not a bad manifest, and fails
/// the composition outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ComposeStage {
  Skeleton,
  Routed,
  Documented,
  Parameterized,
  Guarded,
  Shaped,
  Complete,
}

/// Mutable state threaded through the component pipeline for one method.
pub struct BuildContext<'a> {
  pub spec: &'a EndpointSpec,
  pub descriptor: &'a ModelDescriptor,
  pub method: HandlerMethodDef,
  stage: ComposeStage,
}

impl<'a> BuildContext<'a> {
  /// Starts a composition with the named skeleton already in place.
  #[must_use]
  pub fn new(spec: &'a EndpointSpec, descriptor: &'a ModelDescriptor) -> Self {
    Self {
      spec,
      descriptor,
      method: HandlerMethodDef::new(spec.tag, spec.method_name),
      stage: ComposeStage::Skeleton,
    }
  }

  #[must_use]
  pub fn stage(&self) -> ComposeStage {
    self.stage
  }

  pub fn advance_to(&mut self, stage: ComposeStage) -> anyhow::Result<()> {
    if stage <= self.stage {
      bail!("composition cannot move from `{}` to `{stage}`", self.stage);
    }
    self.stage = stage;
    Ok(())
  }

  pub fn into_method(self) -> anyhow::Result<HandlerMethodDef> {
    if self.stage != ComposeStage::Complete {
      bail!("composition of `{}` stopped at `{}`", self.method.name, self.stage);
    }
    Ok(self.method)
  }
}
