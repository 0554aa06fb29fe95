use strum::Display;

use crate::generator::writers::{Artifact, ArtifactKind};

/// Counters and diagnostics accumulated across one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub descriptors_parsed: usize,
  pub entities_failed: usize,
  pub endpoints_resolved: usize,
  pub methods_composed: usize,
  pub artifacts_emitted: usize,
  pub editable_stubs: usize,
  pub relation_cycles: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub diagnostics: Vec<Diagnostic>,
}

impl GenerationStats {
  pub fn record_descriptor(&mut self) {
    self.descriptors_parsed += 1;
  }

  pub fn record_entity_failure(&mut self) {
    self.entities_failed += 1;
  }

  pub fn record_endpoints(&mut self, count: usize) {
    self.endpoints_resolved += count;
    self.methods_composed += count;
  }

  pub fn record_artifact(&mut self, artifact: &Artifact) {
    self.artifacts_emitted += 1;
    if artifact.kind == ArtifactKind::EditableStub {
      self.editable_stubs += 1;
    }
  }

  pub fn record_artifacts(&mut self, artifacts: &[Artifact]) {
    for artifact in artifacts {
      self.record_artifact(artifact);
    }
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.relation_cycles += 1;
    self
      .diagnostics
      .push(Diagnostic::RelationCycle { path: cycle.join(" -> ") });
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: impl IntoIterator<Item = Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_diagnostic(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  /// True when at least one entity was skipped. The pass itself still
  /// succeeds; callers decide how loudly to report.
  #[must_use]
  pub fn has_failures(&self) -> bool {
    self.entities_failed > 0
  }

  pub fn failures(&self) -> impl Iterator<Item = &Diagnostic> {
    self.diagnostics.iter().filter(|d| d.is_failure())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Diagnostic {
  #[strum(to_string = "parsing entity '{entity}'")]
  ParsingEntity { entity: String },
  #[strum(to_string = "entity '{entity}' skipped: {error}")]
  EntityFailed { entity: String, error: String },
  #[strum(to_string = "entity '{entity}': {message}")]
  EntityNote { entity: String, message: String },
  #[strum(to_string = "relation cycle [{path}]: single-valued embeds are boxed")]
  RelationCycle { path: String },
}

impl Diagnostic {
  #[must_use]
  pub fn is_failure(&self) -> bool {
    matches!(self, Self::EntityFailed { .. })
  }
}
