use crossterm::style::Stylize;

use crate::{
  reconcile::reconcile,
  ui::{Colors, ReconcileCommand},
};

/// Runs the stub sweep standalone, for builds that generate and adopt in
/// separate steps.
pub fn reconcile_stubs(command: &ReconcileCommand, colors: &Colors) -> anyhow::Result<()> {
  let report = reconcile(&command.generated, &command.source)?;

  for path in &report.adopted {
    println!(
      "{} {}",
      "Adopted:".with(colors.success()),
      path.display().to_string().with(colors.primary())
    );
  }
  for path in &report.discarded {
    println!(
      "{} {}",
      "Kept yours:".with(colors.accent()),
      path.display().to_string().with(colors.primary())
    );
  }
  if report.is_empty() {
    println!("{}", "No editable stubs to adopt".with(colors.info()));
  }

  Ok(())
}
