use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    emitter::{self, EmitSummary},
    metrics::GenerationStats,
    orchestrator::{Orchestrator, PassOptions},
  },
  manifest::ManifestLoader,
  reconcile::{ReconcileReport, reconcile},
  ui::{Colors, GenerateCommand},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub source_root: Option<PathBuf>,
  pub options: PassOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  #[must_use]
  pub fn from_command(command: GenerateCommand) -> Self {
    let GenerateCommand {
      input,
      output,
      source_root,
      only,
      exclude,
      verbose,
      quiet,
    } = command;

    Self {
      input,
      output,
      source_root,
      options: PassOptions {
        only: only.unwrap_or_default(),
        exclude: exclude.unwrap_or_default(),
      },
      verbose,
      quiet,
    }
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<22} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading manifest from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating CRUD modules...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Entities described:", stats.descriptors_parsed.to_string());
    self.stat("Endpoints resolved:", stats.endpoints_resolved.to_string());
    self.stat("Files rendered:", stats.artifacts_emitted.to_string());
    if stats.editable_stubs > 0 {
      self.stat("", format!("{} editable stubs", stats.editable_stubs));
    }
    self.print_cycles(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.relation_cycles == 0 {
      return;
    }

    self.stat("Relation cycles:", stats.relation_cycles.to_string());
    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_failures(&self, stats: &GenerationStats) {
    if !stats.has_failures() {
      return;
    }

    println!();
    for failure in stats.failures() {
      eprintln!(
        "{} {}",
        "Skipped:".with(self.colors.accent()),
        format!("{failure}").with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_emission(&self, summary: &EmitSummary) {
    if self.config.quiet {
      return;
    }

    self.stat("Files written:", summary.files_written().to_string());
    if !summary.skipped_stubs.is_empty() {
      self.stat("", format!("{} stubs already on disk", summary.skipped_stubs.len()));
    }
    if self.config.verbose {
      for path in &summary.written {
        println!("              {}", path.display().to_string().with(self.colors.info()));
      }
    }
  }

  fn print_reconcile(&self, report: &ReconcileReport) {
    if self.config.quiet {
      return;
    }

    self.stat("Stubs adopted:", report.adopted.len().to_string());
    if !report.discarded.is_empty() {
      self.stat("", format!("{} already owned by the source tree", report.discarded.len()));
    }
  }

  fn log_success(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    let message = if stats.has_failures() {
      format!(
        "Generated with {} skipped {}",
        stats.entities_failed,
        if stats.entities_failed == 1 { "entity" } else { "entities" }
      )
    } else {
      "Successfully generated CRUD modules".to_string()
    };
    println!();
    println!(
      "{} {}",
      format_timestamp().with(self.colors.timestamp()),
      message.with(self.colors.success())
    );
  }
}

pub async fn generate_modules(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let manifest = ManifestLoader::open(&config.input).await?.parse()?;

  logger.log_generating();
  let output = Orchestrator::standard().run(&manifest, &config.options)?;
  logger.print_statistics(&output.stats);

  logger.log_writing();
  let summary = emitter::emit(&config.output, &output.artifacts).await?;
  logger.print_emission(&summary);

  if let Some(source_root) = &config.source_root {
    let report = reconcile(&config.output, source_root)?;
    logger.print_reconcile(&report);
  }

  logger.print_failures(&output.stats);
  logger.log_success(&output.stats);
  Ok(())
}
