use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "crudgen")]
#[command(author, version, about = "Entity manifest to CRUD module generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information derived from an entity manifest
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate CRUD modules from an entity manifest
  Generate(GenerateCommand),
  /// Move editable stubs out of a generated tree into the source tree
  Reconcile(ReconcileCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the entity manifest (YAML or JSON)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated modules are written into
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Adopt editable stubs into this source root after emitting
  #[arg(long, value_name = "DIR")]
  pub source_root: Option<PathBuf>,

  /// Generate only these entities (comma-separated)
  #[arg(long, value_name = "ENTITIES", value_delimiter = ',')]
  pub only: Option<Vec<String>>,

  /// Skip these entities (comma-separated)
  #[arg(long, value_name = "ENTITIES", value_delimiter = ',')]
  pub exclude: Option<Vec<String>>,

  /// Enable verbose output with per-file detail
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ReconcileCommand {
  /// Root a previous generate pass wrote into
  #[arg(short, long, value_name = "DIR")]
  pub generated: PathBuf,

  /// Permanent source root that adopts the stubs
  #[arg(short, long, value_name = "DIR")]
  pub source: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every endpoint the manifest resolves, entity by entity
  Endpoints {
    /// Path to the entity manifest (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
