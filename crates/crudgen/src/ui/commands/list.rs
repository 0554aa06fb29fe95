use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Stylize;

use crate::{
  generator::orchestrator::{Orchestrator, PassOptions},
  manifest::ManifestLoader,
  ui::{Colors, colors::table_color, term_width},
};

/// Prints the endpoint plan: one row per (entity, resolved endpoint), in
/// declaration order then catalog order, without rendering any code.
pub async fn list_endpoints(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let manifest = ManifestLoader::open(input).await?.parse()?;
  let (rows, stats) = Orchestrator::standard().plan(&manifest, &PassOptions::default())?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["ENTITY", "ENDPOINT", "METHOD", "PATH", "HANDLER"] {
    header.add_cell(Cell::new(title).fg(table_color(colors.label())));
  }
  table.set_header(header);

  for planned in rows {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(planned.entity)
        .fg(table_color(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(planned.tag.to_string()).fg(table_color(colors.info())));
    row.add_cell(
      Cell::new(planned.verb.as_str())
        .fg(table_color(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(planned.path).fg(table_color(colors.primary())));
    row.add_cell(Cell::new(planned.method_name).fg(table_color(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  for failure in stats.failures() {
    eprintln!(
      "{} {}",
      "Skipped:".with(colors.accent()),
      format!("{failure}").with(colors.primary())
    );
  }

  Ok(())
}
