//! Final rendering of generated token streams into formatted source files.

use anyhow::Context;
use proc_macro2::TokenStream;

use crate::generator::writers::ArtifactKind;

/// Banner stamped onto files the next pass overwrites.
pub const GENERATED_BANNER: &str = "// Generated by crudgen. Do not edit; regenerate instead.";

/// The first line of editable stubs. The emitter and the reconciler both key
/// off [`crudgen_support::EDITABLE_MARKER`] appearing in the file head.
#[must_use]
pub fn banner(kind: ArtifactKind) -> String {
  match kind {
    ArtifactKind::Generated => GENERATED_BANNER.to_owned(),
    ArtifactKind::EditableStub => format!(
      "// {}\n// Written once as a starting point. This file is yours to edit.",
      crudgen_support::EDITABLE_MARKER
    ),
  }
}

/// Parses and pretty-prints a rendered module, prepending the banner for its
/// kind. Rejecting unparsable output here keeps malformed code from ever
/// reaching disk.
pub fn render_file(kind: ArtifactKind, tokens: TokenStream) -> anyhow::Result<String> {
  let file: syn::File =
    syn::parse2(tokens).context("generated tokens do not parse as a Rust file")?;
  Ok(format!("{}\n\n{}", banner(kind), prettyplease::unparse(&file)))
}
