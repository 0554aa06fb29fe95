use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use strum::Display;

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeriveTrait {
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  Default,
  #[strum(serialize = "serde::Serialize")]
  Serialize,
  #[strum(serialize = "serde::Deserialize")]
  Deserialize,
  #[strum(serialize = "validator::Validate")]
  Validate,
}

impl ToTokens for DeriveTrait {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let path: TokenStream = self.to_string().parse().unwrap();
    tokens.extend(path);
  }
}

pub fn default_payload_derives() -> BTreeSet<DeriveTrait> {
  [
    DeriveTrait::Debug,
    DeriveTrait::Clone,
    DeriveTrait::PartialEq,
    DeriveTrait::Serialize,
    DeriveTrait::Deserialize,
  ]
  .into_iter()
  .collect()
}

/// Renders the `#[derive(...)]` attribute for a trait set, or nothing when
/// the set is empty.
pub fn derive_attr(derives: &BTreeSet<DeriveTrait>) -> TokenStream {
  if derives.is_empty() {
    return TokenStream::new();
  }
  let paths = derives.iter();
  quote! { #[derive(#(#paths),*)] }
}
