use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde_json::Number;

/// A validation attribute from the `validator` crate, attached to generated
/// payload fields that carry manifest constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
  Length { min: Option<u64>, max: Option<u64> },
  Range { min: Option<Number>, max: Option<Number> },
}

impl ToTokens for ValidationRule {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let attr = match self {
      Self::Length { min, max } => {
        let mut parts = vec![];
        if let Some(m) = min {
          let lit: TokenStream = m.to_string().parse().unwrap();
          parts.push(quote! { min = #lit });
        }
        if let Some(m) = max {
          let lit: TokenStream = m.to_string().parse().unwrap();
          parts.push(quote! { max = #lit });
        }
        quote! { length(#(#parts),*) }
      }
      Self::Range { min, max } => {
        let mut parts = vec![];
        if let Some(m) = min {
          let lit: TokenStream = m.to_string().parse().unwrap();
          parts.push(quote! { min = #lit });
        }
        if let Some(m) = max {
          let lit: TokenStream = m.to_string().parse().unwrap();
          parts.push(quote! { max = #lit });
        }
        quote! { range(#(#parts),*) }
      }
    };
    tokens.extend(attr);
  }
}

/// Renders `#[validate(...)]` for a rule list, or nothing when empty.
pub fn validate_attr(rules: &[ValidationRule]) -> TokenStream {
  if rules.is_empty() {
    return TokenStream::new();
  }
  quote! { #[validate(#(#rules),*)] }
}
