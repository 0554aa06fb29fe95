use std::fmt::{Display, Formatter};

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident};
pub use string_cache::DefaultAtom;

use crate::reserved::{to_rust_field_name, to_rust_module_name, to_rust_type_name};

/// Defines an interned identifier newtype that normalizes its input on
/// construction and renders as a Rust identifier in generated code.
macro_rules! ident_token {
  ($(#[$meta:meta])* $name:ident, $normalize:path) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $name(pub DefaultAtom);

    impl $name {
      #[must_use]
      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self {
        $name(DefaultAtom::from($normalize(s)))
      }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self {
        Self::from(s.as_str())
      }
    }

    impl Display for $name {
      fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
      }
    }

    impl ToTokens for $name {
      fn to_tokens(&self, tokens: &mut TokenStream) {
        // format_ident handles the r# prefix that keyword collisions produce.
        format_ident!("{}", self.0.as_ref()).to_tokens(tokens);
      }
    }
  };
}

ident_token!(
  /// PascalCase type name, e.g. `PetSummary`.
  TypeNameToken,
  to_rust_type_name
);

ident_token!(
  /// snake_case field name, raw-prefixed when it collides with a keyword.
  FieldNameToken,
  to_rust_field_name
);

ident_token!(
  /// snake_case method name.
  MethodNameToken,
  to_rust_field_name
);

ident_token!(
  /// snake_case module name, safe to use as a file name.
  ModuleToken,
  to_rust_module_name
);

impl TypeNameToken {
  /// Bypasses normalization for names assembled from already-normalized
  /// parts, e.g. `PetSummary`.
  #[must_use]
  pub fn from_normalized(name: &str) -> Self {
    Self(DefaultAtom::from(name))
  }
}

#[cfg(test)]
mod tests {
  use quote::quote;

  use super::*;

  #[test]
  fn tokens_normalize_on_construction() {
    assert_eq!(TypeNameToken::from("order-item").as_str(), "OrderItem");
    assert_eq!(FieldNameToken::from("Order Date").as_str(), "order_date");
    assert_eq!(MethodNameToken::from("GetAll").as_str(), "get_all");
    assert_eq!(ModuleToken::from("OrderItem").as_str(), "order_item");
  }

  #[test]
  fn keyword_fields_render_as_raw_identifiers() {
    let field = FieldNameToken::from("type");
    assert_eq!(field.as_str(), "r#type");

    let tokens = quote! { #field };
    assert_eq!(tokens.to_string(), "r#type");
  }

  #[test]
  fn from_normalized_keeps_composed_names() {
    let name = TypeNameToken::from_normalized("PetSummary");
    assert_eq!(name.as_str(), "PetSummary");
  }
}
