use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use crate::reserved::to_rust_type_name;

/// Type reference with wrapper support (Box, Option, Vec)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRef {
  pub base_type: RustPrimitive,
  pub boxed: bool,
  pub nullable: bool,
  pub is_array: bool,
}

impl TypeRef {
  pub fn new(base_type: impl Into<RustPrimitive>) -> Self {
    Self {
      base_type: base_type.into(),
      boxed: false,
      nullable: false,
      is_array: false,
    }
  }

  /// Parses a manifest type spelling such as `string`, `i64`, or `Money`.
  #[must_use]
  pub fn parse(spelling: &str) -> Self {
    Self::new(RustPrimitive::parse(spelling))
  }

  /// A reference to a generated type by its already-normalized name.
  #[must_use]
  pub fn named(name: &str) -> Self {
    Self::new(RustPrimitive::Custom(name.to_string()))
  }

  #[must_use]
  pub fn unit() -> Self {
    Self::new(RustPrimitive::Unit)
  }

  #[must_use]
  pub fn with_option(mut self) -> Self {
    self.nullable = true;
    self
  }

  #[must_use]
  pub fn with_vec(mut self) -> Self {
    self.is_array = true;
    self
  }

  #[must_use]
  pub fn with_boxed(mut self) -> Self {
    self.boxed = true;
    self
  }

  /// Get the full Rust type string
  #[must_use]
  pub fn to_rust_type(&self) -> String {
    let mut result = self.base_type.to_string();

    if self.boxed {
      result = format!("Box<{result}>");
    }

    if self.is_array {
      result = format!("Vec<{result}>");
    }

    if self.nullable {
      result = format!("Option<{result}>");
    }

    result
  }
}

impl From<RustPrimitive> for TypeRef {
  fn from(primitive: RustPrimitive) -> Self {
    TypeRef::new(primitive)
  }
}

impl ToTokens for TypeRef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let mut ty = self.base_type.to_token_stream();

    if self.boxed {
      ty = quote! { Box<#ty> };
    }

    if self.is_array {
      ty = quote! { Vec<#ty> };
    }

    if self.nullable {
      ty = quote! { Option<#ty> };
    }

    tokens.extend(ty);
  }
}

/// Rust primitive and standard library types addressable from a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RustPrimitive {
  I8,
  I16,
  I32,
  I64,
  U8,
  U16,
  U32,
  U64,
  F32,
  F64,
  Bool,
  #[default]
  String,
  Bytes,
  Date,
  DateTime,
  Time,
  Uuid,
  Value,
  Unit,
  Custom(String),
}

impl RustPrimitive {
  /// Maps a manifest spelling onto a primitive. Unknown spellings become
  /// custom type names after identifier normalization, so user-defined
  /// domain types pass through.
  #[must_use]
  pub fn parse(spelling: &str) -> Self {
    match spelling.trim() {
      "string" | "str" | "text" => Self::String,
      "i8" => Self::I8,
      "i16" => Self::I16,
      "i32" | "int" => Self::I32,
      "i64" | "long" => Self::I64,
      "u8" => Self::U8,
      "u16" => Self::U16,
      "u32" => Self::U32,
      "u64" => Self::U64,
      "f32" => Self::F32,
      "f64" | "float" | "double" => Self::F64,
      "bool" | "boolean" => Self::Bool,
      "bytes" => Self::Bytes,
      "date" => Self::Date,
      "datetime" | "timestamp" => Self::DateTime,
      "time" => Self::Time,
      "uuid" => Self::Uuid,
      "json" | "value" => Self::Value,
      other => Self::Custom(to_rust_type_name(other)),
    }
  }

  #[must_use]
  pub fn is_float(&self) -> bool {
    matches!(self, RustPrimitive::F32 | RustPrimitive::F64)
  }

  #[must_use]
  pub fn is_integer(&self) -> bool {
    matches!(
      self,
      RustPrimitive::I8
        | RustPrimitive::I16
        | RustPrimitive::I32
        | RustPrimitive::I64
        | RustPrimitive::U8
        | RustPrimitive::U16
        | RustPrimitive::U32
        | RustPrimitive::U64
    )
  }

  /// True for types cheap enough to pass by value in generated signatures.
  #[must_use]
  pub fn is_copy(&self) -> bool {
    self.is_integer() || self.is_float() || matches!(self, RustPrimitive::Bool | RustPrimitive::Uuid)
  }
}

impl std::fmt::Display for RustPrimitive {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      RustPrimitive::I8 => "i8",
      RustPrimitive::I16 => "i16",
      RustPrimitive::I32 => "i32",
      RustPrimitive::I64 => "i64",
      RustPrimitive::U8 => "u8",
      RustPrimitive::U16 => "u16",
      RustPrimitive::U32 => "u32",
      RustPrimitive::U64 => "u64",
      RustPrimitive::F32 => "f32",
      RustPrimitive::F64 => "f64",
      RustPrimitive::Bool => "bool",
      RustPrimitive::String => "String",
      RustPrimitive::Bytes => "Vec<u8>",
      RustPrimitive::Date => "chrono::NaiveDate",
      RustPrimitive::DateTime => "chrono::DateTime<chrono::Utc>",
      RustPrimitive::Time => "chrono::NaiveTime",
      RustPrimitive::Uuid => "uuid::Uuid",
      RustPrimitive::Value => "serde_json::Value",
      RustPrimitive::Unit => "()",
      RustPrimitive::Custom(name) => name,
    };
    write!(f, "{s}")
  }
}

impl ToTokens for RustPrimitive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ty = match self {
      RustPrimitive::I8 => quote! { i8 },
      RustPrimitive::I16 => quote! { i16 },
      RustPrimitive::I32 => quote! { i32 },
      RustPrimitive::I64 => quote! { i64 },
      RustPrimitive::U8 => quote! { u8 },
      RustPrimitive::U16 => quote! { u16 },
      RustPrimitive::U32 => quote! { u32 },
      RustPrimitive::U64 => quote! { u64 },
      RustPrimitive::F32 => quote! { f32 },
      RustPrimitive::F64 => quote! { f64 },
      RustPrimitive::Bool => quote! { bool },
      RustPrimitive::String => quote! { String },
      RustPrimitive::Bytes => quote! { Vec<u8> },
      RustPrimitive::Date => quote! { chrono::NaiveDate },
      RustPrimitive::DateTime => quote! { chrono::DateTime<chrono::Utc> },
      RustPrimitive::Time => quote! { chrono::NaiveTime },
      RustPrimitive::Uuid => quote! { uuid::Uuid },
      RustPrimitive::Value => quote! { serde_json::Value },
      RustPrimitive::Unit => quote! { () },
      RustPrimitive::Custom(name) => {
        let ident = format_ident!("{name}");
        quote! { #ident }
      }
    };
    tokens.extend(ty);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn manifest_spellings_map_to_primitives() {
    assert_eq!(RustPrimitive::parse("string"), RustPrimitive::String);
    assert_eq!(RustPrimitive::parse("i64"), RustPrimitive::I64);
    assert_eq!(RustPrimitive::parse("boolean"), RustPrimitive::Bool);
    assert_eq!(RustPrimitive::parse("datetime"), RustPrimitive::DateTime);
    assert_eq!(
      RustPrimitive::parse("money-amount"),
      RustPrimitive::Custom("MoneyAmount".to_string())
    );
  }

  #[test]
  fn wrappers_nest_in_declaration_order() {
    let ty = TypeRef::parse("string").with_vec().with_option();
    assert_eq!(ty.to_rust_type(), "Option<Vec<String>>");

    let boxed = TypeRef::named("PetSummary").with_boxed();
    assert_eq!(boxed.to_rust_type(), "Box<PetSummary>");
  }

  #[test]
  fn tokens_match_type_strings() {
    let ty = TypeRef::parse("datetime").with_option();
    assert_eq!(
      ty.to_token_stream().to_string().replace(' ', ""),
      "Option<chrono::DateTime<chrono::Utc>>"
    );
  }

  #[test]
  fn copy_detection() {
    assert!(RustPrimitive::parse("i32").is_copy());
    assert!(RustPrimitive::parse("uuid").is_copy());
    assert!(!RustPrimitive::parse("string").is_copy());
    assert!(!RustPrimitive::parse("Money").is_copy());
  }
}
