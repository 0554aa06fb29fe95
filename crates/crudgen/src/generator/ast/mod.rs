mod derives;
mod documentation;
pub mod tokens;
mod types;
mod validation;

use std::collections::BTreeSet;

pub use derives::{DeriveTrait, default_payload_derives, derive_attr};
pub use documentation::Documentation;
use http::Method;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
pub use tokens::{DefaultAtom, FieldNameToken, MethodNameToken, ModuleToken, TypeNameToken};
pub use types::{RustPrimitive, TypeRef};
pub use validation::{ValidationRule, validate_attr};

use crate::generator::endpoint::EndpointTag;

/// HTTP binding for a generated handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
  pub verb: Method,
  pub path: String,
}

impl RouteDef {
  pub fn new(verb: Method, path: impl Into<String>) -> Self {
    Self {
      verb,
      path: path.into(),
    }
  }
}

/// Access requirement attached to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardExpr {
  /// No check is emitted.
  Allow,
  /// The request must carry this grant.
  Require(String),
}

impl GuardExpr {
  #[must_use]
  pub fn is_allow(&self) -> bool {
    matches!(self, GuardExpr::Allow)
  }
}

impl std::fmt::Display for GuardExpr {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      GuardExpr::Allow => write!(f, "open"),
      GuardExpr::Require(grant) => write!(f, "requires `{grant}`"),
    }
  }
}

/// How a handler parameter is extracted from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ParamBinding {
  Path,
  Query,
  Json,
  Extension,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct HandlerParam {
  #[builder(into)]
  pub name: FieldNameToken,
  pub binding: ParamBinding,
  pub ty: TypeRef,
}

/// Response shape of a generated handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
  Json(TypeRef),
  /// `201 Created` with a JSON body.
  Created(TypeRef),
  /// `Json<Page<T>>`
  Page(TypeRef),
  NoContent,
  /// `text/csv` or similar raw text payloads.
  Text,
}

/// Handler body tokens with structural equality on the rendered form.
#[derive(Debug, Clone, Default)]
pub struct BodyTokens(pub TokenStream);

impl BodyTokens {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl PartialEq for BodyTokens {
  fn eq(&self, other: &Self) -> bool {
    self.0.to_string() == other.0.to_string()
  }
}

impl Eq for BodyTokens {}

impl From<TokenStream> for BodyTokens {
  fn from(tokens: TokenStream) -> Self {
    Self(tokens)
  }
}

impl ToTokens for BodyTokens {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    tokens.extend(self.0.clone());
  }
}

/// One fully composed controller method, accumulated stage by stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMethodDef {
  pub tag: EndpointTag,
  pub name: MethodNameToken,
  pub docs: Documentation,
  pub route: Option<RouteDef>,
  pub params: Vec<HandlerParam>,
  pub guard: Option<GuardExpr>,
  pub ret: Option<ReturnShape>,
  pub body: BodyTokens,
}

impl HandlerMethodDef {
  pub fn new(tag: EndpointTag, name: impl Into<MethodNameToken>) -> Self {
    Self {
      tag,
      name: name.into(),
      docs: Documentation::default(),
      route: None,
      params: Vec::new(),
      guard: None,
      ret: None,
      body: BodyTokens::default(),
    }
  }
}

/// Identifier accessor rendered as a `HasId` impl on a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAccessor {
  pub field: FieldNameToken,
  pub ty: TypeRef,
  /// Whether the field itself is `Option<Id>` rather than `Id`.
  pub optional: bool,
}

/// Rust struct field definition for a generated payload.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct PayloadFieldDef {
  #[builder(into)]
  pub name: FieldNameToken,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub ty: TypeRef,
  #[builder(default)]
  pub validations: Vec<ValidationRule>,
}

/// Rust struct definition for a generated payload or domain record.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct PayloadDef {
  #[builder(into)]
  pub name: TypeNameToken,
  #[builder(default)]
  pub docs: Documentation,
  #[builder(default)]
  pub fields: Vec<PayloadFieldDef>,
  #[builder(default)]
  pub derives: BTreeSet<DeriveTrait>,
  pub id_accessor: Option<IdAccessor>,
}

impl PayloadDef {
  #[must_use]
  pub fn has_validations(&self) -> bool {
    self.fields.iter().any(|f| !f.validations.is_empty())
  }
}

impl ToTokens for PayloadDef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let docs = &self.docs;
    let derive = derive_attr(&self.derives);
    let name = &self.name;
    let fields = self.fields.iter().map(|field| {
      let field_docs = &field.docs;
      let field_name = &field.name;
      let ty = &field.ty;
      let validations = (!field.validations.is_empty()).then(|| validate_attr(&field.validations));
      quote! {
        #field_docs
        #validations
        pub #field_name: #ty,
      }
    });

    tokens.extend(quote! {
      #docs
      #derive
      pub struct #name {
        #(#fields)*
      }
    });

    if let Some(accessor) = &self.id_accessor {
      let field = &accessor.field;
      let ty = &accessor.ty;
      let body = if accessor.optional {
        quote! { self.#field.as_ref() }
      } else {
        quote! { Some(&self.#field) }
      };
      tokens.extend(quote! {
        impl crudgen_support::HasId for #name {
          type Id = #ty;

          fn id(&self) -> Option<&#ty> {
            #body
          }
        }
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payloads_render_fields_and_id_accessors() {
    let def = PayloadDef::builder()
      .name("PetUpdate")
      .fields(vec![
        PayloadFieldDef::builder()
          .name("id")
          .ty(TypeRef::parse("i64").with_option())
          .build(),
        PayloadFieldDef::builder()
          .name("name")
          .ty(TypeRef::parse("string").with_option())
          .validations(vec![ValidationRule::Length { min: Some(1), max: Some(50) }])
          .build(),
      ])
      .derives(default_payload_derives())
      .id_accessor(IdAccessor {
        field: "id".into(),
        ty: TypeRef::parse("i64"),
        optional: true,
      })
      .build();

    let code = def.to_token_stream().to_string();
    assert!(code.contains("pub struct PetUpdate"));
    assert!(code.contains("pub id : Option < i64 >"));
    assert!(code.contains("validate"));
    assert!(code.contains("impl crudgen_support :: HasId for PetUpdate"));
    assert!(code.contains("self . id . as_ref ()"));
  }

  #[test]
  fn guard_expressions_display_for_docs() {
    assert_eq!(GuardExpr::Allow.to_string(), "open");
    assert_eq!(GuardExpr::Require("pet:read".into()).to_string(), "requires `pet:read`");
  }
}
