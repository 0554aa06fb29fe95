use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  #[must_use]
  pub fn from_raw(input: &str) -> Self {
    Self {
      lines: input.replace("\\n", "\n").lines().map(String::from).collect(),
    }
  }

  #[must_use]
  pub fn from_optional(desc: Option<&String>) -> Self {
    desc.map_or_else(Self::default, |d| Self::from_raw(d))
  }

  #[must_use]
  pub fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      lines: lines.into_iter().map(Into::into).collect(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn push(&mut self, line: impl Into<String>) {
    self.lines.push(line.into());
  }

  pub fn extend(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
    self.lines.extend(lines.into_iter().map(Into::into));
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    if self.lines.is_empty() {
      return;
    }
    let doc_lines: Vec<TokenStream> = self.lines.iter().map(|line| quote! { #[doc = #line] }).collect();
    quote! { #(#doc_lines)* }.to_tokens(tokens);
  }
}

impl From<&str> for Documentation {
  fn from(s: &str) -> Self {
    Self::from_raw(s)
  }
}

impl From<String> for Documentation {
  fn from(s: String) -> Self {
    Self::from_raw(&s)
  }
}

impl From<Option<&String>> for Documentation {
  fn from(s: Option<&String>) -> Self {
    Self::from_optional(s)
  }
}

impl<S: Into<String>> FromIterator<S> for Documentation {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self::from_lines(iter)
  }
}

impl std::fmt::Display for Documentation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for line in &self.lines {
      writeln!(f, "{line}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use quote::quote;

  use super::*;

  #[test]
  fn empty_documentation_produces_no_tokens() {
    let doc = Documentation::default();
    let tokens = quote! { #doc };
    assert!(tokens.is_empty());
  }

  #[test]
  fn multi_line_documentation() {
    let doc = Documentation::from_lines(["Line 1", "Line 2"]);
    let tokens = quote! { #doc };
    let expected = quote! {
      #[doc = "Line 1"]
      #[doc = "Line 2"]
    };
    assert_eq!(tokens.to_string(), expected.to_string());
  }

  #[test]
  fn from_raw_splits_newlines() {
    let doc = Documentation::from_raw("Line 1\nLine 2");
    assert_eq!(doc.lines(), &["Line 1", "Line 2"]);

    let escaped = Documentation::from_raw("Line 1\\nLine 2");
    assert_eq!(escaped.lines(), &["Line 1", "Line 2"]);
  }

  #[test]
  fn from_optional_none_produces_empty() {
    assert!(Documentation::from_optional(None).is_empty());
  }
}
