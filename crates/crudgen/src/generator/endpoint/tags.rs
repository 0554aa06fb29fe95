use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::manifest::MarkerError;

/// Canonical identity of one generatable endpoint.
///
/// The catalog registers exactly one spec per tag; templates, include and
/// omit lists, and policies all speak in tags.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointTag {
  GetOne,
  GetAll,
  GetPage,
  Post,
  Put,
  Patch,
  Delete,
  PostBatch,
  PutBatch,
  PatchBatch,
  DeleteBatch,
  DeleteByIds,
  FindByIds,
  Exists,
  Count,
  Search,
  Validate,
  Export,
}

impl EndpointTag {
  pub const COUNT: usize = 18;

  /// Parses a manifest spelling. Tags are written `GET_ONE` canonically but
  /// `get_one` and `get-one` are accepted.
  pub fn parse_marker(entity: &str, spelling: &str) -> Result<Self, MarkerError> {
    Self::parse_lenient(spelling).ok_or_else(|| MarkerError::UnknownTag {
      entity: entity.to_string(),
      tag: spelling.to_string(),
    })
  }

  /// Lenient form used where unknown spellings are ignored rather than
  /// rejected, such as policy deny-lists.
  #[must_use]
  pub fn parse_lenient(spelling: &str) -> Option<Self> {
    let canonical = spelling.trim().replace('-', "_").to_ascii_uppercase();
    canonical.parse().ok()
  }

  /// The access action a guard for this endpoint checks.
  #[must_use]
  pub fn action(self) -> GuardAction {
    match self {
      Self::GetOne
      | Self::GetAll
      | Self::GetPage
      | Self::FindByIds
      | Self::Exists
      | Self::Count
      | Self::Search
      | Self::Export => GuardAction::Read,
      Self::Post | Self::Put | Self::Patch | Self::PostBatch | Self::PutBatch | Self::PatchBatch | Self::Validate => {
        GuardAction::Write
      }
      Self::Delete | Self::DeleteBatch | Self::DeleteByIds => GuardAction::Delete,
    }
  }
}

/// Action axis of the security model. Every tag maps onto exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GuardAction {
  Read,
  Write,
  Delete,
}

/// Named starting sets of tags. An entity's explicit include and omit lists
/// are applied on top of its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EndpointTemplate {
  /// Every catalog entry.
  #[default]
  Full,
  /// The seven classic single-record operations.
  Crud,
  /// Read-flavored endpoints only.
  ReadOnly,
  /// Nothing; endpoints are opted in one by one.
  Bare,
}

impl EndpointTemplate {
  pub fn parse_marker(entity: &str, spelling: &str) -> Result<Self, MarkerError> {
    spelling
      .trim()
      .parse()
      .map_err(|_| MarkerError::UnknownTemplate {
        entity: entity.to_string(),
        template: spelling.to_string(),
      })
  }

  #[must_use]
  pub fn tags(self) -> BTreeSet<EndpointTag> {
    match self {
      Self::Full => EndpointTag::iter().collect(),
      Self::Crud => [
        EndpointTag::GetOne,
        EndpointTag::GetAll,
        EndpointTag::GetPage,
        EndpointTag::Post,
        EndpointTag::Put,
        EndpointTag::Patch,
        EndpointTag::Delete,
      ]
      .into_iter()
      .collect(),
      Self::ReadOnly => [
        EndpointTag::GetOne,
        EndpointTag::GetAll,
        EndpointTag::GetPage,
        EndpointTag::FindByIds,
        EndpointTag::Exists,
        EndpointTag::Count,
        EndpointTag::Search,
        EndpointTag::Export,
      ]
      .into_iter()
      .collect(),
      Self::Bare => BTreeSet::new(),
    }
  }
}
