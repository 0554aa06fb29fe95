use std::collections::BTreeSet;

/// Marker string stamped into the banner of every user-editable stub.
///
/// The generator writes stub files once and never overwrites a file whose
/// banner carries this marker. The reconciler uses the same marker to decide
/// which files migrate from the generated tree into the source tree.
pub const EDITABLE_MARKER: &str = "@crudgen:editable";

/// Access to the primary identifier of a generated payload type.
///
/// Batch mutation payloads implement this so server code can address each
/// element without reflective field lookups. `None` means the payload has no
/// identifier yet, which is the normal state for create-shaped payloads.
pub trait HasId {
  type Id;

  fn id(&self) -> Option<&Self::Id>;
}

/// Pagination window requested by a client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageRequest {
  pub page: u64,
  pub size: u64,
  pub sort: Option<String>,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self {
      page: 0,
      size: 20,
      sort: None,
    }
  }
}

impl PageRequest {
  /// Zero-based offset of the first item in the requested window.
  #[inline]
  #[must_use]
  pub fn offset(&self) -> u64 {
    self.page.saturating_mul(self.size)
  }
}

/// One page of results together with the paging envelope.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: u64,
  pub size: u64,
  pub total: u64,
}

impl<T> Page<T> {
  #[must_use]
  pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
    Self {
      items,
      page: request.page,
      size: request.size,
      total,
    }
  }

  #[must_use]
  pub fn empty(request: &PageRequest) -> Self {
    Self::new(Vec::new(), request, 0)
  }

  /// Number of pages needed to cover `total` items at the current size.
  #[must_use]
  pub fn total_pages(&self) -> u64 {
    if self.size == 0 {
      return 0;
    }
    self.total.div_ceil(self.size)
  }

  /// Maps the items while keeping the paging envelope intact. Generated
  /// handlers use this to turn a page of domain values into a page of
  /// payloads.
  #[must_use]
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      page: self.page,
      size: self.size,
      total: self.total,
    }
  }
}

/// The set of grants attached to the current request.
///
/// Applications construct one per request (typically from their auth layer)
/// and make it available to generated handlers through an axum `Extension`.
/// A grant is an opaque string such as `pet:read`; a trailing `*` segment
/// grants every action on the prefix, and the single grant `*` grants
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Access {
  grants: BTreeSet<String>,
}

impl Access {
  #[must_use]
  pub fn new(grants: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      grants: grants.into_iter().map(Into::into).collect(),
    }
  }

  /// An access value that satisfies every requirement.
  #[must_use]
  pub fn allow_all() -> Self {
    Self::new(["*"])
  }

  #[must_use]
  pub fn allows(&self, required: &str) -> bool {
    if self.grants.contains(required) || self.grants.contains("*") {
      return true;
    }
    // `pet:*` covers `pet:read`, `pet:write`, and so on.
    required
      .rsplit_once(':')
      .is_some_and(|(prefix, _)| self.grants.contains(&format!("{prefix}:*")))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
  #[error("access denied: missing grant `{0}`")]
  Denied(String),
}

/// Fails with [`AccessError::Denied`] unless `access` carries the grant.
pub fn require(access: &Access, grant: &str) -> Result<(), AccessError> {
  if access.allows(grant) {
    Ok(())
  } else {
    Err(AccessError::Denied(grant.to_string()))
  }
}
