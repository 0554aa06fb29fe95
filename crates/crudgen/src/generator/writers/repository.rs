//! Repository trait rendering.
//!
//! The trait surface is derived from the resolved endpoint set, so a module
//! only demands the persistence operations its handlers actually call.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;

use super::{Artifact, ArtifactKind, ArtifactWriter, WriteContext, has_repository};
use crate::generator::{codegen, descriptor::ModelDescriptor, endpoint::EndpointTag};

/// Persistence operations a handler body can call, in trait declaration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum RepoMethod {
  FindById,
  FindByIds,
  ListAll,
  ListPage,
  Search,
  Exists,
  Count,
  Insert,
  InsertBatch,
  Replace,
  Remove,
  RemoveBatch,
}

/// The repository methods demanded by a resolved endpoint set.
pub(crate) fn required_methods(resolved: &BTreeSet<EndpointTag>) -> BTreeSet<RepoMethod> {
  let mut methods = BTreeSet::new();
  for tag in resolved {
    match tag {
      EndpointTag::GetOne => {
        methods.insert(RepoMethod::FindById);
      }
      EndpointTag::GetAll | EndpointTag::Export => {
        methods.insert(RepoMethod::ListAll);
      }
      EndpointTag::GetPage => {
        methods.insert(RepoMethod::ListPage);
      }
      EndpointTag::Post => {
        methods.insert(RepoMethod::Insert);
      }
      EndpointTag::Put => {
        methods.insert(RepoMethod::Replace);
      }
      EndpointTag::Patch | EndpointTag::PutBatch | EndpointTag::PatchBatch => {
        methods.extend([RepoMethod::FindById, RepoMethod::Replace]);
      }
      EndpointTag::Delete => {
        methods.insert(RepoMethod::Remove);
      }
      EndpointTag::PostBatch => {
        methods.insert(RepoMethod::InsertBatch);
      }
      EndpointTag::DeleteBatch | EndpointTag::DeleteByIds => {
        methods.insert(RepoMethod::RemoveBatch);
      }
      EndpointTag::FindByIds => {
        methods.insert(RepoMethod::FindByIds);
      }
      EndpointTag::Exists => {
        methods.insert(RepoMethod::Exists);
      }
      EndpointTag::Count => {
        methods.insert(RepoMethod::Count);
      }
      EndpointTag::Search => {
        methods.insert(RepoMethod::Search);
      }
      EndpointTag::Validate => {}
    }
  }
  methods
}

/// Whether a method's signature mentions the domain record.
fn mentions_domain(method: RepoMethod) -> bool {
  !matches!(
    method,
    RepoMethod::Remove | RepoMethod::RemoveBatch | RepoMethod::Exists | RepoMethod::Count
  )
}

/// Renders `repository.rs`: the error alias and the per-entity trait.
pub struct RepositoryWriter;

impl ArtifactWriter for RepositoryWriter {
  fn name(&self) -> &'static str {
    "repository"
  }

  fn applies(&self, _descriptor: &ModelDescriptor, ctx: &WriteContext<'_>) -> bool {
    has_repository(ctx.resolved)
  }

  fn write(
    &self,
    descriptor: &ModelDescriptor,
    ctx: &WriteContext<'_>,
  ) -> anyhow::Result<Vec<Artifact>> {
    let methods = required_methods(ctx.resolved);
    let trait_name = descriptor.repository_trait();
    let domain = descriptor.domain_type();
    let entity_doc = format!(
      "Persistence surface for `{domain}`, scoped to the generated endpoints."
    );

    let needs_page = methods.contains(&RepoMethod::ListPage) || methods.contains(&RepoMethod::Search);
    let page_import = needs_page.then(|| quote! { use crudgen_support::{Page, PageRequest}; });
    let domain_import = methods
      .iter()
      .any(|method| mentions_domain(*method))
      .then(|| quote! { use super::dto::#domain; });
    let filter_import = methods.contains(&RepoMethod::Search).then(|| {
      let filter = descriptor.filter_type();
      quote! { use super::query::#filter; }
    });

    let signatures = methods
      .iter()
      .map(|method| trait_method(*method, descriptor));

    let contents = codegen::render_file(
      ArtifactKind::Generated,
      quote! {
        use std::future::Future;

        #page_import
        #domain_import
        #filter_import

        /// Error type repository implementations report through.
        pub type RepoError = Box<dyn std::error::Error + Send + Sync + 'static>;

        #[doc = #entity_doc]
        pub trait #trait_name {
          #(#signatures)*
        }
      },
    )?;
    Ok(vec![Artifact::new(
      format!("{}/repository.rs", descriptor.module()),
      ArtifactKind::Generated,
      contents,
    )])
  }
}

fn trait_method(method: RepoMethod, descriptor: &ModelDescriptor) -> TokenStream {
  let id_ty = descriptor.id_ty();
  let domain = descriptor.domain_type();
  match method {
    RepoMethod::FindById => quote! {
      fn find_by_id(&self, id: &#id_ty) -> impl Future<Output = Result<Option<#domain>, RepoError>> + Send;
    },
    RepoMethod::FindByIds => quote! {
      /// Loads the records whose ids appear in `ids`. Missing ids are
      /// skipped, not errors.
      fn find_by_ids(&self, ids: &[#id_ty]) -> impl Future<Output = Result<Vec<#domain>, RepoError>> + Send;
    },
    RepoMethod::ListAll => quote! {
      fn list_all(&self) -> impl Future<Output = Result<Vec<#domain>, RepoError>> + Send;
    },
    RepoMethod::ListPage => quote! {
      fn list_page(&self, page: &PageRequest) -> impl Future<Output = Result<Page<#domain>, RepoError>> + Send;
    },
    RepoMethod::Search => {
      let filter = descriptor.filter_type();
      quote! {
        /// Conjunctive filtered listing over the searchable fields.
        fn search(&self, filter: &#filter, page: &PageRequest) -> impl Future<Output = Result<Page<#domain>, RepoError>> + Send;
      }
    }
    RepoMethod::Exists => quote! {
      fn exists(&self, id: &#id_ty) -> impl Future<Output = Result<bool, RepoError>> + Send;
    },
    RepoMethod::Count => quote! {
      fn count(&self) -> impl Future<Output = Result<u64, RepoError>> + Send;
    },
    RepoMethod::Insert => quote! {
      /// Stores a new record and returns it with its assigned id.
      fn insert(&self, entity: #domain) -> impl Future<Output = Result<#domain, RepoError>> + Send;
    },
    RepoMethod::InsertBatch => quote! {
      fn insert_batch(&self, entities: Vec<#domain>) -> impl Future<Output = Result<Vec<#domain>, RepoError>> + Send;
    },
    RepoMethod::Replace => quote! {
      /// Replaces the record at `id`, returning `None` when it does not
      /// exist.
      fn replace(&self, id: &#id_ty, entity: #domain) -> impl Future<Output = Result<Option<#domain>, RepoError>> + Send;
    },
    RepoMethod::Remove => quote! {
      fn remove(&self, id: &#id_ty) -> impl Future<Output = Result<bool, RepoError>> + Send;
    },
    RepoMethod::RemoveBatch => quote! {
      /// Removes every listed id that exists; absent ids are ignored.
      fn remove_batch(&self, ids: &[#id_ty]) -> impl Future<Output = Result<(), RepoError>> + Send;
    },
  }
}
