// Generated by crudgen. Do not edit; regenerate instead.

use std::future::Future;
use crudgen_support::{Page, PageRequest};
use super::dto::Pet;
/// Error type repository implementations report through.
pub type RepoError = Box<dyn std::error::Error + Send + Sync + 'static>;
///Persistence surface for `Pet`, scoped to the generated endpoints.
pub trait PetRepository {
    fn find_by_id(
        &self,
        id: &i64,
    ) -> impl Future<Output = Result<Option<Pet>, RepoError>> + Send;
    fn list_all(&self) -> impl Future<Output = Result<Vec<Pet>, RepoError>> + Send;
    fn list_page(
        &self,
        page: &PageRequest,
    ) -> impl Future<Output = Result<Page<Pet>, RepoError>> + Send;
    /// Stores a new record and returns it with its assigned id.
    fn insert(&self, entity: Pet) -> impl Future<Output = Result<Pet, RepoError>> + Send;
    /// Replaces the record at `id`, returning `None` when it does not
    /// exist.
    fn replace(
        &self,
        id: &i64,
        entity: Pet,
    ) -> impl Future<Output = Result<Option<Pet>, RepoError>> + Send;
    fn remove(&self, id: &i64) -> impl Future<Output = Result<bool, RepoError>> + Send;
}
