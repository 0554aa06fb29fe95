// @crudgen:editable
// Written once as a starting point. This file is yours to edit.

use std::collections::BTreeMap;
use std::sync::Mutex;
use crudgen_support::{Page, PageRequest};
use super::dto::*;
use super::mapper::PetMapper;
use super::repository::{PetRepository, RepoError};
///`BTreeMap`-backed `PetRepository` for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryPetRepository {
    records: Mutex<BTreeMap<i64, Pet>>,
}
impl PetRepository for InMemoryPetRepository {
    async fn find_by_id(&self, id: &i64) -> Result<Option<Pet>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.get(id).cloned())
    }
    async fn list_all(&self) -> Result<Vec<Pet>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records.values().cloned().collect())
    }
    async fn list_page(&self, page: &PageRequest) -> Result<Page<Pet>, RepoError> {
        let records = self.records.lock().expect("lock poisoned");
        let total = records.len() as u64;
        let items = records
            .values()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, page, total))
    }
    async fn insert(&self, mut entity: Pet) -> Result<Pet, RepoError> {
        let mut records = self.records.lock().expect("lock poisoned");
        let id = records.keys().max().copied().unwrap_or_default() + 1;
        entity.id = id;
        records.insert(id, entity.clone());
        Ok(entity)
    }
    async fn replace(
        &self,
        id: &i64,
        mut entity: Pet,
    ) -> Result<Option<Pet>, RepoError> {
        let mut records = self.records.lock().expect("lock poisoned");
        if !records.contains_key(id) {
            return Ok(None);
        }
        entity.id = *id;
        records.insert(*id, entity.clone());
        Ok(Some(entity))
    }
    async fn remove(&self, id: &i64) -> Result<bool, RepoError> {
        let mut records = self.records.lock().expect("lock poisoned");
        Ok(records.remove(id).is_some())
    }
}
///Field-by-field `PetMapper`. Adjust where the defaults fall short.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPetMapper;
impl PetMapper for DefaultPetMapper {
    fn to_detail(&self, entity: &Pet) -> PetDetail {
        PetDetail {
            id: entity.id,
            name: entity.name.clone(),
            status: entity.status.clone(),
            adopted_on: entity.adopted_on.clone(),
            owner: entity.owner,
        }
    }
    fn to_summary(&self, entity: &Pet) -> PetSummary {
        PetSummary {
            id: entity.id,
            name: entity.name.clone(),
            status: entity.status.clone(),
            adopted_on: entity.adopted_on.clone(),
            owner: entity.owner,
        }
    }
    fn from_create(&self, payload: PetCreate) -> Pet {
        Pet {
            id: Default::default(),
            name: payload.name,
            status: payload.status,
            adopted_on: payload.adopted_on,
            owner: payload.owner,
        }
    }
    fn apply_update(&self, current: Pet, payload: PetUpdate) -> Pet {
        Pet {
            id: payload.id.unwrap_or(current.id),
            name: payload.name.unwrap_or(current.name),
            status: payload.status.or(current.status),
            adopted_on: payload.adopted_on.or(current.adopted_on),
            owner: payload.owner.unwrap_or(current.owner),
        }
    }
    fn export_header(&self) -> Vec<String> {
        vec![
            "id".to_string(),
            "name".to_string(),
            "status".to_string(),
            "adopted_on".to_string(),
        ]
    }
    fn export_row(&self, entity: &Pet) -> Vec<String> {
        vec![
            entity.id.to_string(),
            entity.name.to_string(),
            entity.status.as_ref().map(ToString::to_string).unwrap_or_default(),
            entity.adopted_on.as_ref().map(ToString::to_string).unwrap_or_default(),
        ]
    }
}
