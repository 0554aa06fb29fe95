//! Behavioral tests over checked-in generator output for the petstore
//! manifest in `demos/`.

// Include the generated petstore module for testing
#[path = "../demos/petstore/mod.rs"]
mod petstore;

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use chrono::NaiveDate;
use crudgen_support::{HasId, Page, PageRequest};
use petstore::pet::{
  dto::*,
  handlers::{self, ApiError},
  mapper::PetMapper,
  repository::{PetRepository, RepoError},
  stubs::{DefaultPetMapper, InMemoryPetRepository},
};

/// Shared state wired the way an application would: the generated in-memory
/// repository stub plus the generated default mapper.
#[derive(Debug, Default)]
struct TestService {
  repo: InMemoryPetRepository,
  mapper: DefaultPetMapper,
}

impl PetRepository for TestService {
  async fn find_by_id(&self, id: &i64) -> Result<Option<Pet>, RepoError> {
    self.repo.find_by_id(id).await
  }

  async fn list_all(&self) -> Result<Vec<Pet>, RepoError> {
    self.repo.list_all().await
  }

  async fn list_page(&self, page: &PageRequest) -> Result<Page<Pet>, RepoError> {
    self.repo.list_page(page).await
  }

  async fn insert(&self, entity: Pet) -> Result<Pet, RepoError> {
    self.repo.insert(entity).await
  }

  async fn replace(&self, id: &i64, entity: Pet) -> Result<Option<Pet>, RepoError> {
    self.repo.replace(id, entity).await
  }

  async fn remove(&self, id: &i64) -> Result<bool, RepoError> {
    self.repo.remove(id).await
  }
}

impl PetMapper for TestService {
  fn to_detail(&self, entity: &Pet) -> PetDetail {
    self.mapper.to_detail(entity)
  }

  fn to_summary(&self, entity: &Pet) -> PetSummary {
    self.mapper.to_summary(entity)
  }

  fn from_create(&self, payload: PetCreate) -> Pet {
    self.mapper.from_create(payload)
  }

  fn apply_update(&self, current: Pet, payload: PetUpdate) -> Pet {
    self.mapper.apply_update(current, payload)
  }

  fn export_header(&self) -> Vec<String> {
    self.mapper.export_header()
  }

  fn export_row(&self, entity: &Pet) -> Vec<String> {
    self.mapper.export_row(entity)
  }
}

fn state(service: &Arc<TestService>) -> State<Arc<TestService>> {
  State(Arc::clone(service))
}

fn create_payload(name: &str) -> PetCreate {
  PetCreate {
    name: name.to_string(),
    status: Some("available".to_string()),
    adopted_on: NaiveDate::from_ymd_opt(2024, 5, 1),
    owner: uuid::Uuid::new_v4(),
  }
}

fn sparse_update() -> PetUpdate {
  PetUpdate {
    id: None,
    name: None,
    status: None,
    adopted_on: None,
    owner: None,
  }
}

#[tokio::test]
async fn test_create_then_get_one_roundtrip() {
  let service = Arc::new(TestService::default());

  let (status, Json(created)) = handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created.id, 1);
  assert_eq!(created.adopted_on, NaiveDate::from_ymd_opt(2024, 5, 1));

  let Json(fetched) = handlers::get_one(state(&service), Path(1)).await.unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_inserts_assign_sequential_ids() {
  let service = Arc::new(TestService::default());

  let (_, Json(first)) = handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();
  let (_, Json(second)) = handlers::create(state(&service), Json(create_payload("Milo")))
    .await
    .unwrap();
  assert_eq!(first.id, 1);
  assert_eq!(second.id, 2);
}

#[tokio::test]
async fn test_create_rejects_constraint_violations() {
  let service = Arc::new(TestService::default());

  let err = handlers::create(state(&service), Json(create_payload("")))
    .await
    .unwrap_err();
  assert!(matches!(err, ApiError::Invalid(message) if message.contains("name")));

  let err = handlers::create(state(&service), Json(create_payload(&"x".repeat(81))))
    .await
    .unwrap_err();
  assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn test_missing_records_surface_not_found() {
  let service = Arc::new(TestService::default());

  let err = handlers::get_one(state(&service), Path(42)).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound));

  let err = handlers::replace(state(&service), Path(42), Json(create_payload("Rex")))
    .await
    .unwrap_err();
  assert!(matches!(err, ApiError::NotFound));

  let err = handlers::delete(state(&service), Path(42)).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn test_update_merges_onto_current_values() {
  let service = Arc::new(TestService::default());
  handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();

  // Only `status` is set, so every other field keeps its stored value.
  let patch = PetUpdate {
    status: Some("adopted".to_string()),
    ..sparse_update()
  };
  let Json(updated) = handlers::update(state(&service), Path(1), Json(patch))
    .await
    .unwrap();
  assert_eq!(updated.name, "Rex");
  assert_eq!(updated.status.as_deref(), Some("adopted"));
  assert_eq!(updated.adopted_on, NaiveDate::from_ymd_opt(2024, 5, 1));
}

#[tokio::test]
async fn test_replace_overwrites_the_whole_record() {
  let service = Arc::new(TestService::default());
  handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();

  let mut replacement = create_payload("Bella");
  replacement.status = None;
  let Json(replaced) = handlers::replace(state(&service), Path(1), Json(replacement))
    .await
    .unwrap();
  assert_eq!(replaced.id, 1);
  assert_eq!(replaced.name, "Bella");
  assert!(replaced.status.is_none());
}

#[tokio::test]
async fn test_delete_then_gone() {
  let service = Arc::new(TestService::default());
  handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();

  let status = handlers::delete(state(&service), Path(1)).await.unwrap();
  assert_eq!(status, StatusCode::NO_CONTENT);

  let err = handlers::get_one(state(&service), Path(1)).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound));
  let err = handlers::delete(state(&service), Path(1)).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn test_paging_keeps_the_envelope() {
  let service = Arc::new(TestService::default());
  for name in ["Rex", "Milo", "Luna"] {
    handlers::create(state(&service), Json(create_payload(name)))
      .await
      .unwrap();
  }

  let request = PageRequest {
    page: 1,
    size: 2,
    sort: None,
  };
  let Json(page) = handlers::get_page(state(&service), Query(request))
    .await
    .unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].name, "Luna");
  assert_eq!(page.page, 1);
  assert_eq!(page.size, 2);
  assert_eq!(page.total, 3);
  assert_eq!(page.total_pages(), 2);
}

#[tokio::test]
async fn test_get_all_returns_every_summary() {
  let service = Arc::new(TestService::default());
  handlers::create(state(&service), Json(create_payload("Rex")))
    .await
    .unwrap();
  handlers::create(state(&service), Json(create_payload("Milo")))
    .await
    .unwrap();

  let Json(all) = handlers::get_all(state(&service)).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].name, "Rex");
}

#[test]
fn test_router_mounts_every_route() {
  // Route templates are validated when they are registered.
  let router = handlers::routes::<TestService>();
  let _: axum::Router = router.with_state(Arc::new(TestService::default()));
}

#[test]
fn test_update_payload_exposes_its_optional_id() {
  let mut patch = sparse_update();
  assert!(patch.id().is_none());
  patch.id = Some(7);
  assert_eq!(patch.id(), Some(&7));

  let pet = DefaultPetMapper.from_create(create_payload("Rex"));
  assert_eq!(pet.id(), Some(&0));
}

#[test]
fn test_export_skips_relation_columns() {
  let mapper = DefaultPetMapper;
  assert_eq!(mapper.export_header(), ["id", "name", "status", "adopted_on"]);

  let mut pet = mapper.from_create(create_payload("Rex"));
  pet.status = None;
  let row = mapper.export_row(&pet);
  assert_eq!(row[0], "0");
  assert_eq!(row[1], "Rex");
  assert_eq!(row[2], "");
  assert_eq!(row[3], "2024-05-01");
}

#[test]
fn test_update_payload_tolerates_sparse_json() {
  let patch: PetUpdate = serde_json::from_str(r#"{"status":"adopted"}"#).unwrap();
  assert!(patch.id.is_none());
  assert!(patch.name.is_none());
  assert_eq!(patch.status.as_deref(), Some("adopted"));
}
