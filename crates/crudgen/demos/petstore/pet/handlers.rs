// Generated by crudgen. Do not edit; regenerate instead.

use std::sync::Arc;
use axum::{
    Json, Router, extract::{Path, Query, State}, http::StatusCode,
    response::{IntoResponse, Response},
};
use crudgen_support::{Page, PageRequest};
use validator::Validate;
use super::dto::*;
use super::mapper::PetMapper;
use super::repository::PetRepository;
///Everything the `pet` handlers need from shared state, in one bound.
pub trait PetService: PetRepository + PetMapper + Send + Sync + 'static {}
impl<T> PetService for T
where
    T: PetRepository + PetMapper + Send + Sync + 'static,
{}
/// Error surface every generated handler returns.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    AccessDenied,
    Invalid(String),
    Internal(String),
}
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::AccessDenied => StatusCode::FORBIDDEN.into_response(),
            ApiError::Invalid(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message).into_response()
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
fn internal<E: std::fmt::Display>(err: E) -> ApiError {
    ApiError::Internal(err.to_string())
}
fn invalid<E: std::fmt::Display>(err: E) -> ApiError {
    ApiError::Invalid(err.to_string())
}
///Handles `GET /pets/{id}`.
pub async fn get_one<S: PetService>(
    State(service): State<Arc<S>>,
    Path(id): Path<i64>,
) -> Result<Json<PetDetail>, ApiError> {
    let entity = service
        .find_by_id(&id)
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
}
///Handles `GET /pets/all`.
pub async fn get_all<S: PetService>(
    State(service): State<Arc<S>>,
) -> Result<Json<Vec<PetSummary>>, ApiError> {
    let entities = service.list_all().await.map_err(internal)?;
    Ok(Json(entities.iter().map(|entity| service.to_summary(entity)).collect()))
}
///Handles `GET /pets`.
pub async fn get_page<S: PetService>(
    State(service): State<Arc<S>>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<PetSummary>>, ApiError> {
    let page = service.list_page(&page).await.map_err(internal)?;
    Ok(Json(page.map(|entity| service.to_summary(&entity))))
}
///Handles `POST /pets`.
pub async fn create<S: PetService>(
    State(service): State<Arc<S>>,
    Json(payload): Json<PetCreate>,
) -> Result<(StatusCode, Json<PetDetail>), ApiError> {
    payload.validate().map_err(invalid)?;
    let entity = service.insert(service.from_create(payload)).await.map_err(internal)?;
    Ok((StatusCode::CREATED, Json(service.to_detail(&entity))))
}
///Handles `PUT /pets/{id}`.
pub async fn replace<S: PetService>(
    State(service): State<Arc<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<PetCreate>,
) -> Result<Json<PetDetail>, ApiError> {
    payload.validate().map_err(invalid)?;
    let entity = service
        .replace(&id, service.from_create(payload))
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
}
///Handles `PATCH /pets/{id}`.
pub async fn update<S: PetService>(
    State(service): State<Arc<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<PetUpdate>,
) -> Result<Json<PetDetail>, ApiError> {
    payload.validate().map_err(invalid)?;
    let current = service
        .find_by_id(&id)
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;
    let entity = service
        .replace(&id, service.apply_update(current, payload))
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
}
///Handles `DELETE /pets/{id}`.
pub async fn delete<S: PetService>(
    State(service): State<Arc<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if service.remove(&id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
///Mounts every generated `pet` endpoint on a fresh router.
pub fn routes<S: PetService>() -> Router<Arc<S>> {
    Router::new()
        .route("/pets/{id}", axum::routing::get(get_one::<S>))
        .route("/pets/all", axum::routing::get(get_all::<S>))
        .route("/pets", axum::routing::get(get_page::<S>))
        .route("/pets", axum::routing::post(create::<S>))
        .route("/pets/{id}", axum::routing::put(replace::<S>))
        .route("/pets/{id}", axum::routing::patch(update::<S>))
        .route("/pets/{id}", axum::routing::delete(delete::<S>))
}
