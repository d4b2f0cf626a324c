use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::response::envelope;
use crate::state::AppState;

use super::dto::UpsertCategoryRequest;
use super::repo::ProjectCategory;

#[instrument(skip(state, _auth))]
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let categories = ProjectCategory::list(&state.db).await?;
    Ok(envelope(StatusCode::OK, categories, "Get all categories data"))
}

#[instrument(skip(state, _auth))]
pub async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    let category = ProjectCategory::get_by_uuid(&state.db, uuid)
        .await?
        .ok_or(ApiError::NotFound("Categories"))?;
    Ok(envelope(StatusCode::OK, category, "Get categories by ID"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<UpsertCategoryRequest>,
) -> Result<Response, ApiError> {
    let name = payload.name.ok_or(ApiError::MissingFields)?;
    let category = ProjectCategory::create(&state.db, Uuid::new_v4(), &name).await?;
    info!(category = %category.uuid, "project category created");
    Ok(envelope(StatusCode::CREATED, category, "Categories created"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpsertCategoryRequest>,
) -> Result<Response, ApiError> {
    let name = payload.name.ok_or(ApiError::MissingFields)?;
    let category = ProjectCategory::update(&state.db, uuid, &name)
        .await?
        .ok_or(ApiError::NotFound("Categories"))?;
    Ok(envelope(StatusCode::OK, category, "Categories updated"))
}

#[instrument(skip(state, _auth))]
pub async fn delete_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    ProjectCategory::delete(&state.db, uuid).await?;
    info!(category = %uuid, "project category deleted");
    Ok(envelope(StatusCode::OK, "Data deleted", "Categories removed"))
}
