use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::auth::password::hash_password;
use crate::auth::validate::{validate_email, validate_password};
use crate::error::ApiError;
use crate::response::envelope;
use crate::state::AppState;

use super::dto::UpsertUserRequest;
use super::repo::{NewUser, User};

/// Presence check plus credential validation; hashes the password and hands
/// back a row ready to write. Shared by create and update, which both take
/// the whole record.
fn validated(payload: UpsertUserRequest) -> Result<NewUser, ApiError> {
    let (Some(name), Some(email), Some(role), Some(birthdate), Some(password)) = (
        payload.name,
        payload.email,
        payload.role,
        payload.birthdate,
        payload.password,
    ) else {
        return Err(ApiError::MissingFields);
    };

    validate_password(&password)?;
    validate_email(&email)?;

    Ok(NewUser {
        name,
        email: email.trim().to_string(),
        role,
        birthdate,
        password: hash_password(password.trim())?,
    })
}

#[instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let users = User::list(&state.db).await?;
    Ok(envelope(StatusCode::OK, users, "Get data all users"))
}

#[instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user = User::get_by_uuid(&state.db, uuid)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(envelope(StatusCode::OK, user, "Get user by ID"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<UpsertUserRequest>,
) -> Result<Response, ApiError> {
    let data = validated(payload)?;
    let user = User::create(&state.db, Uuid::new_v4(), data).await?;
    info!(user = %user.uuid, "user created");
    Ok(envelope(StatusCode::CREATED, user, "User created"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpsertUserRequest>,
) -> Result<Response, ApiError> {
    let data = validated(payload)?;
    let user = User::update(&state.db, uuid, data)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(envelope(StatusCode::OK, user, format!("User {uuid} updated")))
}

#[instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    User::delete(&state.db, uuid).await?;
    info!(user = %uuid, "user deleted");
    Ok(envelope(
        StatusCode::OK,
        "Data deleted",
        format!("User {uuid} removed"),
    ))
}
