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

use super::dto::UpsertEndUserRequest;
use super::repo::{EndUser, NewEndUser};

fn required(payload: UpsertEndUserRequest) -> Result<NewEndUser, ApiError> {
    let (Some(name), Some(address), Some(pic_name), Some(phone_number)) = (
        payload.name,
        payload.address,
        payload.pic_name,
        payload.phone_number,
    ) else {
        return Err(ApiError::MissingFields);
    };
    Ok(NewEndUser {
        name,
        address,
        pic_name,
        phone_number,
    })
}

#[instrument(skip(state, _auth))]
pub async fn list_end_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let end_users = EndUser::list(&state.db).await?;
    Ok(envelope(StatusCode::OK, end_users, "Get data all end users"))
}

#[instrument(skip(state, _auth))]
pub async fn get_end_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    let end_user = EndUser::get_by_uuid(&state.db, uuid)
        .await?
        .ok_or(ApiError::NotFound("End user"))?;
    Ok(envelope(StatusCode::OK, end_user, "Get end user by ID"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_end_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<UpsertEndUserRequest>,
) -> Result<Response, ApiError> {
    let data = required(payload)?;
    let end_user = EndUser::create(&state.db, Uuid::new_v4(), data).await?;
    info!(end_user = %end_user.uuid, "end user created");
    Ok(envelope(StatusCode::CREATED, end_user, "End user created"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_end_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpsertEndUserRequest>,
) -> Result<Response, ApiError> {
    let data = required(payload)?;
    let end_user = EndUser::update(&state.db, uuid, data)
        .await?
        .ok_or(ApiError::NotFound("End user"))?;
    Ok(envelope(
        StatusCode::OK,
        end_user,
        format!("End User {uuid} updated"),
    ))
}

#[instrument(skip(state, _auth))]
pub async fn delete_end_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    EndUser::delete(&state.db, uuid).await?;
    info!(end_user = %uuid, "end user deleted");
    Ok(envelope(
        StatusCode::OK,
        "Data deleted",
        format!("End User {uuid} removed"),
    ))
}
