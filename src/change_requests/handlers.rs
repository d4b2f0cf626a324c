use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::response::envelope;
use crate::state::AppState;

use super::dto::CreateChangeRequestBody;
use super::repo::{ChangeRequest, NewChangeRequest};

#[instrument(skip(state, _auth))]
pub async fn list_change_requests(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let requests = ChangeRequest::list(&state.db).await?;
    Ok(envelope(StatusCode::OK, requests, "Get all change requests"))
}

#[instrument(skip(state, payload))]
pub async fn create_change_request(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateChangeRequestBody>,
) -> Result<Response, ApiError> {
    let (Some(id_pipeline), Some(id_end_user), Some(new_status)) =
        (payload.id_pipeline, payload.id_end_user, payload.new_status)
    else {
        return Err(ApiError::MissingFields);
    };

    let data = NewChangeRequest {
        id_pipeline,
        id_end_user,
        new_status,
        note: payload.note,
        requested_by: claims.sub,
    };
    let request = ChangeRequest::create(&state.db, Uuid::new_v4(), data).await?;
    info!(request = %request.uuid, requested_by = %claims.sub, "change request created");
    Ok(envelope(
        StatusCode::CREATED,
        request,
        "Change Request created",
    ))
}

#[instrument(skip(state))]
pub async fn approve_change_request(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    let updated = ChangeRequest::approve(&state.db, uuid, claims.sub)
        .await?
        .ok_or(ApiError::NotFound("Change Request"))?;
    info!(request = %uuid, approved_by = %claims.sub, "change request approved");
    Ok(envelope(StatusCode::OK, updated, "Change Request updated"))
}
