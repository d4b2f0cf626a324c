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

use super::dto::UpsertPipelineRequest;
use super::repo::{NewPipeline, Pipeline};

fn required(payload: UpsertPipelineRequest) -> Result<NewPipeline, ApiError> {
    let (
        Some(id_category_project),
        Some(project_name),
        Some(id_user_sales),
        Some(id_end_user),
        Some(id_pic_project),
        Some(product_price),
        Some(service_price),
        Some(margin),
        Some(estimated_closed_date),
        Some(estimated_delivered_date),
        Some(status),
    ) = (
        payload.id_category_project,
        payload.project_name,
        payload.id_user_sales,
        payload.id_end_user,
        payload.id_pic_project,
        payload.product_price,
        payload.service_price,
        payload.margin,
        payload.estimated_closed_date,
        payload.estimated_delivered_date,
        payload.status,
    )
    else {
        return Err(ApiError::MissingFields);
    };

    Ok(NewPipeline {
        id_category_project,
        project_name,
        id_user_sales,
        id_end_user,
        id_pic_project,
        product_price,
        service_price,
        margin,
        estimated_closed_date,
        estimated_delivered_date,
        description: payload.description,
        status,
        file_url: payload.file_url,
    })
}

#[instrument(skip(state, _auth))]
pub async fn list_pipelines(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let pipelines = Pipeline::list(&state.db).await?;
    Ok(envelope(StatusCode::OK, pipelines, "Get all pipeline"))
}

#[instrument(skip(state, _auth))]
pub async fn get_pipeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pipeline = Pipeline::get_by_uuid(&state.db, uuid)
        .await?
        .ok_or(ApiError::NotFound("Pipeline"))?;
    Ok(envelope(StatusCode::OK, pipeline, "Get pipeline by ID"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_pipeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<UpsertPipelineRequest>,
) -> Result<Response, ApiError> {
    let data = required(payload)?;
    let pipeline = Pipeline::create(&state.db, Uuid::new_v4(), data).await?;
    info!(pipeline = %pipeline.uuid, "pipeline created");
    Ok(envelope(StatusCode::CREATED, pipeline, "Pipeline created"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_pipeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpsertPipelineRequest>,
) -> Result<Response, ApiError> {
    let data = required(payload)?;
    let pipeline = Pipeline::update(&state.db, uuid, data)
        .await?
        .ok_or(ApiError::NotFound("Pipeline"))?;
    Ok(envelope(StatusCode::OK, pipeline, "Pipeline updated"))
}

#[instrument(skip(state, _auth))]
pub async fn delete_pipeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Response, ApiError> {
    Pipeline::delete(&state.db, uuid).await?;
    info!(pipeline = %uuid, "pipeline deleted");
    Ok(envelope(
        StatusCode::OK,
        "Data deleted",
        format!("Pipeline {uuid} removed"),
    ))
}
