use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/change-request",
            get(handlers::list_change_requests).post(handlers::create_change_request),
        )
        .route(
            "/approve-change-request/:uuid",
            put(handlers::approve_change_request),
        )
}
