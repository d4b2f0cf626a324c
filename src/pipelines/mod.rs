use axum::{routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/pipelines",
            get(handlers::list_pipelines).post(handlers::create_pipeline),
        )
        .route(
            "/pipelines/:uuid",
            get(handlers::get_pipeline)
                .put(handlers::update_pipeline)
                .delete(handlers::delete_pipeline),
        )
}
