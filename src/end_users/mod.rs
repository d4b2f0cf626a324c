use axum::{routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/endusers",
            get(handlers::list_end_users).post(handlers::create_end_user),
        )
        .route(
            "/endusers/:uuid",
            get(handlers::get_end_user)
                .put(handlers::update_end_user)
                .delete(handlers::delete_end_user),
        )
}
