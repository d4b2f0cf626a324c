use axum::{routing::post, Router};

use crate::state::AppState;

pub mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod validate;

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}
