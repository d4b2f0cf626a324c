use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, TokenResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::response::envelope;
use crate::state::AppState;
use crate::users::repo::User;

/// POST /login. Unknown email and wrong password produce the identical
/// response, so the endpoint does not reveal which one was wrong.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = payload.email.trim();

    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| {
            warn!("login with unknown email");
            ApiError::InvalidCredentials
        })?;

    let ok = verify_password(&payload.password, &user.password)?;
    if !ok {
        warn!(user = %user.uuid, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.uuid, &user.email, &user.name, user.role)?;

    info!(user = %user.uuid, "user logged in");
    Ok(envelope(
        StatusCode::OK,
        TokenResponse { token },
        "Authentication success",
    ))
}
