use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::response::envelope;

/// Every failure a repository or handler can surface. `IntoResponse` below is
/// the only place these are translated to an HTTP status and envelope, so no
/// caller ever inspects an error message to classify an outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("All data are required")]
    MissingFields,
    #[error("{0}")]
    InvalidPassword(&'static str),
    #[error("Email format is invalid")]
    InvalidEmail,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Access denied, no token provided")]
    MissingToken,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    Conflict(&'static str),
    #[error("An error occurred while processing data")]
    Database(#[source] sqlx::Error),
    #[error("An error occurred while processing data")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidPassword(_) | ApiError::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Login failures keep the original 404 contract, not 401.
            ApiError::InvalidCredentials => StatusCode::NOT_FOUND,
            ApiError::MissingToken => StatusCode::FORBIDDEN,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Placeholder string sent as the envelope payload on error.
    fn payload(&self) -> &'static str {
        match self {
            ApiError::MissingFields | ApiError::Conflict(_) => "Data error",
            ApiError::InvalidPassword(_) => "Password error",
            ApiError::InvalidEmail => "Email error",
            ApiError::NotFound(_) => "Data not found",
            ApiError::MissingToken => "Invalid token",
            ApiError::InvalidCredentials
            | ApiError::Unauthorized
            | ApiError::Forbidden => "Error",
            ApiError::Database(_) | ApiError::Internal(_) => "Data error",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => return ApiError::Conflict("Value already exists"),
                Some("23503") => return ApiError::Conflict("Referenced data does not exist"),
                _ => {}
            }
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::Database(e) => error!(error = %e, %status, "database error"),
            ApiError::Internal(e) => error!(error = %e, %status, "internal error"),
            _ => warn!(%message, %status, "request rejected"),
        }

        envelope(status, self.payload(), message)
    }
}
