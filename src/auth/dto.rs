use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload returned on successful authentication.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
