use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. The approval gate matches on this exhaustively; an unknown
/// role string in the database or a token fails deserialization outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Standard,
}

/// JWT payload attached to every authenticated request. `sub` is the user's
/// public identifier, never the internal row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}
