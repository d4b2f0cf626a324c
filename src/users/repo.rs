use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::claims::Role;
use crate::error::ApiError;

/// Internal user account (`pipeline.pipeline_users`). The stored password is
/// an argon2 hash and never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "crate::date_only")]
    pub birthdate: Date,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub birthdate: Date,
    pub password: String,
}

impl User {
    pub async fn list(db: &PgPool) -> Result<Vec<User>, ApiError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, name, email, role, birthdate, password, created_at, updated_at
            FROM pipeline.pipeline_users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_uuid(db: &PgPool, uuid: Uuid) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, name, email, role, birthdate, password, created_at, updated_at
            FROM pipeline.pipeline_users
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, name, email, role, birthdate, password, created_at, updated_at
            FROM pipeline.pipeline_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Insert with a fresh public identifier. `data.password` must already be
    /// hashed.
    pub async fn create(db: &PgPool, uuid: Uuid, data: NewUser) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO pipeline.pipeline_users (uuid, name, email, role, birthdate, password)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, uuid, name, email, role, birthdate, password, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.role)
        .bind(data.birthdate)
        .bind(&data.password)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Wholesale update by public identifier. Returns `None` when no row
    /// matched.
    pub async fn update(db: &PgPool, uuid: Uuid, data: NewUser) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE pipeline.pipeline_users
            SET name = $1, role = $2, email = $3, birthdate = $4, password = $5, updated_at = now()
            WHERE uuid = $6
            RETURNING id, uuid, name, email, role, birthdate, password, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(data.role)
        .bind(&data.email)
        .bind(data.birthdate)
        .bind(&data.password)
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, uuid: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM pipeline.pipeline_users WHERE uuid = $1")
            .bind(uuid)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User"));
        }
        Ok(())
    }
}
