use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Customer-side contact for a pipeline (`pipeline.end_users`), distinct
/// from internal user accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EndUser {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub address: String,
    pub pic_name: String,
    pub phone_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewEndUser {
    pub name: String,
    pub address: String,
    pub pic_name: String,
    pub phone_number: String,
}

impl EndUser {
    pub async fn list(db: &PgPool) -> Result<Vec<EndUser>, ApiError> {
        let rows = sqlx::query_as::<_, EndUser>(
            r#"
            SELECT id, uuid, name, address, pic_name, phone_number, created_at, updated_at
            FROM pipeline.end_users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_uuid(db: &PgPool, uuid: Uuid) -> Result<Option<EndUser>, ApiError> {
        let row = sqlx::query_as::<_, EndUser>(
            r#"
            SELECT id, uuid, name, address, pic_name, phone_number, created_at, updated_at
            FROM pipeline.end_users
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, uuid: Uuid, data: NewEndUser) -> Result<EndUser, ApiError> {
        let row = sqlx::query_as::<_, EndUser>(
            r#"
            INSERT INTO pipeline.end_users (uuid, name, address, pic_name, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, uuid, name, address, pic_name, phone_number, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.pic_name)
        .bind(&data.phone_number)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        uuid: Uuid,
        data: NewEndUser,
    ) -> Result<Option<EndUser>, ApiError> {
        let row = sqlx::query_as::<_, EndUser>(
            r#"
            UPDATE pipeline.end_users
            SET name = $1, address = $2, pic_name = $3, phone_number = $4, updated_at = now()
            WHERE uuid = $5
            RETURNING id, uuid, name, address, pic_name, phone_number, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.pic_name)
        .bind(&data.phone_number)
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, uuid: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM pipeline.end_users WHERE uuid = $1")
            .bind(uuid)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("End user"));
        }
        Ok(())
    }
}
