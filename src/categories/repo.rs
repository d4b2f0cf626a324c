use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectCategory {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProjectCategory {
    pub async fn list(db: &PgPool) -> Result<Vec<ProjectCategory>, ApiError> {
        let rows = sqlx::query_as::<_, ProjectCategory>(
            r#"
            SELECT id, uuid, name, created_at, updated_at
            FROM pipeline.project_categories
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_uuid(db: &PgPool, uuid: Uuid) -> Result<Option<ProjectCategory>, ApiError> {
        let row = sqlx::query_as::<_, ProjectCategory>(
            r#"
            SELECT id, uuid, name, created_at, updated_at
            FROM pipeline.project_categories
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, uuid: Uuid, name: &str) -> Result<ProjectCategory, ApiError> {
        let row = sqlx::query_as::<_, ProjectCategory>(
            r#"
            INSERT INTO pipeline.project_categories (uuid, name)
            VALUES ($1, $2)
            RETURNING id, uuid, name, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        uuid: Uuid,
        name: &str,
    ) -> Result<Option<ProjectCategory>, ApiError> {
        let row = sqlx::query_as::<_, ProjectCategory>(
            r#"
            UPDATE pipeline.project_categories
            SET name = $1, updated_at = now()
            WHERE uuid = $2
            RETURNING id, uuid, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, uuid: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM pipeline.project_categories WHERE uuid = $1")
            .bind(uuid)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Categories"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for db tests");
        let db = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");
        db
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn crud_lifecycle_by_public_id() {
        let db = pool().await;
        let uuid = Uuid::new_v4();

        let created = ProjectCategory::create(&db, uuid, "IT Infrastructure")
            .await
            .expect("create");
        assert_eq!(created.uuid, uuid);

        let fetched = ProjectCategory::get_by_uuid(&db, uuid)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(fetched.name, "IT Infrastructure");

        let updated = ProjectCategory::update(&db, uuid, "Networking")
            .await
            .expect("update")
            .expect("matched");
        assert_eq!(updated.name, "Networking");

        ProjectCategory::delete(&db, uuid).await.expect("delete");
        assert!(ProjectCategory::get_by_uuid(&db, uuid)
            .await
            .expect("get")
            .is_none());

        // Deleting again distinguishes "gone" as a typed not-found.
        let err = ProjectCategory::delete(&db, uuid).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Categories")));
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn update_unknown_id_matches_nothing() {
        let db = pool().await;
        let missing = ProjectCategory::update(&db, Uuid::new_v4(), "anything")
            .await
            .expect("update");
        assert!(missing.is_none());
    }
}
