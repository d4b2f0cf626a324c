use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// A proposed status change on a pipeline (`pipeline.change_request`).
/// `request_status` starts as PENDING and only ever becomes APPROVED, and
/// only through [`ChangeRequest::approve`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChangeRequest {
    pub id: i64,
    pub uuid: Uuid,
    pub id_pipeline: i64,
    pub id_end_user: i64,
    pub new_status: String,
    pub note: Option<String>,
    pub request_status: String,
    pub id_user_request: Uuid,
    pub id_user_approval: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// List shape: pipeline, end user, requester and approver resolved to names.
/// The approver is null while the request is pending.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChangeRequestDetails {
    pub id: i64,
    pub uuid: Uuid,
    pub project_name: Option<String>,
    pub end_user: Option<String>,
    pub user_request: Option<String>,
    pub user_approve: Option<String>,
    pub current_status: Option<String>,
    pub new_status: String,
    pub note: Option<String>,
    pub request_status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewChangeRequest {
    pub id_pipeline: i64,
    pub id_end_user: i64,
    pub new_status: String,
    pub note: Option<String>,
    /// Public identifier of the requesting user, taken from the caller's
    /// token, never from the request body.
    pub requested_by: Uuid,
}

impl ChangeRequest {
    pub async fn list(db: &PgPool) -> Result<Vec<ChangeRequestDetails>, ApiError> {
        let rows = sqlx::query_as::<_, ChangeRequestDetails>(
            r#"
            SELECT cr.id, cr.uuid,
                   p.project_name,
                   eu.name AS end_user,
                   requester.name AS user_request,
                   approver.name AS user_approve,
                   p.status AS current_status,
                   cr.new_status, cr.note, cr.request_status,
                   cr.created_at, cr.updated_at
            FROM pipeline.change_request cr
            LEFT JOIN pipeline.pipelines p ON cr.id_pipeline = p.id
            LEFT JOIN pipeline.end_users eu ON cr.id_end_user = eu.id
            LEFT JOIN pipeline.pipeline_users requester ON cr.id_user_request = requester.uuid
            LEFT JOIN pipeline.pipeline_users approver ON cr.id_user_approval = approver.uuid
            ORDER BY cr.id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        uuid: Uuid,
        data: NewChangeRequest,
    ) -> Result<ChangeRequest, ApiError> {
        let row = sqlx::query_as::<_, ChangeRequest>(
            r#"
            INSERT INTO pipeline.change_request
                (uuid, id_pipeline, id_end_user, new_status, note, request_status, id_user_request)
            VALUES ($1, $2, $3, $4, $5, 'PENDING', $6)
            RETURNING id, uuid, id_pipeline, id_end_user, new_status, note, request_status,
                      id_user_request, id_user_approval, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(data.id_pipeline)
        .bind(data.id_end_user)
        .bind(&data.new_status)
        .bind(&data.note)
        .bind(data.requested_by)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Approve a pending request: move the target pipeline to the proposed
    /// status and mark the request APPROVED, both inside one transaction so a
    /// failure in either write leaves both rows untouched. Returns `None`
    /// (nothing mutated) when no request matches `uuid`, otherwise the number
    /// of change-request rows updated.
    pub async fn approve(
        db: &PgPool,
        uuid: Uuid,
        approver: Uuid,
    ) -> Result<Option<u64>, ApiError> {
        let mut tx = db.begin().await?;

        let request = sqlx::query_as::<_, ChangeRequest>(
            r#"
            SELECT id, uuid, id_pipeline, id_end_user, new_status, note, request_status,
                   id_user_request, id_user_approval, created_at, updated_at
            FROM pipeline.change_request
            WHERE uuid = $1
            FOR UPDATE
            "#,
        )
        .bind(uuid)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction without committing rolls it back.
        let Some(request) = request else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE pipeline.pipelines
            SET status = $1
            WHERE id = $2
            "#,
        )
        .bind(&request.new_status)
        .bind(request.id_pipeline)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE pipeline.change_request
            SET request_status = 'APPROVED', id_user_approval = $1, updated_at = now()
            WHERE uuid = $2
            "#,
        )
        .bind(approver)
        .bind(uuid)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(result.rows_affected()))
    }
}

#[cfg(test)]
mod db_tests {
    use time::macros::date;

    use super::*;
    use crate::auth::claims::Role;
    use crate::categories::repo::ProjectCategory;
    use crate::end_users::repo::{EndUser, NewEndUser};
    use crate::pipelines::repo::{NewPipeline, Pipeline};
    use crate::users::repo::{NewUser, User};

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for db tests");
        let db = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");
        db
    }

    async fn seed_user(db: &PgPool, role: Role) -> User {
        let uuid = Uuid::new_v4();
        User::create(
            db,
            uuid,
            NewUser {
                name: "Budi".into(),
                email: format!("{uuid}@example.com"),
                role,
                birthdate: date!(1990 - 01 - 15),
                password: "not-a-real-hash".into(),
            },
        )
        .await
        .expect("seed user")
    }

    async fn seed_pipeline(db: &PgPool) -> Pipeline {
        let category = ProjectCategory::create(db, Uuid::new_v4(), "IT Infrastructure")
            .await
            .expect("seed category");
        let sales = seed_user(db, Role::Standard).await;
        let end_user = EndUser::create(
            db,
            Uuid::new_v4(),
            NewEndUser {
                name: "PT. SPIL".into(),
                address: "Surabaya".into(),
                pic_name: "Andi".into(),
                phone_number: "081234567890".into(),
            },
        )
        .await
        .expect("seed end user");

        Pipeline::create(
            db,
            Uuid::new_v4(),
            NewPipeline {
                id_category_project: category.id,
                project_name: "Pengadaan Data Center".into(),
                id_user_sales: sales.id,
                id_end_user: end_user.id,
                id_pic_project: sales.id,
                product_price: 55_000_000.0,
                service_price: 150_000.0,
                margin: 200_000.0,
                estimated_closed_date: date!(2024 - 04 - 19),
                estimated_delivered_date: date!(2024 - 04 - 29),
                description: None,
                status: "ON GOING".into(),
                file_url: None,
            },
        )
        .await
        .expect("seed pipeline")
    }

    async fn seed_request(db: &PgPool, pipeline: &Pipeline, requester: &User) -> ChangeRequest {
        ChangeRequest::create(
            db,
            Uuid::new_v4(),
            NewChangeRequest {
                id_pipeline: pipeline.id,
                id_end_user: pipeline.id_end_user,
                new_status: "LOST".into(),
                note: Some("customer went silent".into()),
                requested_by: requester.uuid,
            },
        )
        .await
        .expect("seed change request")
    }

    async fn request_status(db: &PgPool, uuid: Uuid) -> (String, Option<Uuid>) {
        let row = sqlx::query_as::<_, ChangeRequest>(
            r#"
            SELECT id, uuid, id_pipeline, id_end_user, new_status, note, request_status,
                   id_user_request, id_user_approval, created_at, updated_at
            FROM pipeline.change_request
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_one(db)
        .await
        .expect("fetch change request");
        (row.request_status, row.id_user_approval)
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn approve_moves_request_and_pipeline_together() {
        let db = pool().await;
        let pipeline = seed_pipeline(&db).await;
        let requester = seed_user(&db, Role::Standard).await;
        let admin = seed_user(&db, Role::Admin).await;
        let request = seed_request(&db, &pipeline, &requester).await;
        assert_eq!(request.request_status, "PENDING");

        let updated = ChangeRequest::approve(&db, request.uuid, admin.uuid)
            .await
            .expect("approve");
        assert_eq!(updated, Some(1));

        let details = Pipeline::get_by_uuid(&db, pipeline.uuid)
            .await
            .expect("get pipeline")
            .expect("pipeline exists");
        assert_eq!(details.status, "LOST");

        let (status, approver) = request_status(&db, request.uuid).await;
        assert_eq!(status, "APPROVED");
        assert_eq!(approver, Some(admin.uuid));
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn approve_unknown_request_mutates_nothing() {
        let db = pool().await;
        let pipeline = seed_pipeline(&db).await;

        let updated = ChangeRequest::approve(&db, Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect("approve");
        assert_eq!(updated, None);

        let details = Pipeline::get_by_uuid(&db, pipeline.uuid)
            .await
            .expect("get pipeline")
            .expect("pipeline exists");
        assert_eq!(details.status, "ON GOING");
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres (DATABASE_URL)"]
    async fn failed_second_write_rolls_back_the_pipeline_update() {
        let db = pool().await;
        let pipeline = seed_pipeline(&db).await;
        let requester = seed_user(&db, Role::Standard).await;
        let request = seed_request(&db, &pipeline, &requester).await;

        // An approver uuid with no user row violates the id_user_approval
        // foreign key in the second write, after the pipeline status update
        // already ran inside the same transaction.
        let err = ChangeRequest::approve(&db, request.uuid, Uuid::new_v4()).await;
        assert!(err.is_err());

        let details = Pipeline::get_by_uuid(&db, pipeline.uuid)
            .await
            .expect("get pipeline")
            .expect("pipeline exists");
        assert_eq!(details.status, "ON GOING");

        let (status, approver) = request_status(&db, request.uuid).await;
        assert_eq!(status, "PENDING");
        assert_eq!(approver, None);
    }
}
