use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

/// A sales deal (`pipeline.pipelines`), write-side shape: raw foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pipeline {
    pub id: i64,
    pub uuid: Uuid,
    pub id_category_project: i64,
    pub project_name: String,
    pub id_user_sales: i64,
    pub id_end_user: i64,
    pub id_pic_project: i64,
    pub product_price: f64,
    pub service_price: f64,
    pub margin: f64,
    #[serde(with = "crate::date_only")]
    pub estimated_closed_date: Date,
    #[serde(with = "crate::date_only")]
    pub estimated_delivered_date: Date,
    pub description: Option<String>,
    pub status: String,
    pub file_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Read-side shape: category and people references resolved to names. The
/// joins are LEFT so a dangling reference surfaces as null instead of hiding
/// the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PipelineDetails {
    pub id: i64,
    pub uuid: Uuid,
    pub project_name: String,
    pub categories: Option<String>,
    pub sales_name: Option<String>,
    pub pic_name: Option<String>,
    pub end_user_name: Option<String>,
    pub product_price: f64,
    pub service_price: f64,
    pub margin: f64,
    pub status: String,
    #[serde(with = "crate::date_only")]
    pub estimated_closed_date: Date,
    #[serde(with = "crate::date_only")]
    pub estimated_delivered_date: Date,
    pub description: Option<String>,
    pub file_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewPipeline {
    pub id_category_project: i64,
    pub project_name: String,
    pub id_user_sales: i64,
    pub id_end_user: i64,
    pub id_pic_project: i64,
    pub product_price: f64,
    pub service_price: f64,
    pub margin: f64,
    pub estimated_closed_date: Date,
    pub estimated_delivered_date: Date,
    pub description: Option<String>,
    pub status: String,
    pub file_url: Option<String>,
}

const DETAILS_QUERY: &str = r#"
    SELECT p.id, p.uuid, p.project_name,
           c.name AS categories,
           sales.name AS sales_name,
           pic.name AS pic_name,
           eu.name AS end_user_name,
           p.product_price, p.service_price, p.margin, p.status,
           p.estimated_closed_date, p.estimated_delivered_date,
           p.description, p.file_url, p.created_at, p.updated_at
    FROM pipeline.pipelines p
    LEFT JOIN pipeline.project_categories c ON p.id_category_project = c.id
    LEFT JOIN pipeline.pipeline_users sales ON p.id_user_sales = sales.id
    LEFT JOIN pipeline.pipeline_users pic ON p.id_pic_project = pic.id
    LEFT JOIN pipeline.end_users eu ON p.id_end_user = eu.id
"#;

impl Pipeline {
    pub async fn list(db: &PgPool) -> Result<Vec<PipelineDetails>, ApiError> {
        let sql = format!("{DETAILS_QUERY} ORDER BY p.id");
        let rows = sqlx::query_as::<_, PipelineDetails>(&sql)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_uuid(db: &PgPool, uuid: Uuid) -> Result<Option<PipelineDetails>, ApiError> {
        let sql = format!("{DETAILS_QUERY} WHERE p.uuid = $1");
        let row = sqlx::query_as::<_, PipelineDetails>(&sql)
            .bind(uuid)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, uuid: Uuid, data: NewPipeline) -> Result<Pipeline, ApiError> {
        let row = sqlx::query_as::<_, Pipeline>(
            r#"
            INSERT INTO pipeline.pipelines
                (uuid, id_category_project, project_name, id_user_sales, id_end_user,
                 id_pic_project, product_price, service_price, margin,
                 estimated_closed_date, estimated_delivered_date, description, status, file_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, uuid, id_category_project, project_name, id_user_sales, id_end_user,
                      id_pic_project, product_price, service_price, margin,
                      estimated_closed_date, estimated_delivered_date, description, status,
                      file_url, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(data.id_category_project)
        .bind(&data.project_name)
        .bind(data.id_user_sales)
        .bind(data.id_end_user)
        .bind(data.id_pic_project)
        .bind(data.product_price)
        .bind(data.service_price)
        .bind(data.margin)
        .bind(data.estimated_closed_date)
        .bind(data.estimated_delivered_date)
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.file_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        uuid: Uuid,
        data: NewPipeline,
    ) -> Result<Option<Pipeline>, ApiError> {
        let row = sqlx::query_as::<_, Pipeline>(
            r#"
            UPDATE pipeline.pipelines
            SET id_category_project = $1, project_name = $2, id_user_sales = $3,
                id_end_user = $4, id_pic_project = $5, product_price = $6,
                service_price = $7, margin = $8, estimated_closed_date = $9,
                estimated_delivered_date = $10, description = $11, status = $12,
                file_url = $13, updated_at = now()
            WHERE uuid = $14
            RETURNING id, uuid, id_category_project, project_name, id_user_sales, id_end_user,
                      id_pic_project, product_price, service_price, margin,
                      estimated_closed_date, estimated_delivered_date, description, status,
                      file_url, created_at, updated_at
            "#,
        )
        .bind(data.id_category_project)
        .bind(&data.project_name)
        .bind(data.id_user_sales)
        .bind(data.id_end_user)
        .bind(data.id_pic_project)
        .bind(data.product_price)
        .bind(data.service_price)
        .bind(data.margin)
        .bind(data.estimated_closed_date)
        .bind(data.estimated_delivered_date)
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.file_url)
        .bind(uuid)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, uuid: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM pipeline.pipelines WHERE uuid = $1")
            .bind(uuid)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Pipeline"));
        }
        Ok(())
    }
}
