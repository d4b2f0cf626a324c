use serde::Deserialize;
use time::Date;

/// Body for create and wholesale update. `description` and `file_url` are
/// genuinely optional; everything else is required by the handler.
#[derive(Debug, Deserialize)]
pub struct UpsertPipelineRequest {
    pub id_category_project: Option<i64>,
    pub project_name: Option<String>,
    pub id_user_sales: Option<i64>,
    pub id_end_user: Option<i64>,
    pub id_pic_project: Option<i64>,
    pub product_price: Option<f64>,
    pub service_price: Option<f64>,
    pub margin: Option<f64>,
    #[serde(default, with = "crate::date_only::option")]
    pub estimated_closed_date: Option<Date>,
    #[serde(default, with = "crate::date_only::option")]
    pub estimated_delivered_date: Option<Date>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub file_url: Option<String>,
}
