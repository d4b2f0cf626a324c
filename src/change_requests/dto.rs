use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateChangeRequestBody {
    pub id_pipeline: Option<i64>,
    pub id_end_user: Option<i64>,
    pub new_status: Option<String>,
    pub note: Option<String>,
}
