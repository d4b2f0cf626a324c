use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpsertCategoryRequest {
    pub name: Option<String>,
}
