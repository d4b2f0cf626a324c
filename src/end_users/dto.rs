use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpsertEndUserRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub pic_name: Option<String>,
    pub phone_number: Option<String>,
}
