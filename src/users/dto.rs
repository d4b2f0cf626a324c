use serde::Deserialize;
use time::Date;

use crate::auth::claims::Role;

/// Body for create and wholesale update. Fields are optional at the
/// deserialization layer so presence can be reported as a 400 rather than a
/// body-rejection; the handler requires all of them.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(default, with = "crate::date_only::option")]
    pub birthdate: Option<Date>,
    pub password: Option<String>,
}
