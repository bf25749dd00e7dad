use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static event metadata shown on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventInfo {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub registration_deadline: Option<NaiveDate>,
    pub registration_open: bool,
}
