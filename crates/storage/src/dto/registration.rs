use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::Flash;
use crate::models::Category;

/// Registration form as submitted. Every text field is required after trimming;
/// a missing one decodes as blank.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegistrationForm {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub last_name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub school: String,

    pub category_id: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub competition_date: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Query string of the registration page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegisterPageQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterPage {
    pub categories: Vec<Category>,
    pub today: NaiveDate,
    pub registration_open: bool,
    pub registration_deadline: Option<NaiveDate>,
    pub flash: Option<Flash>,
}
