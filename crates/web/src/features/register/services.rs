use chrono::NaiveDate;
use sqlx::SqlitePool;
use storage::{
    dto::{
        common::Flash,
        registration::{RegisterPage, RegistrationForm},
    },
    error::Result,
    models::ParticipantId,
    repository::category::CategoryRepository,
    services::registration::{self, REGISTERED_CODE, RegistrationError, RegistrationPolicy},
};

/// Data for the registration form
pub async fn register_page(
    pool: &SqlitePool,
    policy: &RegistrationPolicy,
    today: NaiveDate,
    status: Option<&str>,
) -> Result<RegisterPage> {
    let categories = CategoryRepository::new(pool).list().await?;

    Ok(RegisterPage {
        categories,
        today,
        registration_open: policy.open,
        registration_deadline: policy.deadline,
        flash: status.and_then(flash_for_status),
    })
}

/// Register a participant
pub async fn register_participant(
    pool: &SqlitePool,
    policy: &RegistrationPolicy,
    today: NaiveDate,
    form: &RegistrationForm,
) -> std::result::Result<ParticipantId, RegistrationError> {
    registration::register(pool, policy, today, form).await
}

pub fn flash_for_status(status: &str) -> Option<Flash> {
    if status == REGISTERED_CODE {
        return Some(Flash::success("Registration successful"));
    }
    RegistrationError::from_code(status).map(|rejection| Flash::error(rejection.to_string()))
}
