use chrono::NaiveDate;
use sqlx::SqlitePool;
use thiserror::Error;
use validator::Validate;

use crate::dto::registration::RegistrationForm;
use crate::error::StorageError;
use crate::filter::parse_date;
use crate::models::ParticipantId;
use crate::repository::category::CategoryRepository;
use crate::repository::participant::{NewParticipant, ParticipantRepository};
use crate::repository::school::SchoolRepository;

/// Registration rules fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPolicy {
    pub open: bool,
    pub deadline: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
}

impl RegistrationPolicy {
    /// Whether submissions are accepted on `today`, whatever their content.
    pub fn check_window(&self, today: NaiveDate) -> Result<(), RegistrationError> {
        if !self.open {
            return Err(RegistrationError::Closed);
        }

        if let Some(deadline) = self.deadline
            && today > deadline
        {
            return Err(RegistrationError::DeadlinePassed);
        }

        Ok(())
    }
}

/// Why a registration was not stored. Every variant except `Storage` is an
/// expected outcome reported back to the submitter.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Sorry, registration is currently closed")]
    Closed,

    #[error("The registration deadline has passed")]
    DeadlinePassed,

    #[error("Please fill in all fields, including the competition date")]
    Incomplete,

    #[error("Invalid date format (expected YYYY-MM-DD)")]
    InvalidDate,

    #[error("The competition date must not be after the event date")]
    DateAfterEvent,

    #[error("This person is already registered for this category on that date")]
    Duplicate,

    #[error("Unknown category")]
    UnknownCategory,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub const REGISTERED_CODE: &str = "registered";

impl RegistrationError {
    /// Short code carried in the redirect; `None` for storage failures.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Closed => Some("closed"),
            Self::DeadlinePassed => Some("deadline_passed"),
            Self::Incomplete => Some("incomplete"),
            Self::InvalidDate => Some("invalid_date"),
            Self::DateAfterEvent => Some("date_after_event"),
            Self::Duplicate => Some("duplicate"),
            Self::UnknownCategory => Some("unknown_category"),
            Self::Storage(_) => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "closed" => Some(Self::Closed),
            "deadline_passed" => Some(Self::DeadlinePassed),
            "incomplete" => Some(Self::Incomplete),
            "invalid_date" => Some(Self::InvalidDate),
            "date_after_event" => Some(Self::DateAfterEvent),
            "duplicate" => Some(Self::Duplicate),
            "unknown_category" => Some(Self::UnknownCategory),
            _ => None,
        }
    }
}

/// Checks the form against `policy` in a fixed order, then stores the
/// participant, creating the school on first use. Nothing is written unless
/// the category exists.
pub async fn register(
    pool: &SqlitePool,
    policy: &RegistrationPolicy,
    today: NaiveDate,
    form: &RegistrationForm,
) -> Result<ParticipantId, RegistrationError> {
    policy.check_window(today)?;

    if form.validate().is_err() {
        return Err(RegistrationError::Incomplete);
    }

    let competition_date =
        parse_date(&form.competition_date).ok_or(RegistrationError::InvalidDate)?;

    if let Some(event_date) = policy.event_date
        && competition_date > event_date
    {
        return Err(RegistrationError::DateAfterEvent);
    }

    match CategoryRepository::new(pool).find_by_id(form.category_id).await {
        Ok(_) => {}
        Err(StorageError::NotFound) => return Err(RegistrationError::UnknownCategory),
        Err(e) => return Err(e.into()),
    }

    let school_id = SchoolRepository::new(pool)
        .resolve_or_create(form.school.trim())
        .await?;

    let participant = NewParticipant {
        first_name: form.first_name.trim(),
        last_name: form.last_name.trim(),
        school_id,
        category_id: form.category_id,
        competition_date,
    };

    match ParticipantRepository::new(pool).insert(&participant).await {
        Ok(id) => {
            tracing::info!(participant_id = id, school_id, "Registered participant");
            Ok(id)
        }
        Err(e) if e.is_unique_violation() => Err(RegistrationError::Duplicate),
        Err(e) if e.is_foreign_key_violation() => Err(RegistrationError::UnknownCategory),
        Err(e) => Err(e.into()),
    }
}
