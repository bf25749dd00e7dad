use chrono::NaiveDate;
use sqlx::SqlitePool;
use thiserror::Error;
use validator::Validate;

use crate::dto::results::ResultForm;
use crate::error::StorageError;
use crate::filter::parse_date;
use crate::models::ResultId;
use crate::repository::participant::ParticipantRepository;
use crate::repository::result::{NewResult, ResultRepository};

#[derive(Debug, Error)]
pub enum RecordResultError {
    #[error("Rank must be a positive integer")]
    InvalidRank,

    #[error("Invalid date format (expected YYYY-MM-DD)")]
    InvalidDate,

    #[error("Unknown participant")]
    UnknownParticipant,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub const RECORDED_CODE: &str = "recorded";

impl RecordResultError {
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRank => Some("invalid_rank"),
            Self::InvalidDate => Some("invalid_date"),
            Self::UnknownParticipant => Some("unknown_participant"),
            Self::Storage(_) => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_rank" => Some(Self::InvalidRank),
            "invalid_date" => Some(Self::InvalidDate),
            "unknown_participant" => Some(Self::UnknownParticipant),
            _ => None,
        }
    }
}

/// Stores one result row. A blank or non-numeric score is stored as NULL;
/// a missing event date falls back to `today`.
pub async fn record_result(
    pool: &SqlitePool,
    today: NaiveDate,
    form: &ResultForm,
) -> Result<ResultId, RecordResultError> {
    if form.validate().is_err() {
        return Err(RecordResultError::InvalidRank);
    }

    let event_date = match form.event_date.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(raw) => parse_date(raw).ok_or(RecordResultError::InvalidDate)?,
    };

    match ParticipantRepository::new(pool).find_by_id(form.participant_id).await {
        Ok(_) => {}
        Err(StorageError::NotFound) => return Err(RecordResultError::UnknownParticipant),
        Err(e) => return Err(e.into()),
    }

    let result = NewResult {
        participant_id: form.participant_id,
        rank: form.rank,
        score: form.parsed_score(),
        note: form.note.as_deref().unwrap_or_default(),
        event_date,
    };

    match ResultRepository::new(pool).insert(&result).await {
        Ok(id) => {
            tracing::info!(
                result_id = id,
                participant_id = form.participant_id,
                rank = form.rank,
                "Recorded result"
            );
            Ok(id)
        }
        Err(e) if e.is_foreign_key_violation() => Err(RecordResultError::UnknownParticipant),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, migrated_db, register, results_for};

    fn form(participant_id: i64, rank: i64, score: &str) -> ResultForm {
        ResultForm {
            participant_id,
            rank,
            score: Some(score.to_string()),
            note: None,
            event_date: None,
        }
    }

    #[tokio::test]
    async fn test_blank_score_is_stored_as_null() {
        let db = migrated_db().await;
        let pid = register(&db, "Anan", "Suk", "Anan", 1, "2025-09-20").await;

        record_result(db.pool(), date("2025-09-20"), &form(pid, 1, ""))
            .await
            .unwrap();

        let stored = results_for(&db, pid).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].score, None);
        assert_eq!(stored[0].note, "");
        assert_eq!(stored[0].event_date, Some(date("2025-09-20")));
    }

    #[tokio::test]
    async fn test_non_numeric_score_is_silently_dropped() {
        let db = migrated_db().await;
        let pid = register(&db, "Anan", "Suk", "Anan", 1, "2025-09-20").await;

        record_result(db.pool(), date("2025-09-20"), &form(pid, 2, "DNF"))
            .await
            .unwrap();

        let stored = results_for(&db, pid).await;
        assert_eq!(stored[0].score, None);
        assert_eq!(stored[0].rank, 2);
    }

    #[tokio::test]
    async fn test_every_call_inserts_a_row() {
        let db = migrated_db().await;
        let pid = register(&db, "Anan", "Suk", "Anan", 1, "2025-09-20").await;

        let mut entry = form(pid, 1, "12.34");
        entry.note = Some("wind +1.2".to_string());
        entry.event_date = Some("2025-09-21".to_string());

        let first = record_result(db.pool(), date("2025-09-20"), &entry)
            .await
            .unwrap();
        let second = record_result(db.pool(), date("2025-09-20"), &entry)
            .await
            .unwrap();
        assert_ne!(first, second);

        let stored = results_for(&db, pid).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].score, Some(12.34));
        assert_eq!(stored[1].note, "wind +1.2");
        assert_eq!(stored[1].event_date, Some(date("2025-09-21")));
    }

    #[tokio::test]
    async fn test_rejections() {
        let db = migrated_db().await;
        let pid = register(&db, "Anan", "Suk", "Anan", 1, "2025-09-20").await;
        let today = date("2025-09-20");

        let err = record_result(db.pool(), today, &form(pid, 0, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordResultError::InvalidRank));

        let mut bad_date = form(pid, 1, "");
        bad_date.event_date = Some("21.09.2025".to_string());
        let err = record_result(db.pool(), today, &bad_date).await.unwrap_err();
        assert!(matches!(err, RecordResultError::InvalidDate));

        let err = record_result(db.pool(), today, &form(pid + 100, 1, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordResultError::UnknownParticipant));

        let stored = results_for(&db, pid).await;
        assert!(stored.is_empty());
    }

    #[test]
    fn test_codes_round_trip() {
        for rejection in [
            RecordResultError::InvalidRank,
            RecordResultError::InvalidDate,
            RecordResultError::UnknownParticipant,
        ] {
            let code = rejection.code().unwrap();
            assert_eq!(RecordResultError::from_code(code).unwrap().code(), Some(code));
        }
        assert!(RecordResultError::from_code(RECORDED_CODE).is_none());
    }
}
