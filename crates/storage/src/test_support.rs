//! Fixtures shared by the in-crate tests.

use chrono::NaiveDate;
use sqlx::FromRow;

use crate::Database;
use crate::models::{ParticipantId, ResultId};
use crate::repository::participant::{NewParticipant, ParticipantRepository};
use crate::repository::result::{NewResult, ResultRepository};
use crate::repository::school::SchoolRepository;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub async fn migrated_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

pub async fn register(
    db: &Database,
    first_name: &str,
    last_name: &str,
    school: &str,
    category_id: i64,
    competition_date: &str,
) -> ParticipantId {
    let school_id = SchoolRepository::new(db.pool())
        .resolve_or_create(school)
        .await
        .unwrap();

    ParticipantRepository::new(db.pool())
        .insert(&NewParticipant {
            first_name,
            last_name,
            school_id,
            category_id,
            competition_date: date(competition_date),
        })
        .await
        .unwrap()
}

pub async fn record(
    db: &Database,
    participant_id: ParticipantId,
    rank: i64,
    score: Option<f64>,
    event_date: &str,
) -> ResultId {
    ResultRepository::new(db.pool())
        .insert(&NewResult {
            participant_id,
            rank,
            score,
            note: "",
            event_date: date(event_date),
        })
        .await
        .unwrap()
}

/// A stored result row as read back by assertions.
#[derive(Debug, FromRow)]
pub struct StoredResult {
    pub rank: i64,
    pub score: Option<f64>,
    pub note: String,
    pub event_date: Option<NaiveDate>,
}

pub async fn results_for(db: &Database, participant_id: ParticipantId) -> Vec<StoredResult> {
    sqlx::query_as::<_, StoredResult>(
        "SELECT rank, score, note, event_date FROM result WHERE participant_id = ? ORDER BY id",
    )
    .bind(participant_id)
    .fetch_all(db.pool())
    .await
    .unwrap()
}
