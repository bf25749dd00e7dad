use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{ParticipantId, ResultId};

#[derive(Debug, Clone)]
pub struct NewResult<'a> {
    pub participant_id: ParticipantId,
    pub rank: i64,
    pub score: Option<f64>,
    pub note: &'a str,
    pub event_date: NaiveDate,
}

pub struct ResultRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Always inserts a new row; earlier results for the participant are kept.
    pub async fn insert(&self, result: &NewResult<'_>) -> Result<ResultId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO result (participant_id, rank, score, note, event_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(result.participant_id)
        .bind(result.rank)
        .bind(result.score)
        .bind(result.note)
        .bind(result.event_date)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}
