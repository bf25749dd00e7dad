use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::dto::results::{ParticipantListing, ResultsListFilter};
use crate::error::{Result, StorageError};
use crate::filter::FilterBuilder;
use crate::models::{Participant, ParticipantId, SchoolId};

/// Fields of a participant row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewParticipant<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub school_id: SchoolId,
    pub category_id: i64,
    pub competition_date: NaiveDate,
}

pub struct ParticipantRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a participant. Violating the natural-key index surfaces as a
    /// unique-violation [`StorageError`].
    pub async fn insert(&self, participant: &NewParticipant<'_>) -> Result<ParticipantId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO participant (first_name, last_name, school_id, category_id, competition_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(participant.first_name)
        .bind(participant.last_name)
        .bind(participant.school_id)
        .bind(participant.category_id)
        .bind(participant.competition_date)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    pub async fn find_by_id(&self, id: ParticipantId) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, first_name, last_name, school_id, category_id, competition_date
            FROM participant
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Participants competing on the filtered date, newest registration first.
    pub async fn list_for_results(
        &self,
        filter: &ResultsListFilter,
    ) -> Result<Vec<ParticipantListing>> {
        let predicates = FilterBuilder::new()
            .and_opt("p.competition_date = ?", Some(filter.competition_date))
            .and_opt("c.id = ?", filter.category_id)
            .and_contains(
                r"(p.first_name || ' ' || p.last_name LIKE ? ESCAPE '\' OR s.name LIKE ? ESCAPE '\')",
                filter.search.as_deref(),
            );

        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT p.id,
                   p.first_name || ' ' || p.last_name AS full_name,
                   s.name AS school,
                   c.name AS category
            FROM participant p
            JOIN school s ON s.id = p.school_id
            JOIN category c ON c.id = p.category_id
            "#,
        );
        predicates.push_where(&mut query);
        query.push(" ORDER BY p.id DESC");

        let rows = query
            .build_query_as::<ParticipantListing>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}
