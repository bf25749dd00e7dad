use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::dto::leaderboard::{LeaderboardFilter, LeaderboardRow};
use crate::error::Result;
use crate::filter::event_date_filter;

pub struct LeaderboardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Every result row, ordered by category, rank, score (missing scores
    /// last) and most recent entry first.
    pub async fn list(&self, filter: &LeaderboardFilter) -> Result<Vec<LeaderboardRow>> {
        let predicates = event_date_filter(&filter.event_dates)
            .and_opt("c.id = ?", filter.category_id)
            .and_contains(r"s.name LIKE ? ESCAPE '\'", filter.school.as_deref());

        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT r.id AS result_id,
                   r.rank,
                   r.score,
                   r.note,
                   r.event_date,
                   p.first_name || ' ' || p.last_name AS full_name,
                   s.name AS school,
                   c.id AS category_id,
                   c.name AS category
            FROM result r
            JOIN participant p ON p.id = r.participant_id
            JOIN school s ON s.id = p.school_id
            JOIN category c ON c.id = p.category_id
            "#,
        );
        predicates.push_where(&mut query);
        query.push(" ORDER BY c.id ASC, r.rank ASC, r.score IS NULL, r.score DESC, r.id DESC");

        let rows = query
            .build_query_as::<LeaderboardRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}
