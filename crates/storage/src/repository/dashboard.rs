use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::dto::dashboard::{
    CategoryBreakdown, CategoryChart, DashboardSummary, PendingParticipant, SchoolMedalTally,
    completion_pct,
};
use crate::error::Result;
use crate::filter::{DateRange, FilterBuilder, competition_date_filter, event_date_filter};

const TOP_SCHOOLS_LIMIT: i64 = 5;
const PENDING_LIST_LIMIT: i64 = 10;

const NO_RESULT: &str = "NOT EXISTS (SELECT 1 FROM result r WHERE r.participant_id = p.id)";

pub struct DashboardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DashboardRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Dashboard KPIs. Participant figures are filtered on competition date,
    /// result figures (result count, medal table) on event date.
    pub async fn summary(&self, range: &DateRange) -> Result<DashboardSummary> {
        let participants = competition_date_filter(range);
        let results = event_date_filter(range);

        let mut conn = self.pool.acquire().await?;

        let total_schools = count(
            &mut conn,
            "SELECT COUNT(DISTINCT p.school_id) FROM participant p",
            &participants,
        )
        .await?;

        let total_participants =
            count(&mut conn, "SELECT COUNT(*) FROM participant p", &participants).await?;

        let by_category = by_category(&mut conn, &participants).await?;

        let results_count = count(&mut conn, "SELECT COUNT(*) FROM result r", &results).await?;

        let completed = count(
            &mut conn,
            r#"
            SELECT COUNT(DISTINCT p.id)
            FROM participant p
            JOIN result r ON r.participant_id = p.id
            "#,
            &participants,
        )
        .await?;

        let top_schools = top_schools(&mut conn, &results).await?;

        let pending = participants.clone().and(NO_RESULT, vec![]);
        let pending_list = pending_list(&mut conn, &pending).await?;
        let pending_count =
            count(&mut conn, "SELECT COUNT(*) FROM participant p", &pending).await?;

        tracing::debug!(
            total_participants,
            completed,
            results_count,
            pending_count,
            "Computed dashboard summary"
        );

        Ok(DashboardSummary {
            date_from: range.from,
            date_to: range.to,
            total_schools,
            total_participants,
            chart: CategoryChart::from(by_category.as_slice()),
            by_category,
            results_count,
            completion_pct: completion_pct(completed, total_participants),
            top_schools,
            pending_list,
            pending_count,
        })
    }
}

async fn count(conn: &mut SqliteConnection, select: &str, filter: &FilterBuilder) -> Result<i64> {
    let mut query = QueryBuilder::<Sqlite>::new(select);
    filter.push_where(&mut query);

    let count = query
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Every category appears, including those without participants: the date
/// predicates belong to the join condition, not the WHERE clause.
async fn by_category(
    conn: &mut SqliteConnection,
    participants: &FilterBuilder,
) -> Result<Vec<CategoryBreakdown>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT c.id AS category_id,
               c.name,
               COUNT(p.id) AS participants,
               COUNT(DISTINCT p.school_id) AS schools
        FROM category c
        LEFT JOIN participant p ON p.category_id = c.id
        "#,
    );
    participants.push_into(&mut query, " AND ");
    query.push(" GROUP BY c.id, c.name ORDER BY c.id");

    let rows = query
        .build_query_as::<CategoryBreakdown>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}

async fn top_schools(
    conn: &mut SqliteConnection,
    results: &FilterBuilder,
) -> Result<Vec<SchoolMedalTally>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT s.name AS school,
               SUM(CASE WHEN r.rank = 1 THEN 1 ELSE 0 END) AS gold,
               SUM(CASE WHEN r.rank = 2 THEN 1 ELSE 0 END) AS silver,
               SUM(CASE WHEN r.rank = 3 THEN 1 ELSE 0 END) AS bronze,
               COUNT(r.id) AS total
        FROM result r
        JOIN participant p ON p.id = r.participant_id
        JOIN school s ON s.id = p.school_id
        "#,
    );
    results.push_where(&mut query);
    query.push(
        r#"
        GROUP BY s.id, s.name
        ORDER BY gold DESC, silver DESC, bronze DESC, total DESC, school ASC
        LIMIT
        "#,
    );
    query.push_bind(TOP_SCHOOLS_LIMIT);

    let rows = query
        .build_query_as::<SchoolMedalTally>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}

async fn pending_list(
    conn: &mut SqliteConnection,
    pending: &FilterBuilder,
) -> Result<Vec<PendingParticipant>> {
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
    pending.push_where(&mut query);
    query.push(" ORDER BY p.id DESC LIMIT ");
    query.push_bind(PENDING_LIST_LIMIT);

    let rows = query
        .build_query_as::<PendingParticipant>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}
