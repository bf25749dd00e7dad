use sqlx::SqlitePool;
use storage::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::Result,
    repository::{category::CategoryRepository, leaderboard::LeaderboardRepository},
};

pub async fn leaderboard(pool: &SqlitePool, query: &LeaderboardQuery) -> Result<LeaderboardResponse> {
    let filter = query.to_filter();

    let categories = CategoryRepository::new(pool).list().await?;
    let rows = LeaderboardRepository::new(pool).list(&filter).await?;

    Ok(LeaderboardResponse {
        categories,
        selected_category: filter.category_id,
        school_q: filter.school.unwrap_or_default(),
        date_from: filter.event_dates.from,
        date_to: filter.event_dates.to,
        rows,
    })
}
