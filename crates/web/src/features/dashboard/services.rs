use sqlx::SqlitePool;
use storage::{
    dto::dashboard::{DashboardQuery, DashboardSummary},
    error::Result,
    repository::dashboard::DashboardRepository,
};

/// KPIs for the dashboard. Unparseable bounds are ignored.
pub async fn dashboard_summary(pool: &SqlitePool, query: &DashboardQuery) -> Result<DashboardSummary> {
    let range = query.date_range();
    DashboardRepository::new(pool).summary(&range).await
}
