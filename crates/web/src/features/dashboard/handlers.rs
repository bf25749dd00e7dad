use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::dashboard::{DashboardQuery, DashboardSummary},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard KPIs", body = DashboardSummary)
    ),
    tag = "reporting"
)]
pub async fn get_dashboard(
    State(db): State<Database>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let summary = services::dashboard_summary(db.pool(), &query).await?;
    Ok(Json(summary).into_response())
}
