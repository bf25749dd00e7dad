use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ordered result rows", body = LeaderboardResponse)
    ),
    tag = "reporting"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, WebError> {
    let response = services::leaderboard(db.pool(), &query).await?;
    Ok(Json(response).into_response())
}
