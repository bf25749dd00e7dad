use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::Database;

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Storage reachable"),
        (status = 500, description = "Storage unreachable")
    ),
    tag = "health"
)]
pub async fn healthz(State(db): State<Database>) -> Response {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => {
            tracing::error!("Health probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
