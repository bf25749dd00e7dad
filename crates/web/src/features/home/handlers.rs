use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::event::EventInfo;

use crate::config::Config;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Event metadata", body = EventInfo)
    ),
    tag = "event"
)]
pub async fn get_event(State(config): State<Arc<Config>>) -> Response {
    Json(config.event_info()).into_response()
}
