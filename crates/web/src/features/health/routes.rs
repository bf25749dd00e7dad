use axum::{Router, routing::get};

use super::handlers::healthz;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}
