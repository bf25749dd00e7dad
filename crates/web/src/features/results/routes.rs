use axum::{Router, routing::get};

use super::handlers::{get_results_page, submit_result};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/results", get(get_results_page).post(submit_result))
}
