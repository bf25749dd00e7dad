use axum::{Router, routing::get};

use super::handlers::{get_register_page, submit_registration};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/register", get(get_register_page).post(submit_registration))
}
