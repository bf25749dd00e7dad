use axum::{Json, Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::error::WebError;
use crate::features;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::home::handlers::get_event,
        features::register::handlers::get_register_page,
        features::register::handlers::submit_registration,
        features::dashboard::handlers::get_dashboard,
        features::results::handlers::get_results_page,
        features::results::handlers::submit_result,
        features::leaderboard::handlers::get_leaderboard,
        features::health::handlers::healthz,
    ),
    components(
        schemas(
            storage::dto::event::EventInfo,
            storage::dto::common::Flash,
            storage::dto::common::FlashKind,
            storage::dto::registration::RegistrationForm,
            storage::dto::registration::RegisterPage,
            storage::dto::dashboard::DashboardSummary,
            storage::dto::dashboard::CategoryBreakdown,
            storage::dto::dashboard::SchoolMedalTally,
            storage::dto::dashboard::PendingParticipant,
            storage::dto::dashboard::CategoryChart,
            storage::dto::results::ResultForm,
            storage::dto::results::ResultsPage,
            storage::dto::results::ParticipantListing,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::LeaderboardRow,
            storage::models::Category,
        )
    ),
    tags(
        (name = "event", description = "Event information"),
        (name = "registration", description = "Participant registration"),
        (name = "results", description = "Result entry"),
        (name = "reporting", description = "Dashboard and leaderboard"),
        (name = "health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(features::home::routes::routes())
        .merge(features::register::routes::routes())
        .merge(features::dashboard::routes::routes())
        .merge(features::results::routes::routes())
        .merge(features::leaderboard::routes::routes())
        .merge(features::health::routes::routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(|| async { WebError::NotFound })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::NaiveDate;
    use serde_json::Value;
    use storage::Database;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::state::Clock;

    async fn app() -> Router {
        app_with(&[], "2025-09-18").await
    }

    async fn app_with(env: &[(&str, &str)], today: &str) -> Router {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        let config = Config::from_lookup(|key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();
        let today = NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap();
        router(AppState::new(db, config, Clock::Fixed(today)))
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    const ANAN: &str =
        "first_name=Anan&last_name=Suk&school=Anan&category_id=1&competition_date=2025-09-20";

    #[tokio::test]
    async fn test_event_info() {
        let app = app().await;
        let (status, body) = get_json(&app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Competition Registration");
        assert_eq!(body["date"], "2025-09-30");
        assert_eq!(body["registration_open"], true);
    }

    #[tokio::test]
    async fn test_register_page_lists_categories() {
        let app = app().await;
        let (status, body) = get_json(&app, "/register").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"].as_array().unwrap().len(), 10);
        assert_eq!(body["categories"][0]["name"], "100m Run");
        assert_eq!(body["today"], "2025-09-18");
        assert_eq!(body["registration_deadline"], "2025-09-25");
        assert!(body["flash"].is_null());
    }

    #[tokio::test]
    async fn test_registration_flow_with_duplicate() {
        let app = app().await;

        let response = post_form(&app, "/register", ANAN).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/register?status=registered");

        let (_, page) = get_json(&app, "/register?status=registered").await;
        assert_eq!(page["flash"]["kind"], "success");
        assert_eq!(page["flash"]["message"], "Registration successful");

        let response = post_form(&app, "/register", ANAN).await;
        assert_eq!(location(&response), "/register?status=duplicate");

        let (_, page) = get_json(&app, "/register?status=duplicate").await;
        assert_eq!(page["flash"]["kind"], "error");
        assert_eq!(
            page["flash"]["message"],
            "This person is already registered for this category on that date"
        );

        let (_, dashboard) = get_json(&app, "/dashboard").await;
        assert_eq!(dashboard["total_participants"], 1);
        assert_eq!(dashboard["total_schools"], 1);
        assert_eq!(dashboard["pending_count"], 1);
        assert_eq!(dashboard["completion_pct"], 0.0);
    }

    #[tokio::test]
    async fn test_register_rejections_redirect_with_status() {
        let app = app().await;

        let response = post_form(
            &app,
            "/register",
            "first_name=Anan&last_name=Suk&school=Anan&category_id=1",
        )
        .await;
        assert_eq!(location(&response), "/register?status=incomplete");

        let response = post_form(
            &app,
            "/register",
            "first_name=Anan&last_name=Suk&school=Anan&category_id=1&competition_date=2025-10-02",
        )
        .await;
        assert_eq!(location(&response), "/register?status=date_after_event");

        let (_, dashboard) = get_json(&app, "/dashboard").await;
        assert_eq!(dashboard["total_participants"], 0);
    }

    #[tokio::test]
    async fn test_closed_registration_wins_over_malformed_form() {
        let app = app_with(&[("REG_OPEN", "0")], "2025-09-18").await;
        let response = post_form(&app, "/register", "first_name=Anan&category_id=abc").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/register?status=closed");

        let app = app_with(&[], "2025-09-26").await;
        let response = post_form(&app, "/register", "category_id=abc").await;
        assert_eq!(location(&response), "/register?status=deadline_passed");
    }

    #[tokio::test]
    async fn test_missing_text_fields_are_incomplete() {
        let app = app().await;
        let response = post_form(&app, "/register", "category_id=1").await;
        assert_eq!(location(&response), "/register?status=incomplete");
    }

    #[tokio::test]
    async fn test_non_integer_category_is_bad_request() {
        let app = app().await;
        let response = post_form(
            &app,
            "/register",
            "first_name=Anan&last_name=Suk&school=Anan&category_id=abc&competition_date=2025-09-20",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_record_result_and_reports() {
        let app = app().await;
        post_form(&app, "/register", ANAN).await;

        let (status, page) = get_json(&app, "/results?comp_date=2025-09-20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["comp_date"], "2025-09-20");
        assert_eq!(page["event_default"], "2025-09-20");
        let participants = page["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0]["full_name"], "Anan Suk");
        let id = participants[0]["id"].as_i64().unwrap();

        let response = post_form(
            &app,
            "/results?comp_date=2025-09-20&q=Anan%20Suk",
            &format!("participant_id={id}&rank=1&score=&note="),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/results?comp_date=2025-09-20&q=Anan%20Suk&status=recorded"
        );

        let (_, page) = get_json(&app, location(&response)).await;
        assert_eq!(page["flash"]["message"], "Result saved");
        assert_eq!(page["q"], "Anan Suk");

        let (_, board) = get_json(&app, "/leaderboard").await;
        let rows = board["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["rank"], 1);
        assert!(rows[0]["score"].is_null());
        assert_eq!(rows[0]["event_date"], "2025-09-18");

        let (_, dashboard) = get_json(&app, "/dashboard").await;
        assert_eq!(dashboard["results_count"], 1);
        assert_eq!(dashboard["completion_pct"], 100.0);
        assert_eq!(dashboard["pending_count"], 0);
        assert_eq!(dashboard["top_schools"][0]["school"], "Anan");
        assert_eq!(dashboard["top_schools"][0]["gold"], 1);
    }

    #[tokio::test]
    async fn test_result_rejections() {
        let app = app().await;
        post_form(&app, "/register", ANAN).await;

        let response = post_form(&app, "/results", "participant_id=1&rank=0").await;
        assert_eq!(location(&response), "/results?status=invalid_rank");

        let response = post_form(&app, "/results", "participant_id=42&rank=1").await;
        assert_eq!(location(&response), "/results?status=unknown_participant");

        let response = post_form(&app, "/results", "participant_id=1&rank=first").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_garbage_filters_are_ignored() {
        let app = app().await;

        let (status, dashboard) =
            get_json(&app, "/dashboard?date_from=garbage&date_to=2025-13-01").await;
        assert_eq!(status, StatusCode::OK);
        assert!(dashboard["date_from"].is_null());
        assert!(dashboard["date_to"].is_null());
        assert_eq!(dashboard["by_category"].as_array().unwrap().len(), 10);

        let (status, board) = get_json(&app, "/leaderboard?category_id=abc&date_from=x").await;
        assert_eq!(status, StatusCode::OK);
        assert!(board["selected_category"].is_null());

        let (status, page) = get_json(&app, "/results?comp_date=yesterday&category_id=-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["comp_date"], "2025-09-18");
        assert!(page["selected_category"].is_null());
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app().await;
        let (status, body) = get_json(&app, "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let app = app().await;
        let (status, body) = get_json(&app, "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resource not found");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = app().await;
        let (status, doc) = get_json(&app, "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/dashboard"].is_object());
        assert!(doc["paths"]["/results"]["post"].is_object());
    }
}
