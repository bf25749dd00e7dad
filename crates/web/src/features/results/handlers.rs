use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use storage::{
    dto::results::{ResultForm, ResultsPage, ResultsQuery},
    services::result_recording::{RECORDED_CODE, RecordResultError},
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/results",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Participants awaiting results", body = ResultsPage)
    ),
    tag = "results"
)]
pub async fn get_results_page(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, WebError> {
    let page = services::results_page(state.db.pool(), state.clock.today(), &query).await?;
    Ok(Json(page).into_response())
}

#[utoipa::path(
    post,
    path = "/results",
    params(ResultsQuery),
    request_body(content = ResultForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /results with the filters and a status code"),
        (status = 400, description = "Participant id or rank is not an integer")
    ),
    tag = "results"
)]
pub async fn submit_result(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
    form: Result<Form<ResultForm>, FormRejection>,
) -> Result<Response, WebError> {
    let Form(form) = form.map_err(|e| WebError::BadRequest(e.body_text()))?;

    let outcome = services::record_result(state.db.pool(), state.clock.today(), &form).await;

    let status = match outcome {
        Ok(_) => RECORDED_CODE,
        Err(RecordResultError::Storage(e)) => return Err(e.into()),
        Err(rejection) => {
            tracing::info!(
                participant_id = form.participant_id,
                "Result rejected: {}",
                rejection
            );
            rejection.code().unwrap_or_default()
        }
    };

    Ok(Redirect::to(&services::results_location(&query, status)).into_response())
}
