use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use storage::{
    dto::registration::{RegisterPage, RegisterPageQuery, RegistrationForm},
    services::registration::{REGISTERED_CODE, RegistrationError},
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/register",
    params(RegisterPageQuery),
    responses(
        (status = 200, description = "Categories and registration status", body = RegisterPage)
    ),
    tag = "registration"
)]
pub async fn get_register_page(
    State(state): State<AppState>,
    Query(query): Query<RegisterPageQuery>,
) -> Result<Response, WebError> {
    let page = services::register_page(
        state.db.pool(),
        &state.config.registration_policy(),
        state.clock.today(),
        query.status.as_deref(),
    )
    .await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegistrationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /register with a status code"),
        (status = 400, description = "Malformed form")
    ),
    tag = "registration"
)]
pub async fn submit_registration(
    State(state): State<AppState>,
    form: Result<Form<RegistrationForm>, FormRejection>,
) -> Result<Response, WebError> {
    let policy = state.config.registration_policy();
    let today = state.clock.today();

    let outcome = match policy.check_window(today) {
        Err(rejection) => Err(rejection),
        Ok(()) => {
            let Form(form) = form.map_err(|e| WebError::BadRequest(e.body_text()))?;
            services::register_participant(state.db.pool(), &policy, today, &form).await
        }
    };

    let status = match outcome {
        Ok(_) => REGISTERED_CODE,
        Err(RegistrationError::Storage(e)) => return Err(e.into()),
        Err(rejection) => {
            tracing::info!("Registration rejected: {}", rejection);
            rejection.code().unwrap_or_default()
        }
    };

    Ok(Redirect::to(&format!("/register?status={status}")).into_response())
}
