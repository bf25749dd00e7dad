use chrono::NaiveDate;
use sqlx::SqlitePool;
use storage::{
    dto::{
        common::Flash,
        results::{ResultForm, ResultsPage, ResultsQuery},
    },
    error::Result,
    models::ResultId,
    repository::{category::CategoryRepository, participant::ParticipantRepository},
    services::result_recording::{self, RECORDED_CODE, RecordResultError},
};

/// Participants registered for the filtered competition date, newest first.
pub async fn results_page(
    pool: &SqlitePool,
    today: NaiveDate,
    query: &ResultsQuery,
) -> Result<ResultsPage> {
    let filter = query.to_filter(today);

    let participants = ParticipantRepository::new(pool)
        .list_for_results(&filter)
        .await?;
    let categories = CategoryRepository::new(pool).list().await?;

    Ok(ResultsPage {
        participants,
        categories,
        selected_category: filter.category_id,
        q: filter.search.unwrap_or_default(),
        comp_date: filter.competition_date,
        event_default: filter.competition_date,
        flash: query.status.as_deref().and_then(flash_for_status),
    })
}

pub async fn record_result(
    pool: &SqlitePool,
    today: NaiveDate,
    form: &ResultForm,
) -> std::result::Result<ResultId, RecordResultError> {
    result_recording::record_result(pool, today, form).await
}

pub fn flash_for_status(status: &str) -> Option<Flash> {
    if status == RECORDED_CODE {
        return Some(Flash::success("Result saved"));
    }
    RecordResultError::from_code(status).map(|rejection| Flash::error(rejection.to_string()))
}

/// Redirect target after a submission: the list filters exactly as received,
/// plus the outcome code.
pub fn results_location(query: &ResultsQuery, status: &str) -> String {
    let filters = [
        ("comp_date", query.comp_date.as_deref()),
        ("category_id", query.category_id.as_deref()),
        ("q", query.q.as_deref()),
    ];

    let mut params: Vec<String> = filters
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
        .collect();
    params.push(format!("status={status}"));

    format!("/results?{}", params.join("&"))
}
