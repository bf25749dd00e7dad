use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::filter::DateRange;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Inclusive lower bound, `YYYY-MM-DD`. Ignored when unparseable.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`. Ignored when unparseable.
    pub date_to: Option<String>,
}

impl DashboardQuery {
    pub fn date_range(&self) -> DateRange {
        DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub name: String,
    pub participants: i64,
    pub schools: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolMedalTally {
    pub school: String,
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingParticipant {
    pub id: i64,
    pub full_name: String,
    pub school: String,
    pub category: String,
}

/// Parallel series for the per-category chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CategoryChart {
    pub labels: Vec<String>,
    pub participant_counts: Vec<i64>,
    pub school_counts: Vec<i64>,
}

impl From<&[CategoryBreakdown]> for CategoryChart {
    fn from(rows: &[CategoryBreakdown]) -> Self {
        Self {
            labels: rows.iter().map(|r| r.name.clone()).collect(),
            participant_counts: rows.iter().map(|r| r.participants).collect(),
            school_counts: rows.iter().map(|r| r.schools).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub total_schools: i64,
    pub total_participants: i64,
    pub by_category: Vec<CategoryBreakdown>,
    pub results_count: i64,
    pub completion_pct: f64,
    pub top_schools: Vec<SchoolMedalTally>,
    pub pending_list: Vec<PendingParticipant>,
    pub pending_count: i64,
    pub chart: CategoryChart,
}

/// Share of participants with at least one result, in percent with one
/// decimal. Zero participants yields 0.0.
pub fn completion_pct(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = (completed.clamp(0, total) as f64) * 100.0 / (total as f64);
    (pct * 10.0).round() / 10.0
}
