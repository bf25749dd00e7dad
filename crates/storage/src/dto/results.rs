use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::{Flash, non_blank};
use crate::filter::{parse_date, parse_id};
use crate::models::Category;

/// Raw query string of the results page; parsed permissively.
#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultsQuery {
    pub comp_date: Option<String>,
    pub category_id: Option<String>,
    pub q: Option<String>,
    pub status: Option<String>,
}

impl ResultsQuery {
    /// Competition date defaults to `today`, also when unparseable.
    pub fn to_filter(&self, today: NaiveDate) -> ResultsListFilter {
        ResultsListFilter {
            competition_date: self
                .comp_date
                .as_deref()
                .and_then(parse_date)
                .unwrap_or(today),
            category_id: parse_id(self.category_id.as_deref()),
            search: non_blank(self.q.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsListFilter {
    pub competition_date: NaiveDate,
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ParticipantListing {
    pub id: i64,
    pub full_name: String,
    pub school: String,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsPage {
    pub participants: Vec<ParticipantListing>,
    pub categories: Vec<Category>,
    pub selected_category: Option<i64>,
    pub q: String,
    pub comp_date: NaiveDate,
    /// Default event date offered when recording a result.
    pub event_default: NaiveDate,
    pub flash: Option<Flash>,
}

/// Result entry form. `participant_id` and `rank` must be integers; the rest
/// is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResultForm {
    pub participant_id: i64,

    #[validate(range(min = 1, message = "Rank must be a positive integer"))]
    pub rank: i64,

    #[serde(default)]
    pub score: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub event_date: Option<String>,
}

impl ResultForm {
    /// Blank or non-numeric input means "no score".
    pub fn parsed_score(&self) -> Option<f64> {
        self.score
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|score| score.is_finite())
    }
}
