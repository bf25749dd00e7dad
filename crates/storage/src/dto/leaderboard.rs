use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::common::non_blank;
use crate::filter::{DateRange, parse_id};
use crate::models::Category;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    pub category_id: Option<String>,
    /// Case-insensitive substring of the school name.
    pub school: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl LeaderboardQuery {
    pub fn to_filter(&self) -> LeaderboardFilter {
        LeaderboardFilter {
            category_id: parse_id(self.category_id.as_deref()),
            school: non_blank(self.school.as_deref()),
            event_dates: DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardFilter {
    pub category_id: Option<i64>,
    pub school: Option<String>,
    pub event_dates: DateRange,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardRow {
    pub result_id: i64,
    pub rank: i64,
    pub score: Option<f64>,
    pub note: String,
    pub event_date: Option<NaiveDate>,
    pub full_name: String,
    pub school: String,
    pub category_id: i64,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub categories: Vec<Category>,
    pub selected_category: Option<i64>,
    pub school_q: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub rows: Vec<LeaderboardRow>,
}
