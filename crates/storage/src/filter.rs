//! Composable WHERE/JOIN predicates for the reporting queries.
//!
//! Predicate text and bound values are kept apart: a predicate is a SQL
//! fragment with `?` placeholders and the values that fill them. The builder
//! can render itself to plain text for inspection, or push itself into an
//! [`sqlx::QueryBuilder`] where every value goes through `push_bind`.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: &'static str,
    params: Vec<FilterValue>,
}

impl Predicate {
    pub fn new(sql: &'static str, params: Vec<FilterValue>) -> Self {
        debug_assert_eq!(
            sql.matches('?').count(),
            params.len(),
            "placeholder count must match parameter count in `{sql}`"
        );
        Self { sql, params }
    }
}

/// Ordered list of predicates joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    predicates: Vec<Predicate>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate unconditionally.
    pub fn and(mut self, sql: &'static str, params: Vec<FilterValue>) -> Self {
        self.predicates.push(Predicate::new(sql, params));
        self
    }

    /// Adds a single-placeholder predicate when `value` is present.
    pub fn and_opt<T: Into<FilterValue>>(self, sql: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.and(sql, vec![value.into()]),
            None => self,
        }
    }

    /// Adds a predicate whose every placeholder receives the same `LIKE`
    /// pattern built from `needle`, when a non-blank needle is present.
    pub fn and_contains(self, sql: &'static str, needle: Option<&str>) -> Self {
        match needle.map(str::trim).filter(|n| !n.is_empty()) {
            Some(needle) => {
                let pattern = like_pattern(needle);
                let params = (0..sql.matches('?').count())
                    .map(|_| FilterValue::Text(pattern.clone()))
                    .collect();
                self.and(sql, params)
            }
            None => self,
        }
    }

    /// Renders `<leading>p1 AND p2 ...` (empty when there are no predicates)
    /// together with the parameters in placeholder order.
    pub fn render(&self, leading: &str) -> (String, Vec<FilterValue>) {
        let mut sql = String::new();
        let mut params = Vec::new();

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if i == 0 { leading } else { " AND " });
            sql.push_str(predicate.sql);
            params.extend(predicate.params.iter().cloned());
        }

        (sql, params)
    }

    /// Pushes the predicates into `query`, binding every value.
    pub fn push_into(&self, query: &mut QueryBuilder<'_, Sqlite>, leading: &str) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            query.push(if i == 0 { leading } else { " AND " });

            let mut params = predicate.params.iter();
            let mut fragments = predicate.sql.split('?').peekable();
            while let Some(fragment) = fragments.next() {
                query.push(fragment);
                if fragments.peek().is_some()
                    && let Some(value) = params.next()
                {
                    push_value(query, value);
                }
            }
        }
    }

    pub fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        self.push_into(query, " WHERE ");
    }
}

fn push_value(query: &mut QueryBuilder<'_, Sqlite>, value: &FilterValue) {
    match value {
        FilterValue::Text(text) => query.push_bind(text.clone()),
        FilterValue::Int(number) => query.push_bind(*number),
        FilterValue::Date(date) => query.push_bind(*date),
    };
}

/// `%needle%` with LIKE wildcards escaped; pair with `ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Inclusive date range; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parses raw query-string bounds; bounds that are blank or not
    /// `YYYY-MM-DD` are dropped.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.and_then(parse_date),
            to: to.and_then(parse_date),
        }
    }
}

/// Parses an ISO calendar date, ignoring surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parses an optional positive id; anything else counts as "no filter".
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// Participant competition-date bounds.
pub fn competition_date_filter(range: &DateRange) -> FilterBuilder {
    FilterBuilder::new()
        .and_opt("p.competition_date >= ?", range.from)
        .and_opt("p.competition_date <= ?", range.to)
}

/// Result event-date bounds.
pub fn event_date_filter(range: &DateRange) -> FilterBuilder {
    FilterBuilder::new()
        .and_opt("r.event_date >= ?", range.from)
        .and_opt("r.event_date <= ?", range.to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_builder_renders_nothing() {
        let (sql, params) = FilterBuilder::new().render(" WHERE ");
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_predicates_keep_insertion_order() {
        let filter = FilterBuilder::new()
            .and_opt("c.id = ?", Some(3_i64))
            .and_opt("s.name = ?", None::<String>)
            .and_opt("r.event_date <= ?", Some(date("2025-09-30")));

        let (sql, params) = filter.render(" WHERE ");
        assert_eq!(sql, " WHERE c.id = ? AND r.event_date <= ?");
        assert_eq!(
            params,
            vec![FilterValue::Int(3), FilterValue::Date(date("2025-09-30"))]
        );
    }

    #[test]
    fn test_join_condition_leading() {
        let range = DateRange {
            from: Some(date("2025-09-01")),
            to: None,
        };
        let (sql, _) = competition_date_filter(&range).render(" AND ");
        assert_eq!(sql, " AND p.competition_date >= ?");
    }

    #[test]
    fn test_contains_binds_pattern_for_every_placeholder() {
        let filter = FilterBuilder::new().and_contains(
            "(name LIKE ? ESCAPE '\\' OR school LIKE ? ESCAPE '\\')",
            Some("  anan "),
        );
        let (_, params) = filter.render(" WHERE ");
        assert_eq!(
            params,
            vec![
                FilterValue::Text("%anan%".to_string()),
                FilterValue::Text("%anan%".to_string())
            ]
        );
    }

    #[test]
    fn test_blank_needle_adds_nothing() {
        let filter = FilterBuilder::new().and_contains("name LIKE ?", Some("   "));
        assert_eq!(filter, FilterBuilder::new());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_push_into_query_builder() {
        let filter = FilterBuilder::new()
            .and_opt("p.competition_date >= ?", Some(date("2025-09-01")))
            .and("r.id IS NULL", vec![]);

        let mut query = QueryBuilder::<Sqlite>::new("SELECT 1 FROM participant p");
        filter.push_where(&mut query);

        let sql = query.sql();
        assert!(sql.starts_with("SELECT 1 FROM participant p WHERE p.competition_date >= "));
        assert!(sql.ends_with(" AND r.id IS NULL"));
    }

    #[test]
    fn test_date_range_drops_invalid_bounds() {
        let range = DateRange::parse(Some("2025-13-01"), Some(" 2025-09-30 "));
        assert_eq!(range.from, None);
        assert_eq!(range.to, Some(date("2025-09-30")));

        assert_eq!(DateRange::parse(Some(""), None), DateRange::default());
    }

    #[test]
    fn test_parse_id_is_permissive() {
        assert_eq!(parse_id(Some("4")), Some(4));
        assert_eq!(parse_id(Some("abc")), None);
        assert_eq!(parse_id(Some("0")), None);
        assert_eq!(parse_id(None), None);
    }
}
