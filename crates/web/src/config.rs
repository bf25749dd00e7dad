use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use storage::dto::event::EventInfo;
use storage::filter::parse_date;
use storage::services::registration::RegistrationPolicy;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub site_name: String,
    pub event_date: Option<NaiveDate>,
    pub event_location: String,
    pub registration_deadline: Option<NaiveDate>,
    pub registration_open: bool,
    pub debug: bool,
    pub open_browser: bool,
    /// Date settings that were present but unparseable, and are therefore ignored.
    pub ignored_dates: Vec<&'static str>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let flag = |key: &str, default: bool| lookup(key).map_or(default, |v| parse_bool(&v));

        let port = var("PORT", "5000");
        // an unparseable date disables the rule that depends on it
        let mut ignored_dates = Vec::new();
        let mut date = |key: &'static str, default: &str| {
            let raw = var(key, default);
            let parsed = parse_date(&raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                ignored_dates.push(key);
            }
            parsed
        };
        let event_date = date("EVENT_DATE", "2025-09-30");
        let registration_deadline = date("REG_DEADLINE", "2025-09-25");

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got '{port}'"))?,
            database_path: PathBuf::from(var("DB_PATH", "app.db")),
            site_name: var("SITE_NAME", "Competition Registration"),
            event_date,
            event_location: var("EVENT_LOCATION", "School Sports Ground"),
            registration_deadline,
            registration_open: flag("REG_OPEN", true),
            debug: flag("DEBUG", false) || flag("FLASK_DEBUG", false),
            open_browser: flag("OPEN_BROWSER", true) && lookup("RENDER").is_none(),
            ignored_dates,
        })
    }

    pub fn registration_policy(&self) -> RegistrationPolicy {
        RegistrationPolicy {
            open: self.registration_open,
            deadline: self.registration_deadline,
            event_date: self.event_date,
        }
    }

    pub fn event_info(&self) -> EventInfo {
        EventInfo {
            name: self.site_name.clone(),
            date: self.event_date,
            location: self.event_location.clone(),
            registration_deadline: self.registration_deadline,
            registration_open: self.registration_open,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}
