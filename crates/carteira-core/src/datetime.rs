use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

const TIMEZONE_CONFIG_FILE: &str = "carteira-time.toml";
const TIMEZONE_ENV_VAR: &str = "CARTEIRA_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str = "CARTEIRA_TIME_CONFIG";
const DEFAULT_PROJECT_TIMEZONE: &str = "America/Sao_Paulo";

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
    timezone: Option<String>,
    time: Option<TimezoneSection>,
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
    timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Today,
    Tomorrow,
    Week,
    Month,
}

impl Period {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Period::All),
            "today" => Some(Period::Today),
            "tomorrow" => Some(Period::Tomorrow),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::Tomorrow => "tomorrow",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

pub fn project_timezone() -> &'static Tz {
    static PROJECT_TZ: OnceLock<Tz> = OnceLock::new();
    PROJECT_TZ.get_or_init(resolve_project_timezone)
}

#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(project_timezone()).date_naive()
}

#[must_use]
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let reversed = format!("{year}-{month}-{day}");
    NaiveDate::parse_from_str(&reversed, "%Y-%m-%d").ok()
}

#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[must_use]
pub fn compare_display_dates(a: &str, b: &str) -> Ordering {
    match (parse_display_date(a), parse_display_date(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => Ordering::Equal,
    }
}

#[must_use]
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> Option<&'static str> {
    match date.signed_duration_since(today).num_days() {
        -1 => Some("Ontem"),
        0 => Some("Hoje"),
        1 => Some("Amanhã"),
        _ => None,
    }
}

#[must_use]
pub fn period_bounds(period: Period, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match period {
        Period::All => None,
        Period::Today => Some((today, today)),
        Period::Tomorrow => {
            let tomorrow = today.checked_add_signed(Duration::days(1))?;
            Some((tomorrow, tomorrow))
        }
        Period::Week => {
            let offset = i64::from(today.weekday().num_days_from_sunday());
            let start = today.checked_sub_signed(Duration::days(offset))?;
            let end = start.checked_add_signed(Duration::days(6))?;
            Some((start, end))
        }
        Period::Month => {
            let start = today.with_day(1)?;
            let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
            Some((start, end))
        }
    }
}

#[must_use]
pub fn in_period(text: &str, period: Period, today: NaiveDate) -> bool {
    let Some((start, end)) = period_bounds(period, today) else {
        return true;
    };
    parse_display_date(text).is_some_and(|date| date >= start && date <= end)
}

fn resolve_project_timezone() -> Tz {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR)
    {
        return tz;
    }

    if let Some(path) = timezone_config_path()
        && let Some(tz) = load_timezone_from_file(&path)
    {
        return tz;
    }

    match DEFAULT_PROJECT_TIMEZONE.parse::<Tz>() {
        Ok(tz) => tz,
        Err(err) => {
            tracing::error!(error = %err, "failed to parse fallback timezone; using UTC");
            chrono_tz::UTC
        }
    }
}

fn timezone_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(TIMEZONE_CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(TIMEZONE_CONFIG_FILE))
}

fn load_timezone_from_file(path: &Path) -> Option<Tz> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "timezone config file not found");
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(file = %path.display(), error = %err, "failed reading timezone config");
            return None;
        }
    };

    let parsed: TimezoneConfig = match toml::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(file = %path.display(), error = %err, "failed parsing timezone config");
            return None;
        }
    };

    let timezone = parsed
        .timezone
        .or_else(|| parsed.time.and_then(|section| section.timezone));
    let Some(timezone) = timezone else {
        tracing::warn!(file = %path.display(), "timezone config had no timezone field");
        return None;
    };

    parse_timezone(&timezone, "config file")
}

fn parse_timezone(raw: &str, source: &str) -> Option<Tz> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::warn!(source, "timezone source was empty");
        return None;
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => {
            tracing::info!(source, timezone = %trimmed, "configured project timezone");
            Some(tz)
        }
        Err(err) => {
            tracing::error!(source, timezone = %trimmed, error = %err, "failed to parse timezone id");
            None
        }
    }
}
