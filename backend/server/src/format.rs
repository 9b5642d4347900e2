//! # Formatting
//!
//! Conversions from Odoo's stored encodings to what the dashboard shows.
//!
//! - Time windows are float hours: `8.5` is 08:30.
//! - Datetimes are naive `YYYY-MM-DD HH:MM:SS` strings in UTC.
//! - Dates are ISO `YYYY-MM-DD`, displayed Swiss style `DD.MM.YYYY`.
//!
//! None of these fail. Bad input falls back to an empty string, `None`, or
//! the input itself.
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const REFERENCE_TZ: Tz = chrono_tz::Europe::Zurich;

const MINUTES_PER_DAY: i64 = 24 * 60;

pub fn hours_to_minutes(hours: Option<f64>) -> Option<i64> {
    hours
        .filter(|h| h.is_finite())
        .map(|h| (h * 60.0).round_ties_even() as i64)
}

pub fn hours_to_clock(hours: Option<f64>) -> String {
    let Some(minutes) = hours_to_minutes(hours) else {
        return String::new();
    };

    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);

    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn iso_date_to_display(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_naive(raw).map(|dt| dt.date()))
        .map(|date| date.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Tz>> {
    parse_naive(raw).map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&REFERENCE_TZ))
}

pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&REFERENCE_TZ)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim().replacen(' ', "T", 1);

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(&raw, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
