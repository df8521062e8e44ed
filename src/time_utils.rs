// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar weeks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The Sunday closing the Monday-to-Sunday week containing `day`.
pub fn week_end(day: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - i64::from(day.weekday().num_days_from_monday());
    day + Duration::days(days_to_sunday)
}

/// 1-based week number of `day` counted in 7-day steps from `start`.
pub fn week_index(day: NaiveDate, start: NaiveDate) -> i64 {
    (day - start).num_days().div_euclid(7) + 1
}

/// Midnight UTC of a calendar day.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Unix timestamp of midnight UTC of a calendar day.
pub fn unix_midnight(day: NaiveDate) -> i64 {
    start_of_day(day).timestamp()
}
