// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Duration, pace and distance formatting.

/// Render seconds as "HH:MM:SS". Hours keep counting past 24.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Render pace as "MM:SS min/km", truncating to whole seconds per kilometer.
///
/// Returns `None` when there is no distance to divide by.
pub fn format_pace(moving_time_secs: u32, distance_meters: f64) -> Option<String> {
    if distance_meters <= 0.0 {
        return None;
    }

    let seconds_per_km = (f64::from(moving_time_secs) / (distance_meters / 1000.0)) as u64;
    Some(format!(
        "{:02}:{:02} min/km",
        seconds_per_km / 60,
        seconds_per_km % 60
    ))
}

/// Meters to kilometers, rounded to two decimals.
pub fn distance_km(distance_meters: f64) -> f64 {
    round2(distance_meters / 1000.0)
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Kilometer label as shown in chart hovers: "12.35 km", "10.0 km".
pub fn format_km(km: f64) -> String {
    let km = round2(km);
    if km.fract() == 0.0 {
        format!("{:.1} km", km)
    } else {
        format!("{} km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
    }

    #[test]
    fn test_format_duration_no_day_rollover() {
        assert_eq!(format_duration(90_000), "25:00:00");
        assert_eq!(format_duration(360_000 + 61), "100:01:01");
    }

    #[test]
    fn test_format_pace_exact() {
        assert_eq!(format_pace(300, 1000.0).as_deref(), Some("05:00 min/km"));
    }

    #[test]
    fn test_format_pace_truncates() {
        // 1000 s over 3 km = 333.33 s/km -> 05:33
        assert_eq!(format_pace(1000, 3000.0).as_deref(), Some("05:33 min/km"));
        // 299.9 s/km stays in the 4-minute bucket
        assert_eq!(format_pace(2999, 10_000.0).as_deref(), Some("04:59 min/km"));
    }

    #[test]
    fn test_format_pace_zero_distance() {
        assert_eq!(format_pace(100, 0.0), None);
        assert_eq!(format_pace(0, 0.0), None);
    }

    #[test]
    fn test_distance_km_rounds() {
        assert_eq!(distance_km(10_234.0), 10.23);
        assert_eq!(distance_km(10_235.6), 10.24);
        assert_eq!(distance_km(0.0), 0.0);
    }

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(12.345_6), "12.35 km");
        assert_eq!(format_km(10.0), "10.0 km");
        assert_eq!(format_km(7.5), "7.5 km");
    }
}
