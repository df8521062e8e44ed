// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity and lap models: raw Strava payloads and normalized storage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity summary as returned by Strava's athlete activity list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawActivity {
    pub id: u64,
    pub name: String,
    /// Moving time in seconds
    pub moving_time: u32,
    /// Distance in meters
    pub distance: f64,
    #[serde(rename = "type")]
    pub activity_type: String,
    /// ISO 8601 start date (UTC, "Z" suffix)
    pub start_date: String,
}

/// Lap as returned by Strava's activity laps endpoint, in lap order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLap {
    pub id: u64,
    pub name: String,
    pub moving_time: u32,
    pub distance: f64,
}

/// Normalized activity stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID (also used as document ID)
    pub activity_id: u64,
    pub name: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub time_int: u32,
    /// `time_int` rendered as "HH:MM:SS"
    pub time: String,
    /// "MM:SS min/km", absent for zero-distance activities
    pub pace: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub date: DateTime<Utc>,
    pub training_load: i64,
    /// Interval session flag; switches lap display to warm-up/rep/rest roles
    #[serde(default)]
    pub session: bool,
}

/// Normalized lap stored in Firestore, owned by an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Strava lap ID (also used as document ID)
    pub lap_id: u64,
    pub activity_id: u64,
    /// 1-based position within the activity
    pub lap_idx: u32,
    pub name: String,
    pub distance: f64,
    pub time_int: u32,
    pub time: String,
    pub pace: Option<String>,
    /// Mean heart rate over the lap's distance window (0 without HR data)
    pub avg_hr: u32,
}

/// An activity together with its laps, ready to be persisted as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedActivity {
    pub activity: Activity,
    pub laps: Vec<Lap>,
}
