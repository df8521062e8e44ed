// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart-ready weekly aggregates and calendar grids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Quantity summed per week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WeeklyMetric {
    /// Kilometers
    #[serde(rename = "distance_km")]
    Distance,
    /// Hours of moving time
    #[serde(rename = "time")]
    Duration,
}

impl WeeklyMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeeklyMetric::Distance => "distance_km",
            WeeklyMetric::Duration => "time",
        }
    }

    /// Y axis label of the plotted value.
    pub fn y_label(&self) -> &'static str {
        match self {
            WeeklyMetric::Distance => "Distance (km)",
            WeeklyMetric::Duration => "Time (h)",
        }
    }

    /// Label preceding the hover text.
    pub fn hover_label(&self) -> &'static str {
        match self {
            WeeklyMetric::Distance => "Distance",
            WeeklyMetric::Duration => "Time",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WeeklyMetric::Distance => "Weekly Training Volume (Distance)",
            WeeklyMetric::Duration => "Weekly Training Volume (Time)",
        }
    }
}

impl fmt::Display for WeeklyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeeklyMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance_km" | "distance" => Ok(WeeklyMetric::Distance),
            "time" | "duration" => Ok(WeeklyMetric::Duration),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown chart metric: {0} (expected distance_km or time)")]
pub struct UnknownMetric(pub String);

/// One point of the weekly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyPoint {
    /// Sunday closing the week
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub week_end: NaiveDate,
    /// 1-based week number relative to the range start
    pub week_index: i64,
    /// "Week N"
    pub week_label: String,
    /// Kilometers or hours
    pub value: f64,
    /// "12.5 km" or "05:30:00"
    pub hover: String,
}

/// Weekly series plus the axis metadata needed to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklySeries {
    pub metric: WeeklyMetric,
    pub title: String,
    pub y_label: String,
    pub hover_label: String,
    /// `[min * 0.8, max * 1.2]` of the plotted values
    pub y_range: Option<(f64, f64)>,
    /// True when there is nothing to plot
    pub empty: bool,
    pub points: Vec<WeeklyPoint>,
}

/// Activity reference shown in a calendar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: u64,
    pub name: String,
}

/// One row of a block calendar: seven day columns, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarWeek {
    pub week_no: i64,
    pub days: [Vec<CalendarEntry>; 7],
}

/// A block (or the unassigned remainder) with its calendar grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarBlock {
    /// `None` for the unassigned remainder
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub block_id: Option<u64>,
    pub name: String,
    pub period: String,
    pub activity_count: usize,
    pub weeks: Vec<CalendarWeek>,
}
