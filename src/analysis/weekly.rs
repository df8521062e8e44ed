// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly volume aggregation for charts.

use crate::analysis::format::{distance_km, format_duration, format_km};
use crate::models::{Activity, WeeklyMetric, WeeklyPoint, WeeklySeries};
use crate::time_utils::{week_end, week_index};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

#[derive(Default)]
struct WeekTotals {
    km: f64,
    seconds: u64,
}

/// Sum activities into Sunday-ending weeks.
///
/// Weeks run contiguously from the first to the last week holding an
/// activity; weeks in between without activities are reported with a zero
/// value. Distances are rounded to two decimals per activity before being
/// summed, in date order. An empty input gives an empty series.
pub fn aggregate_weekly(
    activities: &[Activity],
    range_start: NaiveDate,
    metric: WeeklyMetric,
) -> Vec<WeeklyPoint> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by_key(|activity| activity.date);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    let mut weeks: BTreeMap<NaiveDate, WeekTotals> = BTreeMap::new();
    let last_week = week_end(last.date.date_naive());
    let mut week = week_end(first.date.date_naive());
    while week <= last_week {
        weeks.insert(week, WeekTotals::default());
        week += Duration::days(7);
    }

    for activity in &sorted {
        let totals = weeks
            .entry(week_end(activity.date.date_naive()))
            .or_default();
        totals.km += distance_km(activity.distance);
        totals.seconds += u64::from(activity.time_int);
    }

    weeks
        .into_iter()
        .map(|(week_end, totals)| {
            let index = week_index(week_end, range_start);
            let (value, hover) = match metric {
                WeeklyMetric::Distance => (totals.km, format_km(totals.km)),
                WeeklyMetric::Duration => (
                    totals.seconds as f64 / 3600.0,
                    format_duration(totals.seconds),
                ),
            };

            WeeklyPoint {
                week_end,
                week_index: index,
                week_label: format!("Week {}", index),
                value,
                hover,
            }
        })
        .collect()
}

/// Weekly aggregation plus the axis metadata used to draw it.
pub fn weekly_series(
    activities: &[Activity],
    range_start: NaiveDate,
    metric: WeeklyMetric,
) -> WeeklySeries {
    let points = aggregate_weekly(activities, range_start, metric);

    let y_range = points
        .iter()
        .map(|p| p.value)
        .fold(None, |range: Option<(f64, f64)>, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
        .map(|(min, max)| (min * 0.8, max * 1.2));

    WeeklySeries {
        metric,
        title: metric.title().to_string(),
        y_label: metric.y_label().to_string(),
        hover_label: metric.hover_label().to_string(),
        y_range,
        empty: points.is_empty(),
        points,
    }
}
