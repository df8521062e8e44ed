// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turn raw Strava activities, laps and streams into storage records.

use crate::analysis::format::{format_duration, format_pace};
use crate::analysis::laps::{lap_avg_hr, LapBoundary};
use crate::analysis::training_load::TrainingLoadPolicy;
use crate::models::{
    Activity, Lap, NormalizedActivity, RawActivity, RawLap, SampleStream, ZoneProfile,
};
use chrono::{DateTime, Utc};

/// Deployment-wide choices that affect derived metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub policy: TrainingLoadPolicy,
    pub boundary: LapBoundary,
}

/// Upstream data that cannot be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid start_date '{value}' for activity {activity_id}: {source}")]
    InvalidStartDate {
        activity_id: u64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Build the activity record, computing its training load over the whole
/// stream.
pub fn normalize_activity(
    raw: &RawActivity,
    stream: &SampleStream,
    policy: TrainingLoadPolicy,
    zones: Option<&ZoneProfile>,
) -> Result<Activity, NormalizeError> {
    let date = DateTime::parse_from_rfc3339(&raw.start_date)
        .map_err(|source| NormalizeError::InvalidStartDate {
            activity_id: raw.id,
            value: raw.start_date.clone(),
            source,
        })?
        .with_timezone(&Utc);

    Ok(Activity {
        activity_id: raw.id,
        name: raw.name.clone(),
        distance: raw.distance,
        time_int: raw.moving_time,
        time: format_duration(u64::from(raw.moving_time)),
        pace: format_pace(raw.moving_time, raw.distance),
        activity_type: raw.activity_type.clone(),
        date,
        training_load: policy.estimate(stream, zones),
        session: false,
    })
}

/// Build lap records in input order, renumbered from 1.
///
/// Each lap's heart rate window starts where the previous laps' distances
/// add up to and spans the lap's own distance.
pub fn normalize_laps(
    activity_id: u64,
    raw_laps: &[RawLap],
    stream: &SampleStream,
    boundary: LapBoundary,
) -> Vec<Lap> {
    let mut cursor = 0.0;
    let mut laps = Vec::with_capacity(raw_laps.len());

    for (idx, raw) in raw_laps.iter().enumerate() {
        let begin = cursor;
        let end = begin + raw.distance;
        let avg_hr = lap_avg_hr(stream, begin, end, boundary);
        cursor = end;

        laps.push(Lap {
            lap_id: raw.id,
            activity_id,
            lap_idx: idx as u32 + 1,
            name: raw.name.clone(),
            distance: raw.distance,
            time_int: raw.moving_time,
            time: format_duration(u64::from(raw.moving_time)),
            pace: format_pace(raw.moving_time, raw.distance),
            avg_hr,
        });
    }

    laps
}

/// Normalize an activity together with its laps.
pub fn normalize(
    raw: &RawActivity,
    raw_laps: &[RawLap],
    stream: &SampleStream,
    options: NormalizeOptions,
    zones: Option<&ZoneProfile>,
) -> Result<NormalizedActivity, NormalizeError> {
    let activity = normalize_activity(raw, stream, options.policy, zones)?;
    let laps = normalize_laps(raw.id, raw_laps, stream, options.boundary);
    Ok(NormalizedActivity { activity, laps })
}
