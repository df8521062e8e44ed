// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-lap heart rate from the activity stream, and lap roles for interval
//! sessions.

use crate::models::SampleStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which samples on a lap's distance window edges belong to the lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapBoundary {
    /// `begin <= d <= end`. A sample sitting exactly on a lap boundary counts
    /// towards both neighbouring laps. Matches laps already stored.
    #[default]
    Inclusive,
    /// `begin <= d < end`. Every sample belongs to at most one lap.
    HalfOpen,
}

impl LapBoundary {
    fn contains(&self, distance: f64, begin: f64, end: f64) -> bool {
        match self {
            LapBoundary::Inclusive => begin <= distance && distance <= end,
            LapBoundary::HalfOpen => begin <= distance && distance < end,
        }
    }
}

impl FromStr for LapBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inclusive" => Ok(LapBoundary::Inclusive),
            "half_open" | "half-open" => Ok(LapBoundary::HalfOpen),
            other => Err(format!(
                "Unknown lap boundary '{}' (expected 'inclusive' or 'half_open')",
                other
            )),
        }
    }
}

/// Mean heart rate of the samples whose cumulative distance falls within
/// `[begin_meters, end_meters]`, truncated to whole bpm.
///
/// Returns 0 when the stream has no heart rate, when no sample falls in the
/// window, or when the mean is not a finite number.
pub fn lap_avg_hr(
    stream: &SampleStream,
    begin_meters: f64,
    end_meters: f64,
    boundary: LapBoundary,
) -> u32 {
    if !stream.has_heartrate() {
        return 0;
    }

    let (sum, count) = stream
        .distance_hr_pairs()
        .filter(|&(distance, _)| boundary.contains(distance, begin_meters, end_meters))
        .fold((0.0_f64, 0_u32), |(sum, count), (_, hr)| {
            (sum + f64::from(hr), count + 1)
        });

    if count == 0 {
        return 0;
    }

    let mean = sum / f64::from(count);
    if mean.is_finite() {
        mean as u32
    } else {
        0
    }
}

/// Role of a lap within a structured interval session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapRole {
    WarmUp,
    /// Work interval, numbered from 1
    Rep(u32),
    Rest,
    Cooldown,
}

impl LapRole {
    /// Role of lap `lap_idx` (1-based) out of `total_laps`: the first lap is
    /// the warm-up, the last the cool-down, and the laps in between
    /// alternate rep (even index) and rest (odd index).
    pub fn for_lap(lap_idx: u32, total_laps: u32) -> Self {
        if lap_idx == 1 {
            LapRole::WarmUp
        } else if lap_idx == total_laps {
            LapRole::Cooldown
        } else if lap_idx % 2 == 0 {
            LapRole::Rep(lap_idx / 2)
        } else {
            LapRole::Rest
        }
    }

    pub fn is_rep(&self) -> bool {
        matches!(self, LapRole::Rep(_))
    }
}

impl fmt::Display for LapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapRole::WarmUp => f.write_str("Warm-Up"),
            LapRole::Rep(n) => write!(f, "Rep {}", n),
            LapRole::Rest => f.write_str("Rest"),
            LapRole::Cooldown => f.write_str("Cooldown"),
        }
    }
}
