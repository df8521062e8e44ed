// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training load estimation from a heart-rate stream.
//!
//! Two policies are available and a deployment picks exactly one of them:
//!
//! - `ZoneBased`: minutes spent in each of the athlete's five heart-rate
//!   zones, weighted 1..=5 by zone number. Needs a complete zone profile and
//!   yields 0 without one.
//! - `ConstantPhysiology`: Banister's exponential TRIMP with a fixed resting
//!   (60 bpm) and maximum (205 bpm) heart rate. Ignores the zone profile.
//!
//! Both walk consecutive sample pairs, weight the elapsed minutes by the
//! later sample's heart rate, and truncate the total to an integer.

use crate::models::{SampleStream, ZoneProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resting heart rate assumed by the constant-physiology policy.
pub const RESTING_HR: f64 = 60.0;
/// Maximum heart rate assumed by the constant-physiology policy.
pub const MAX_HR: f64 = 205.0;

const TRIMP_SCALE: f64 = 0.64;
const TRIMP_EXPONENT: f64 = 1.92;

/// Training load policy, chosen once per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLoadPolicy {
    /// Zone-weighted minutes using the athlete's zone profile
    #[default]
    ZoneBased,
    /// Exponential TRIMP with fixed resting/max heart rate
    ConstantPhysiology,
}

impl TrainingLoadPolicy {
    /// Estimate the training load of one activity.
    ///
    /// Empty and single-sample streams yield 0. Timestamps are assumed to be
    /// non-decreasing; out-of-order input is not detected.
    pub fn estimate(&self, stream: &SampleStream, zones: Option<&ZoneProfile>) -> i64 {
        match self {
            TrainingLoadPolicy::ZoneBased => zone_weighted_load(stream, zones),
            TrainingLoadPolicy::ConstantPhysiology => exponential_trimp(stream),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLoadPolicy::ZoneBased => "zones",
            TrainingLoadPolicy::ConstantPhysiology => "constant",
        }
    }
}

impl fmt::Display for TrainingLoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingLoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zones" | "zone" | "zone_based" => Ok(TrainingLoadPolicy::ZoneBased),
            "constant" | "constant_physiology" | "trimp" => {
                Ok(TrainingLoadPolicy::ConstantPhysiology)
            }
            other => Err(format!(
                "Unknown training load policy '{}' (expected 'zones' or 'constant')",
                other
            )),
        }
    }
}

/// Consecutive `(delta_minutes, hr)` steps, `hr` being the later sample's.
fn steps(stream: &SampleStream) -> impl Iterator<Item = (f64, u32)> + '_ {
    let pairs: Vec<(u32, u32)> = stream.time_hr_pairs().collect();
    (1..pairs.len()).map(move |i| {
        let (prev_time, _) = pairs[i - 1];
        let (time, hr) = pairs[i];
        let delta_minutes = (f64::from(time) - f64::from(prev_time)) / 60.0;
        (delta_minutes, hr)
    })
}

fn zone_weighted_load(stream: &SampleStream, zones: Option<&ZoneProfile>) -> i64 {
    let Some(thresholds) = zones.and_then(ZoneProfile::thresholds) else {
        return 0;
    };

    let load: f64 = steps(stream)
        .map(|(delta_minutes, hr)| delta_minutes * f64::from(thresholds.zone_for(hr)))
        .sum();

    load as i64
}

fn exponential_trimp(stream: &SampleStream) -> i64 {
    let load: f64 = steps(stream)
        .filter_map(|(delta_minutes, hr)| {
            let hr_ratio = (f64::from(hr) - RESTING_HR) / (MAX_HR - RESTING_HR);
            (hr_ratio > 0.0).then(|| {
                delta_minutes * hr_ratio * TRIMP_SCALE * (TRIMP_EXPONENT * hr_ratio).exp()
            })
        })
        .sum();

    load as i64
}
