// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-second sensor samples for one activity.

use serde::Deserialize;

/// Time-aligned sample sequences: index `i` refers to the same instant in
/// every series. Series may be shorter than one another or empty (no HR
/// strap, manual activity); consumers only walk the common prefix.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SampleStream {
    /// Elapsed seconds since activity start
    #[serde(default)]
    pub time: Vec<u32>,
    /// Cumulative distance in meters
    #[serde(default)]
    pub distance: Vec<f64>,
    /// Heart rate in bpm
    #[serde(default)]
    pub heartrate: Vec<u32>,
}

impl SampleStream {
    /// Whether the stream carries any heart-rate samples.
    pub fn has_heartrate(&self) -> bool {
        !self.heartrate.is_empty()
    }

    /// `(time, heartrate)` pairs over the common length of both series.
    pub fn time_hr_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.time.iter().copied().zip(self.heartrate.iter().copied())
    }

    /// `(distance, heartrate)` pairs over the common length of both series.
    pub fn distance_hr_pairs(&self) -> impl Iterator<Item = (f64, u32)> + '_ {
        self.distance
            .iter()
            .copied()
            .zip(self.heartrate.iter().copied())
    }
}
