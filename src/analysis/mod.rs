// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived training metrics.
//!
//! Everything in here is synchronous and free of I/O: raw samples and
//! records go in, storage records and chart series come out.

pub mod calendar;
pub mod format;
pub mod laps;
pub mod normalize;
pub mod training_load;
pub mod weekly;

pub use calendar::{block_grid, calendar_blocks};
pub use format::{distance_km, format_duration, format_pace};
pub use laps::{lap_avg_hr, LapBoundary, LapRole};
pub use normalize::{normalize, normalize_activity, normalize_laps, NormalizeError, NormalizeOptions};
pub use training_load::TrainingLoadPolicy;
pub use weekly::{aggregate_weekly, weekly_series};
