// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod block;
pub mod chart;
pub mod stream;
pub mod zones;

pub use activity::{Activity, Lap, NormalizedActivity, RawActivity, RawLap};
pub use block::Block;
pub use chart::{
    CalendarBlock, CalendarEntry, CalendarWeek, UnknownMetric, WeeklyMetric, WeeklyPoint,
    WeeklySeries,
};
pub use stream::SampleStream;
pub use zones::{ZoneProfile, ZoneThresholds};
