// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training block model: a named date range grouping activities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Training block stored in Firestore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Block {
    /// Document ID
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub block_id: u64,
    /// Block name (unique)
    pub name: String,
    /// First day of the block
    pub start_date: NaiveDate,
    /// Last day of the block (inclusive)
    pub end_date: NaiveDate,
}

impl Block {
    /// Whether a calendar day falls inside this block.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Display period, e.g. "2024-01-01 - 2024-03-31".
    pub fn period(&self) -> String {
        format!("{} - {}", self.start_date, self.end_date)
    }
}
