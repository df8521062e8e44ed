//! Athlete heart-rate zone profile.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-athlete heart-rate thresholds. Any field may be unset.
///
/// Stored at: `settings/zones`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ZoneProfile {
    #[serde(default)]
    pub hr_max: Option<u32>,
    /// Upper bound (exclusive) of zone 1
    #[serde(default)]
    pub z1_limit: Option<u32>,
    #[serde(default)]
    pub z2_limit: Option<u32>,
    #[serde(default)]
    pub z3_limit: Option<u32>,
    #[serde(default)]
    pub z4_limit: Option<u32>,
}

/// A fully populated zone profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneThresholds {
    pub hr_max: u32,
    pub limits: [u32; 4],
}

impl ZoneProfile {
    /// Thresholds if every field is set, `None` otherwise.
    pub fn thresholds(&self) -> Option<ZoneThresholds> {
        Some(ZoneThresholds {
            hr_max: self.hr_max?,
            limits: [
                self.z1_limit?,
                self.z2_limit?,
                self.z3_limit?,
                self.z4_limit?,
            ],
        })
    }
}

impl ZoneThresholds {
    /// Zone number (1-5) for a heart rate; zone 5 is everything at or above
    /// the z4 limit.
    pub fn zone_for(&self, hr: u32) -> u32 {
        self.limits
            .iter()
            .position(|&limit| hr < limit)
            .map_or(5, |idx| idx as u32 + 1)
    }
}
