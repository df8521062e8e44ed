// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heart-rate zone settings.

use crate::error::{AppError, Result};
use crate::models::ZoneProfile;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/zones", get(get_zones).put(put_zones))
}

/// Stored profile, or an empty one if none was saved.
async fn get_zones(State(state): State<Arc<AppState>>) -> Result<Json<ZoneProfile>> {
    let zones = state.db.get_zone_profile().await?.unwrap_or_default();
    Ok(Json(zones))
}

/// Zone profile update. Unset fields are stored as unset.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[validate(schema(function = "validate_zone_order"))]
pub struct ZoneProfileRequest {
    #[validate(range(min = 40, max = 250))]
    pub hr_max: Option<u32>,
    #[validate(range(min = 40, max = 250))]
    pub z1_limit: Option<u32>,
    #[validate(range(min = 40, max = 250))]
    pub z2_limit: Option<u32>,
    #[validate(range(min = 40, max = 250))]
    pub z3_limit: Option<u32>,
    #[validate(range(min = 40, max = 250))]
    pub z4_limit: Option<u32>,
}

/// Set limits must increase, and stay at or below the max heart rate.
fn validate_zone_order(request: &ZoneProfileRequest) -> std::result::Result<(), ValidationError> {
    let set: Vec<u32> = [
        request.z1_limit,
        request.z2_limit,
        request.z3_limit,
        request.z4_limit,
    ]
    .into_iter()
    .flatten()
    .collect();

    if set.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ValidationError::new("zone_limits_not_increasing"));
    }
    if let (Some(hr_max), Some(&highest)) = (request.hr_max, set.last()) {
        if highest > hr_max {
            return Err(ValidationError::new("zone_limit_above_hr_max"));
        }
    }
    Ok(())
}

impl From<ZoneProfileRequest> for ZoneProfile {
    fn from(request: ZoneProfileRequest) -> Self {
        ZoneProfile {
            hr_max: request.hr_max,
            z1_limit: request.z1_limit,
            z2_limit: request.z2_limit,
            z3_limit: request.z3_limit,
            z4_limit: request.z4_limit,
        }
    }
}

async fn put_zones(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ZoneProfileRequest>,
) -> Result<Json<ZoneProfile>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let zones = ZoneProfile::from(request);
    state.db.set_zone_profile(&zones).await?;
    tracing::info!(complete = zones.thresholds().is_some(), "Zone profile updated");

    Ok(Json(zones))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hr_max: Option<u32>, limits: [Option<u32>; 4]) -> ZoneProfileRequest {
        ZoneProfileRequest {
            hr_max,
            z1_limit: limits[0],
            z2_limit: limits[1],
            z3_limit: limits[2],
            z4_limit: limits[3],
        }
    }

    #[test]
    fn test_complete_profile_valid() {
        let req = request(Some(190), [Some(120), Some(140), Some(160), Some(175)]);
        assert!(req.validate().is_ok());
        assert!(ZoneProfile::from(req).thresholds().is_some());
    }

    #[test]
    fn test_partial_profile_valid() {
        assert!(request(None, [Some(120), None, Some(160), None])
            .validate()
            .is_ok());
        assert!(request(None, [None; 4]).validate().is_ok());
    }

    #[test]
    fn test_decreasing_limits_rejected() {
        let req = request(Some(190), [Some(140), Some(120), Some(160), Some(175)]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_limit_above_max_rejected() {
        let req = request(Some(170), [Some(120), Some(140), Some(160), Some(175)]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(request(Some(400), [None; 4]).validate().is_err());
    }
}
