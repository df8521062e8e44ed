// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity detail and editing.

use crate::analysis::{distance_km, LapRole};
use crate::error::{AppError, Result};
use crate::models::{Activity, Lap};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/activities/{id}",
            get(get_activity).delete(delete_activity),
        )
        .route("/api/activities/{id}/name", put(rename_activity))
        .route("/api/activities/{id}/session", post(toggle_session))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub date: String,
    pub distance_km: f64,
    pub time: String,
    pub pace: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub training_load: i64,
    pub session: bool,
}

impl From<&Activity> for ActivityResponse {
    fn from(activity: &Activity) -> Self {
        Self {
            activity_id: activity.activity_id,
            name: activity.name.clone(),
            activity_type: activity.activity_type.clone(),
            date: format_utc_rfc3339(activity.date),
            distance_km: distance_km(activity.distance),
            time: activity.time.clone(),
            pace: activity.pace.clone(),
            training_load: activity.training_load,
            session: activity.session,
        }
    }
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LapResponse {
    pub lap_idx: u32,
    /// Strava's lap name, or the interval role for session activities
    pub label: String,
    pub distance_km: f64,
    pub time: String,
    pub pace: Option<String>,
    pub avg_hr: u32,
    /// Work interval of a session
    pub is_rep: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityDetailResponse {
    pub activity: ActivityResponse,
    pub laps: Vec<LapResponse>,
}

/// Lap rows for display. Session activities get interval role labels.
pub fn lap_rows(activity: &Activity, laps: &[Lap]) -> Vec<LapResponse> {
    let total = laps.len() as u32;
    laps.iter()
        .map(|lap| {
            let role = activity
                .session
                .then(|| LapRole::for_lap(lap.lap_idx, total));
            LapResponse {
                lap_idx: lap.lap_idx,
                label: role.map_or_else(|| lap.name.clone(), |role| role.to_string()),
                distance_km: distance_km(lap.distance),
                time: lap.time.clone(),
                pace: lap.pace.clone(),
                avg_hr: lap.avg_hr,
                is_rep: role.is_some_and(|role| role.is_rep()),
            }
        })
        .collect()
}

async fn find_activity(state: &AppState, activity_id: u64) -> Result<Activity> {
    state
        .db
        .get_activity(activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))
}

/// Activity with its laps.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityDetailResponse>> {
    let activity = find_activity(&state, activity_id).await?;
    let laps = state.db.get_laps(activity_id).await?;

    Ok(Json(ActivityDetailResponse {
        activity: ActivityResponse::from(&activity),
        laps: lap_rows(&activity, &laps),
    }))
}

/// Remove an activity and its laps.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<StatusCode> {
    if !state.db.delete_activity(activity_id).await? {
        return Err(AppError::NotFound(format!(
            "Activity {} not found",
            activity_id
        )));
    }

    tracing::info!(activity_id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RenameRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

async fn rename_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ActivityResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be blank".to_string()));
    }

    let activity = state.db.rename_activity(activity_id, name).await?;
    tracing::info!(activity_id, "Activity renamed");
    Ok(Json(ActivityResponse::from(&activity)))
}

/// Flip the interval-session flag.
async fn toggle_session(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityResponse>> {
    let activity = state.db.toggle_session(activity_id).await?;
    tracing::info!(activity_id, session = activity.session, "Session flag toggled");
    Ok(Json(ActivityResponse::from(&activity)))
}
