// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync triggers.

use crate::error::Result;
use crate::services::SyncOutcome;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sync", post(sync_range))
        .route("/api/sync/latest", post(sync_latest))
}

/// Date window to import. `before` is exclusive.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncRequest {
    pub after: NaiveDate,
    pub before: NaiveDate,
}

/// Import every Strava activity in the requested window.
async fn sync_range(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncOutcome>> {
    tracing::info!(after = %request.after, before = %request.before, "Sync requested");

    let outcome = state
        .sync_service()
        .sync_range(request.after, request.before)
        .await?;

    Ok(Json(outcome))
}

/// Import the past week, starting no earlier than the newest stored activity.
async fn sync_latest(State(state): State<Arc<AppState>>) -> Result<Json<SyncOutcome>> {
    let today = Utc::now().date_naive();
    tracing::info!(%today, "Latest sync requested");

    let outcome = state.sync_service().sync_latest(today).await?;
    Ok(Json(outcome))
}
