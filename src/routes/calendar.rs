// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training calendar grouped by block.

use crate::analysis::calendar_blocks;
use crate::error::Result;
use crate::models::CalendarBlock;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/calendar", get(get_calendar))
}

/// Every stored activity laid out on week grids, newest block first.
async fn get_calendar(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CalendarBlock>>> {
    let (activities, blocks) =
        tokio::try_join!(state.db.get_all_activities(), state.db.list_blocks())?;

    tracing::debug!(
        activities = activities.len(),
        blocks = blocks.len(),
        "Building calendar"
    );

    Ok(Json(calendar_blocks(&activities, &blocks)))
}
