// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training blocks and their weekly volume charts.

use crate::analysis::weekly_series;
use crate::error::{AppError, Result};
use crate::models::{Block, UnknownMetric, WeeklyMetric, WeeklySeries};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blocks", get(list_blocks).post(add_block))
        .route("/api/blocks/{id}", delete(delete_block))
        .route("/api/blocks/{id}/chart", get(block_chart))
        .route("/api/chart", get(period_chart))
}

async fn list_blocks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Block>>> {
    Ok(Json(state.db.list_blocks().await?))
}

#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateBlockRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CreateBlockRequest {
    /// Build the block to store, checking the name and date order.
    pub fn into_block(self, block_id: u64) -> Result<Block> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Block name must not be blank".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(AppError::BadRequest(format!(
                "Block ends ({}) before it starts ({})",
                self.end_date, self.start_date
            )));
        }

        Ok(Block {
            block_id,
            name: name.to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

async fn add_block(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<Block>)> {
    let block_id = u64::try_from(Utc::now().timestamp_millis())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Clock before Unix epoch: {}", e)))?;
    let block = request.into_block(block_id)?;

    state.db.add_block(&block).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

async fn delete_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<u64>,
) -> Result<StatusCode> {
    if !state.db.delete_block(block_id).await? {
        return Err(AppError::NotFound(format!("Block {} not found", block_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn default_metric() -> String {
    WeeklyMetric::Distance.as_str().to_string()
}

fn parse_metric(value: &str) -> Result<WeeklyMetric> {
    value
        .parse()
        .map_err(|e: UnknownMetric| AppError::BadRequest(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct BlockChartQuery {
    #[serde(rename = "type", default = "default_metric")]
    pub metric: String,
}

/// Weekly volume across a block, weeks numbered from the block start.
async fn block_chart(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<u64>,
    Query(query): Query<BlockChartQuery>,
) -> Result<Json<WeeklySeries>> {
    let metric = parse_metric(&query.metric)?;
    let block = state
        .db
        .get_block(block_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Block {} not found", block_id)))?;

    let activities = state
        .db
        .get_activities_between(block.start_date, block.end_date)
        .await?;
    tracing::debug!(
        block_id,
        %metric,
        activities = activities.len(),
        "Building block chart"
    );

    Ok(Json(weekly_series(&activities, block.start_date, metric)))
}

#[derive(Debug, Deserialize)]
pub struct PeriodChartQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "type", default = "default_metric")]
    pub metric: String,
}

/// Weekly volume across an arbitrary date range.
async fn period_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodChartQuery>,
) -> Result<Json<WeeklySeries>> {
    let metric = parse_metric(&query.metric)?;
    if query.end < query.start {
        return Err(AppError::BadRequest(format!(
            "Chart range ends ({}) before it starts ({})",
            query.end, query.start
        )));
    }

    let activities = state
        .db
        .get_activities_between(query.start, query.end)
        .await?;

    Ok(Json(weekly_series(&activities, query.start, metric)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(name: &str, start: NaiveDate, end: NaiveDate) -> CreateBlockRequest {
        CreateBlockRequest {
            name: name.to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_into_block_trims_name() {
        let block = request("  Base  ", date(2024, 1, 1), date(2024, 2, 25))
            .into_block(7)
            .unwrap();
        assert_eq!(block.block_id, 7);
        assert_eq!(block.name, "Base");
    }

    #[test]
    fn test_single_day_block_allowed() {
        assert!(request("Race", date(2024, 5, 5), date(2024, 5, 5))
            .into_block(1)
            .is_ok());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let err = request("Base", date(2024, 2, 1), date(2024, 1, 1))
            .into_block(1)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_blank_name_rejected() {
        for name in ["", "   "] {
            let err = request(name, date(2024, 1, 1), date(2024, 1, 2))
                .into_block(1)
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("distance_km").unwrap(), WeeklyMetric::Distance);
        assert_eq!(parse_metric("time").unwrap(), WeeklyMetric::Duration);
        assert!(matches!(
            parse_metric("pace"),
            Err(AppError::BadRequest(_))
        ));
    }
}
