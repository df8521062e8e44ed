// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity sync service.
//!
//! Handles the ingestion workflow:
//! 1. List athlete activities in a date window from Strava
//! 2. Fetch laps and sample streams for each activity
//! 3. Normalize into activity/lap records (pace, lap heart rate, training load)
//! 4. Store new activities with their laps in Firestore transactions
//!
//! Fetch and normalization failures abort the batch before anything is
//! written.

use crate::analysis::{normalize, NormalizeOptions};
use crate::db::{FirestoreDb, InsertOutcome};
use crate::error::{AppError, Result};
use crate::models::{NormalizedActivity, RawActivity, RawLap, SampleStream, ZoneProfile};
use crate::services::StravaService;
use crate::time_utils::unix_midnight;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Days covered by a "sync latest" request, today included.
const LATEST_WINDOW_DAYS: i64 = 7;

/// Raw Strava data gathered for one activity.
#[derive(Debug, Clone)]
pub struct FetchedActivity {
    pub activity: RawActivity,
    pub laps: Vec<RawLap>,
    pub stream: SampleStream,
}

/// Result of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub after: NaiveDate,
    pub before: NaiveDate,
    /// Activities returned by Strava for the window
    pub fetched: usize,
    /// Newly stored activities
    pub inserted: usize,
    /// Activities that were already stored
    pub skipped: usize,
}

/// Pulls activities from Strava into storage.
pub struct SyncService {
    strava: StravaService,
    db: FirestoreDb,
    options: NormalizeOptions,
}

impl SyncService {
    pub fn new(strava: StravaService, db: FirestoreDb, options: NormalizeOptions) -> Self {
        Self {
            strava,
            db,
            options,
        }
    }

    /// Sync every activity started between `after` and `before` (UTC
    /// midnights).
    pub async fn sync_range(&self, after: NaiveDate, before: NaiveDate) -> Result<SyncOutcome> {
        if after >= before {
            return Err(AppError::BadRequest(format!(
                "Sync window is empty: {} is not before {}",
                after, before
            )));
        }

        tracing::info!(%after, %before, policy = %self.options.policy, "Starting sync");

        let zones = self.db.get_zone_profile().await?;
        if zones.as_ref().and_then(ZoneProfile::thresholds).is_none() {
            tracing::debug!("Zone profile incomplete; zone-based training load will be 0");
        }

        let summaries = self
            .strava
            .list_activities(unix_midnight(after), unix_midnight(before))
            .await?;
        let fetched_count = summaries.len();

        let mut fetched = Vec::with_capacity(fetched_count);
        for activity in summaries {
            let (laps, stream) = tokio::try_join!(
                self.strava.get_laps(activity.id),
                self.strava.get_streams(activity.id),
            )?;
            tracing::debug!(
                activity_id = activity.id,
                laps = laps.len(),
                samples = stream.time.len(),
                has_heartrate = stream.has_heartrate(),
                "Fetched activity data"
            );
            fetched.push(FetchedActivity {
                activity,
                laps,
                stream,
            });
        }

        let batch = normalize_batch(&fetched, self.options, zones.as_ref())?;
        let InsertOutcome { inserted, skipped } = self.db.insert_activities(&batch).await?;

        tracing::info!(
            fetched = fetched_count,
            inserted,
            skipped,
            "Sync complete"
        );

        Ok(SyncOutcome {
            after,
            before,
            fetched: fetched_count,
            inserted,
            skipped,
        })
    }

    /// Sync the recent window: from the later of six days ago and the most
    /// recent stored activity, through today.
    pub async fn sync_latest(&self, today: NaiveDate) -> Result<SyncOutcome> {
        let latest = self
            .db
            .latest_activity_date()
            .await?
            .map(|date| date.date_naive());
        let (after, before) = sync_window(today, latest);
        self.sync_range(after, before).await
    }
}

/// Normalize every fetched activity, failing the whole batch on the first
/// malformed record.
pub fn normalize_batch(
    fetched: &[FetchedActivity],
    options: NormalizeOptions,
    zones: Option<&ZoneProfile>,
) -> Result<Vec<NormalizedActivity>> {
    fetched
        .iter()
        .map(|item| {
            normalize(&item.activity, &item.laps, &item.stream, options, zones)
                .map_err(AppError::from)
        })
        .collect()
}

/// Date window for a "sync latest" request: `(after, before)`.
pub fn sync_window(today: NaiveDate, latest: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let week_before = today - Duration::days(LATEST_WINDOW_DAYS - 1);
    let after = latest.map_or(week_before, |latest| latest.max(week_before));
    (after, today + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{LapBoundary, TrainingLoadPolicy};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fetched(id: u64, start_date: &str) -> FetchedActivity {
        FetchedActivity {
            activity: RawActivity {
                id,
                name: format!("Run {}", id),
                moving_time: 600,
                distance: 2000.0,
                activity_type: "Run".to_string(),
                start_date: start_date.to_string(),
            },
            laps: vec![
                RawLap {
                    id: id * 10 + 1,
                    name: "Lap 1".to_string(),
                    moving_time: 300,
                    distance: 1000.0,
                },
                RawLap {
                    id: id * 10 + 2,
                    name: "Lap 2".to_string(),
                    moving_time: 300,
                    distance: 1000.0,
                },
            ],
            stream: SampleStream {
                time: vec![0, 300, 600],
                distance: vec![0.0, 1000.0, 2000.0],
                heartrate: vec![130, 140, 150],
            },
        }
    }

    #[test]
    fn test_sync_window_without_history() {
        assert_eq!(
            sync_window(date(2024, 3, 10), None),
            (date(2024, 3, 4), date(2024, 3, 11))
        );
    }

    #[test]
    fn test_sync_window_uses_latest_when_recent() {
        assert_eq!(
            sync_window(date(2024, 3, 10), Some(date(2024, 3, 8))),
            (date(2024, 3, 8), date(2024, 3, 11))
        );
        assert_eq!(
            sync_window(date(2024, 3, 10), Some(date(2024, 1, 1))),
            (date(2024, 3, 4), date(2024, 3, 11))
        );
    }

    #[test]
    fn test_normalize_batch_keeps_order() {
        let items = vec![
            fetched(1, "2024-03-01T07:00:00Z"),
            fetched(2, "2024-03-02T07:00:00Z"),
        ];
        let options = NormalizeOptions {
            policy: TrainingLoadPolicy::ConstantPhysiology,
            boundary: LapBoundary::Inclusive,
        };

        let batch = normalize_batch(&items, options, None).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].activity.activity_id, 1);
        assert_eq!(batch[1].activity.activity_id, 2);
        assert_eq!(batch[1].laps[1].lap_id, 22);
        assert!(batch[0].activity.training_load > 0);
        // [0, 1000]: 130, 140 ; [1000, 2000]: 140, 150
        assert_eq!(batch[0].laps[0].avg_hr, 135);
        assert_eq!(batch[0].laps[1].avg_hr, 145);
    }

    #[test]
    fn test_normalize_batch_fails_on_any_bad_record() {
        let items = vec![
            fetched(1, "2024-03-01T07:00:00Z"),
            fetched(2, "not a date"),
        ];

        let err = normalize_batch(&items, NormalizeOptions::default(), None).unwrap_err();
        assert!(matches!(err, AppError::Normalize(_)));
    }
}
