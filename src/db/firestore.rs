// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Activities and their laps (normalized Strava data)
//! - Training blocks
//! - The athlete's heart-rate zone profile
//!
//! The handle is passed explicitly through `AppState`; every operation
//! acquires what it needs for its own duration only.

use crate::db::{collections, ZONES_DOC_ID};
use crate::error::AppError;
use crate::models::{Activity, Block, Lap, NormalizedActivity, ZoneProfile};
use crate::time_utils::start_of_day;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures_util::{stream, StreamExt};
use std::ops::Range;

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits a transaction to 500 writes.
const MAX_TRANSACTION_WRITES: usize = 500;
// Writes per sync transaction, leaving headroom under the limit.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Result of persisting a sync batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Activities written by this batch
    pub inserted: usize,
    /// Activities already stored, left untouched
    pub skipped: usize,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get an activity by Strava ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(&activity_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Laps of an activity, ordered by `lap_idx`.
    pub async fn get_laps(&self, activity_id: u64) -> Result<Vec<Lap>, AppError> {
        let mut laps: Vec<Lap> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LAPS)
            .filter(|q| q.for_all([q.field("activity_id").eq(activity_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        laps.sort_by_key(|lap| lap.lap_idx);
        Ok(laps)
    }

    /// Activities dated within `[start, end]`, both days included.
    pub async fn get_activities_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Activity>, AppError> {
        let from = firestore::FirestoreTimestamp(start_of_day(start));
        let until = firestore::FirestoreTimestamp(start_of_day(end + Duration::days(1)));

        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| {
                q.for_all([
                    q.field("date").greater_than_or_equal(from.clone()),
                    q.field("date").less_than(until.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every stored activity, oldest first.
    pub async fn get_all_activities(&self) -> Result<Vec<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Start date of the most recent stored activity.
    pub async fn latest_activity_date(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let latest: Vec<Activity> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(latest.first().map(|activity| activity.date))
    }

    /// Store a sync batch. New activities and their laps are written in
    /// transactions of at most `BATCH_SIZE` writes; an activity is never split
    /// from its laps.
    ///
    /// Activities that are already stored are skipped, keeping user edits
    /// (renames, session flag) intact. If a later transaction fails, earlier
    /// ones stay committed and a retry skips them.
    pub async fn insert_activities(
        &self,
        batch: &[NormalizedActivity],
    ) -> Result<InsertOutcome, AppError> {
        let client = self.get_client()?;

        // Existing activity lookups run concurrently, results keep batch order
        let ids: Vec<u64> = batch.iter().map(|n| n.activity.activity_id).collect();
        let existing = stream::iter(ids)
            .map(|id| async move { self.get_activity(id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<Activity>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<Activity>>, AppError>>()?;

        let new_items: Vec<&NormalizedActivity> = batch
            .iter()
            .zip(&existing)
            .filter(|(_, stored)| stored.is_none())
            .map(|(normalized, _)| normalized)
            .collect();

        let outcome = InsertOutcome {
            inserted: new_items.len(),
            skipped: batch.len() - new_items.len(),
        };

        if new_items.is_empty() {
            tracing::debug!(skipped = outcome.skipped, "Nothing new to store");
            return Ok(outcome);
        }

        let chunks = plan_write_chunks(&new_items)?;
        let chunk_count = chunks.len();

        for chunk in chunks {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for normalized in &new_items[chunk] {
                let activity = &normalized.activity;
                client
                    .fluent()
                    .update()
                    .in_col(collections::ACTIVITIES)
                    .document_id(activity.activity_id.to_string())
                    .object(activity)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add activity to transaction: {}", e))
                    })?;

                for lap in &normalized.laps {
                    client
                        .fluent()
                        .update()
                        .in_col(collections::LAPS)
                        .document_id(lap.lap_id.to_string())
                        .object(lap)
                        .add_to_transaction(&mut transaction)
                        .map_err(|e| {
                            AppError::Database(format!("Failed to add lap to transaction: {}", e))
                        })?;
                }
            }

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;
        }

        tracing::info!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            transactions = chunk_count,
            "Sync batch stored"
        );

        Ok(outcome)
    }

    /// Delete an activity together with its laps.
    ///
    /// Returns `false` if the activity did not exist.
    pub async fn delete_activity(&self, activity_id: u64) -> Result<bool, AppError> {
        if self.get_activity(activity_id).await?.is_none() {
            return Ok(false);
        }

        let laps = self.get_laps(activity_id).await?;
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for lap in &laps {
            client
                .fluent()
                .delete()
                .from(collections::LAPS)
                .document_id(lap.lap_id.to_string())
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add lap deletion to transaction: {}", e))
                })?;
        }

        client
            .fluent()
            .delete()
            .from(collections::ACTIVITIES)
            .document_id(activity_id.to_string())
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to add activity deletion to transaction: {}",
                    e
                ))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit deletion: {}", e)))?;

        tracing::info!(activity_id, laps = laps.len(), "Deleted activity");
        Ok(true)
    }

    /// Store an activity record (overwrites).
    pub async fn set_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(activity.activity_id.to_string())
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Rename an activity.
    pub async fn rename_activity(&self, activity_id: u64, name: &str) -> Result<Activity, AppError> {
        let mut activity = self
            .get_activity(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        activity.name = name.to_string();
        self.set_activity(&activity).await?;
        Ok(activity)
    }

    /// Flip the interval-session flag of an activity.
    pub async fn toggle_session(&self, activity_id: u64) -> Result<Activity, AppError> {
        let mut activity = self
            .get_activity(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        activity.session = !activity.session;
        self.set_activity(&activity).await?;
        Ok(activity)
    }

    // ─── Block Operations ────────────────────────────────────────

    /// All training blocks, newest first.
    pub async fn list_blocks(&self) -> Result<Vec<Block>, AppError> {
        let mut blocks: Vec<Block> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::BLOCKS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        blocks.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(blocks)
    }

    /// Get a block by ID.
    pub async fn get_block(&self, block_id: u64) -> Result<Option<Block>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::BLOCKS)
            .obj()
            .one(&block_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new block. Block names are unique.
    pub async fn add_block(&self, block: &Block) -> Result<(), AppError> {
        let name_taken = self
            .list_blocks()
            .await?
            .iter()
            .any(|existing| existing.name == block.name);
        if name_taken {
            return Err(AppError::BadRequest(format!(
                "A block named '{}' already exists",
                block.name
            )));
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::BLOCKS)
            .document_id(block.block_id.to_string())
            .object(block)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(block_id = block.block_id, name = %block.name, "Added block");
        Ok(())
    }

    /// Delete a block. Its activities are left in place.
    ///
    /// Returns `false` if the block did not exist.
    pub async fn delete_block(&self, block_id: u64) -> Result<bool, AppError> {
        if self.get_block(block_id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::BLOCKS)
            .document_id(block_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(block_id, "Deleted block");
        Ok(true)
    }

    // ─── Zone Profile ────────────────────────────────────────────

    /// The athlete's heart-rate zone profile, if one was ever saved.
    pub async fn get_zone_profile(&self) -> Result<Option<ZoneProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SETTINGS)
            .obj()
            .one(ZONES_DOC_ID)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the athlete's heart-rate zone profile.
    pub async fn set_zone_profile(&self, zones: &ZoneProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SETTINGS)
            .document_id(ZONES_DOC_ID)
            .object(zones)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Split activities into index ranges whose writes (one per activity plus one
/// per lap) fit in a transaction. Ranges are filled up to `BATCH_SIZE`; an
/// activity bigger than that gets a range of its own.
fn plan_write_chunks(items: &[&NormalizedActivity]) -> Result<Vec<Range<usize>>, AppError> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut writes = 0;

    for (idx, normalized) in items.iter().enumerate() {
        let item_writes = 1 + normalized.laps.len();
        if item_writes > MAX_TRANSACTION_WRITES {
            return Err(AppError::BadRequest(format!(
                "Activity {} has {} laps, more than can be stored together",
                normalized.activity.activity_id,
                normalized.laps.len()
            )));
        }

        if idx > start && writes + item_writes > BATCH_SIZE {
            chunks.push(start..idx);
            start = idx;
            writes = 0;
        }
        writes += item_writes;
    }

    if start < items.len() {
        chunks.push(start..items.len());
    }
    Ok(chunks)
}
