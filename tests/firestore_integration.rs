// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST` set). They share one emulator, so every test
//! uses fresh IDs.

use chrono::{NaiveDate, TimeZone, Utc};
use training_log::analysis::format_duration;
use training_log::models::{Activity, Block, Lap, NormalizedActivity, ZoneProfile};

mod common;
use common::{test_db, unique_id};

fn activity(id: u64, day: NaiveDate) -> NormalizedActivity {
    let date = Utc.from_utc_datetime(&day.and_hms_opt(7, 0, 0).unwrap());
    NormalizedActivity {
        activity: Activity {
            activity_id: id,
            name: format!("Run {}", id),
            distance: 2000.0,
            time_int: 600,
            time: format_duration(600),
            pace: Some("05:00 min/km".to_string()),
            activity_type: "Run".to_string(),
            date,
            training_load: 20,
            session: false,
        },
        laps: (1..=2)
            .map(|idx| Lap {
                lap_id: id * 10 + u64::from(idx),
                activity_id: id,
                lap_idx: idx,
                name: format!("Lap {}", idx),
                distance: 1000.0,
                time_int: 300,
                time: format_duration(300),
                pace: Some("05:00 min/km".to_string()),
                avg_hr: 150,
            })
            .collect(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_insert_then_skip_existing() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    let batch = [activity(id, date(2024, 2, 1))];

    let first = db.insert_activities(&batch).await.unwrap();
    assert_eq!((first.inserted, first.skipped), (1, 0));

    let stored = db.get_activity(id).await.unwrap().unwrap();
    assert_eq!(stored, batch[0].activity);

    let laps = db.get_laps(id).await.unwrap();
    let idxs: Vec<u32> = laps.iter().map(|lap| lap.lap_idx).collect();
    assert_eq!(idxs, [1, 2]);

    let second = db.insert_activities(&batch).await.unwrap();
    assert_eq!((second.inserted, second.skipped), (0, 1));
}

#[tokio::test]
async fn test_batch_larger_than_one_transaction() {
    require_emulator!();

    let db = test_db().await;
    let base = unique_id();
    // 150 activities x 3 writes each, more than one transaction holds
    let batch: Vec<_> = (0..150)
        .map(|offset| activity(base + offset * 100, date(2018, 1, 1)))
        .collect();

    let outcome = db.insert_activities(&batch).await.unwrap();
    assert_eq!((outcome.inserted, outcome.skipped), (150, 0));

    for normalized in &batch {
        let id = normalized.activity.activity_id;
        assert!(db.get_activity(id).await.unwrap().is_some());
        assert_eq!(db.get_laps(id).await.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_resync_keeps_user_edits() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    let batch = [activity(id, date(2024, 2, 2))];
    db.insert_activities(&batch).await.unwrap();

    db.rename_activity(id, "Hill repeats").await.unwrap();
    let toggled = db.toggle_session(id).await.unwrap();
    assert!(toggled.session);

    db.insert_activities(&batch).await.unwrap();
    let stored = db.get_activity(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Hill repeats");
    assert!(stored.session);
}

#[tokio::test]
async fn test_delete_cascades_to_laps() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    db.insert_activities(&[activity(id, date(2024, 2, 3))])
        .await
        .unwrap();

    assert!(db.delete_activity(id).await.unwrap());
    assert!(db.get_activity(id).await.unwrap().is_none());
    assert!(db.get_laps(id).await.unwrap().is_empty());

    assert!(!db.delete_activity(id).await.unwrap());
}

#[tokio::test]
async fn test_edits_on_missing_activity_not_found() {
    require_emulator!();

    let db = test_db().await;
    let id = unique_id();
    assert!(db.rename_activity(id, "x").await.is_err());
    assert!(db.toggle_session(id).await.is_err());
}

#[tokio::test]
async fn test_activities_between_includes_end_day() {
    require_emulator!();

    let db = test_db().await;
    let base = unique_id();
    let batch = [
        activity(base, date(2019, 6, 30)),
        activity(base + 1, date(2019, 7, 1)),
        activity(base + 2, date(2019, 7, 7)),
        activity(base + 3, date(2019, 7, 8)),
    ];
    db.insert_activities(&batch).await.unwrap();

    let ours: Vec<u64> = db
        .get_activities_between(date(2019, 7, 1), date(2019, 7, 7))
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.activity_id)
        .filter(|id| (base..base + 4).contains(id))
        .collect();
    assert_eq!(ours, [base + 1, base + 2]);
}

#[tokio::test]
async fn test_block_lifecycle() {
    require_emulator!();

    let db = test_db().await;
    let block_id = unique_id();
    let block = Block {
        block_id,
        name: format!("Block {}", block_id),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 2, 25),
    };

    db.add_block(&block).await.unwrap();
    assert_eq!(db.get_block(block_id).await.unwrap(), Some(block.clone()));
    assert!(db
        .list_blocks()
        .await
        .unwrap()
        .iter()
        .any(|b| b.block_id == block_id));

    let duplicate = Block {
        block_id: block_id + 1,
        ..block.clone()
    };
    assert!(db.add_block(&duplicate).await.is_err());

    assert!(db.delete_block(block_id).await.unwrap());
    assert!(db.get_block(block_id).await.unwrap().is_none());
    assert!(!db.delete_block(block_id).await.unwrap());
}

#[tokio::test]
async fn test_zone_profile_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let zones = ZoneProfile {
        hr_max: Some(190),
        z1_limit: Some(120),
        z2_limit: Some(140),
        z3_limit: None,
        z4_limit: Some(175),
    };

    db.set_zone_profile(&zones).await.unwrap();
    assert_eq!(db.get_zone_profile().await.unwrap(), Some(zones));
}
