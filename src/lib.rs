// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training Log: a personal training journal backed by Strava
//!
//! This crate syncs activities, laps and heart-rate streams from Strava,
//! derives pace, per-lap heart rate and training load, and serves calendar
//! and weekly volume data for a training-log frontend.

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{StravaService, SyncService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub strava_service: StravaService,
}

impl AppState {
    /// Sync service wired to this state's storage and Strava session.
    pub fn sync_service(&self) -> SyncService {
        SyncService::new(
            self.strava_service.clone(),
            self.db.clone(),
            self.config.normalize_options(),
        )
    }
}
