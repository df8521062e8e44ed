//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use crate::analysis::{LapBoundary, NormalizeOptions, TrainingLoadPolicy};
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID hosting Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived Strava refresh token used to mint access tokens
    pub strava_refresh_token: String,

    /// Training load policy for newly synced activities
    pub training_load_policy: TrainingLoadPolicy,
    /// How lap heart-rate windows treat boundary samples
    pub lap_boundary: LapBoundary,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,

            training_load_policy: match env::var("TRAINING_LOAD_POLICY") {
                Ok(v) => v.parse().map_err(|e| ConfigError::Invalid {
                    name: "TRAINING_LOAD_POLICY",
                    reason: e,
                })?,
                Err(_) => TrainingLoadPolicy::default(),
            },
            lap_boundary: match env::var("LAP_BOUNDARY") {
                Ok(v) => v.parse().map_err(|e| ConfigError::Invalid {
                    name: "LAP_BOUNDARY",
                    reason: e,
                })?,
                Err(_) => LapBoundary::default(),
            },
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            training_load_policy: TrainingLoadPolicy::ZoneBased,
            lap_boundary: LapBoundary::Inclusive,
        }
    }

    /// Metric options applied when normalizing synced activities.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            policy: self.training_load_policy,
            boundary: self.lap_boundary,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
