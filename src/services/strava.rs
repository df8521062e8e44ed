// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities, laps and streams.
//!
//! Handles:
//! - Paginated activity listing for a date window
//! - Lap and sample stream fetching per activity
//! - Access token refresh from the configured refresh token
//! - Rate limit detection

use crate::error::AppError;
use crate::models::{RawActivity, RawLap, SampleStream};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Page size used when listing activities.
pub const ACTIVITIES_PER_PAGE: u32 = 50;

/// Stream series requested for every activity.
const STREAM_KEYS: &str = "time,distance,heartrate";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            client_id,
            client_secret,
        }
    }

    /// List one page of the athlete's activities started within
    /// `(after, before)` (Unix timestamps).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        before: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("before", before.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get the laps of an activity, in lap order.
    pub async fn get_laps(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Vec<RawLap>, AppError> {
        let url = format!("{}/activities/{}/laps", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get the time, distance and heart rate streams of an activity.
    ///
    /// Activities without recorded streams (manual entries) come back as an
    /// empty stream.
    pub async fn get_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<SampleStream, AppError> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", STREAM_KEYS), ("key_by_type", "true")])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(activity_id, "Activity has no streams");
            return Ok(SampleStream::default());
        }

        let streams: StravaStreamSet = self.check_response_json(response).await?;
        Ok(streams.into())
    }

    /// Exchange the refresh token for a fresh access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post("https://www.strava.com/oauth/token")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Streams response with `key_by_type=true`. Series Strava has no data for
/// are left out of the response.
#[derive(Debug, Default, Deserialize)]
pub struct StravaStreamSet {
    #[serde(default)]
    pub time: Option<StravaStream<u32>>,
    #[serde(default)]
    pub distance: Option<StravaStream<f64>>,
    #[serde(default)]
    pub heartrate: Option<StravaStream<u32>>,
}

/// One stream series.
#[derive(Debug, Deserialize)]
pub struct StravaStream<T> {
    pub data: Vec<T>,
}

impl From<StravaStreamSet> for SampleStream {
    fn from(set: StravaStreamSet) -> Self {
        SampleStream {
            time: set.time.map(|s| s.data).unwrap_or_default(),
            distance: set.distance.map(|s| s.data).unwrap_or_default(),
            heartrate: set.heartrate.map(|s| s.data).unwrap_or_default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// Refresh the access token when it expires within this margin.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Cached access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Refresh token plus the access token minted from it, if any.
struct TokenState {
    refresh_token: String,
    cached: Option<CachedToken>,
}

/// High-level Strava service that manages the access token lifecycle.
///
/// The refresh token comes from configuration; Strava may rotate it on
/// refresh, in which case the rotated token is kept in memory.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: Arc<Mutex<TokenState>>,
}

impl StravaService {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client: StravaClient::new(client_id, client_secret),
            tokens: Arc::new(Mutex::new(TokenState {
                refresh_token,
                cached: None,
            })),
        }
    }

    /// Get a valid (non-expiring) access token, refreshing it if needed.
    ///
    /// The lock is held across the refresh so concurrent callers wait for a
    /// single refresh instead of racing.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut tokens = self.tokens.lock().await;
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(cached) = &tokens.cached {
            if Utc::now() + margin < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        tracing::info!("Refreshing Strava access token");
        let refreshed = self.client.refresh_token(&tokens.refresh_token).await?;

        let expires_at = DateTime::from_timestamp(refreshed.expires_at, 0).ok_or_else(|| {
            AppError::StravaApi(format!(
                "Invalid token expiry timestamp: {}",
                refreshed.expires_at
            ))
        })?;

        if refreshed.refresh_token != tokens.refresh_token {
            tracing::info!("Strava rotated the refresh token");
            tokens.refresh_token = refreshed.refresh_token;
        }
        tokens.cached = Some(CachedToken {
            access_token: refreshed.access_token.clone(),
            expires_at,
        });

        Ok(refreshed.access_token)
    }

    /// List every activity started within `(after, before)`, following
    /// pagination until a short page.
    pub async fn list_activities(
        &self,
        after: i64,
        before: i64,
    ) -> Result<Vec<RawActivity>, AppError> {
        let access_token = self.get_valid_access_token().await?;
        let mut activities = Vec::new();
        let mut page = 1;

        loop {
            let batch = self
                .forget_token_on_auth_error(
                    self.client
                        .list_activities(&access_token, after, before, page, ACTIVITIES_PER_PAGE)
                        .await,
                )
                .await?;
            let fetched = batch.len();
            activities.extend(batch);

            tracing::debug!(page, fetched, "Fetched activity page");
            if fetched < ACTIVITIES_PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(activities)
    }

    /// Get the laps of an activity.
    pub async fn get_laps(&self, activity_id: u64) -> Result<Vec<RawLap>, AppError> {
        let access_token = self.get_valid_access_token().await?;
        self.forget_token_on_auth_error(self.client.get_laps(&access_token, activity_id).await)
            .await
    }

    /// Get the sample stream of an activity.
    pub async fn get_streams(&self, activity_id: u64) -> Result<SampleStream, AppError> {
        let access_token = self.get_valid_access_token().await?;
        self.forget_token_on_auth_error(self.client.get_streams(&access_token, activity_id).await)
            .await
    }

    /// Drop the cached access token if Strava rejected it.
    async fn forget_token_on_auth_error<T>(
        &self,
        result: Result<T, AppError>,
    ) -> Result<T, AppError> {
        if let Err(err) = &result {
            if err.is_strava_token_error() {
                tracing::warn!("Strava rejected the access token, discarding cached token");
                self.tokens.lock().await.cached = None;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service_with_cached_token() -> StravaService {
        let service = StravaService::new(
            "id".to_string(),
            "secret".to_string(),
            "refresh".to_string(),
        );
        service.tokens.lock().await.cached = Some(CachedToken {
            access_token: "cached".to_string(),
            expires_at: Utc::now() + Duration::hours(6),
        });
        service
    }

    #[tokio::test]
    async fn test_cached_token_reused_until_expiry() {
        let service = service_with_cached_token().await;
        assert_eq!(service.get_valid_access_token().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_unauthorized_discards_cached_token() {
        let service = service_with_cached_token().await;

        let result: Result<(), AppError> = service
            .forget_token_on_auth_error(Err(AppError::StravaApi(
                AppError::STRAVA_TOKEN_ERROR.to_string(),
            )))
            .await;

        assert!(result.unwrap_err().is_strava_token_error());
        assert!(service.tokens.lock().await.cached.is_none());
    }

    #[tokio::test]
    async fn test_other_errors_keep_cached_token() {
        let service = service_with_cached_token().await;

        let result: Result<(), AppError> = service
            .forget_token_on_auth_error(Err(AppError::StravaApi(
                AppError::STRAVA_RATE_LIMIT.to_string(),
            )))
            .await;
        assert!(result.is_err());

        let ok = service.forget_token_on_auth_error(Ok(3)).await;
        assert_eq!(ok.unwrap(), 3);

        assert!(service.tokens.lock().await.cached.is_some());
    }

    #[test]
    fn test_stream_set_to_sample_stream() {
        let json = r#"{
            "time": {"data": [0, 1, 2], "series_type": "distance", "original_size": 3, "resolution": "high"},
            "distance": {"data": [0.0, 2.5, 5.1], "series_type": "distance", "original_size": 3, "resolution": "high"},
            "heartrate": {"data": [98, 101, 104], "series_type": "distance", "original_size": 3, "resolution": "high"}
        }"#;

        let set: StravaStreamSet = serde_json::from_str(json).unwrap();
        let stream: SampleStream = set.into();

        assert_eq!(stream.time, vec![0, 1, 2]);
        assert_eq!(stream.distance, vec![0.0, 2.5, 5.1]);
        assert_eq!(stream.heartrate, vec![98, 101, 104]);
    }

    #[test]
    fn test_stream_set_without_heartrate() {
        let json = r#"{
            "time": {"data": [0, 1]},
            "distance": {"data": [0.0, 3.0]}
        }"#;

        let set: StravaStreamSet = serde_json::from_str(json).unwrap();
        let stream: SampleStream = set.into();

        assert!(!stream.has_heartrate());
        assert_eq!(stream.time.len(), 2);
    }

    #[test]
    fn test_raw_activity_deserialization() {
        let json = r#"{
            "id": 12345678901,
            "name": "Lunch Run",
            "moving_time": 1830,
            "elapsed_time": 1900,
            "distance": 6012.4,
            "type": "Run",
            "sport_type": "Run",
            "start_date": "2024-03-02T11:15:00Z",
            "start_date_local": "2024-03-02T12:15:00Z"
        }"#;

        let raw: RawActivity = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, 12_345_678_901);
        assert_eq!(raw.activity_type, "Run");
        assert_eq!(raw.moving_time, 1830);
    }

    #[test]
    fn test_raw_activity_missing_field_is_rejected() {
        let json = r#"{"id": 1, "name": "No distance", "moving_time": 10, "type": "Run", "start_date": "2024-03-02T11:15:00Z"}"#;
        assert!(serde_json::from_str::<RawActivity>(json).is_err());
    }
}
