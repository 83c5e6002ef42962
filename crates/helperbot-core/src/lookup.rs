//! External lookup abstractions: weather, earthquakes, and AI answers.
//!
//! Adapters report every failure the same way; callers only distinguish
//! success from failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform failure of an external lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request could not be sent or returned a non-success status.
    #[error("lookup transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("lookup response could not be decoded: {0}")]
    Decode(String),

    /// The feed answered but contained nothing usable.
    #[error("lookup returned no data")]
    Empty,
}

/// Overview forecast for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    /// Issuing office, e.g. "気象庁".
    pub publishing_office: String,
    /// Issue timestamp (RFC 3339).
    pub report_datetime: String,
    /// Area the forecast covers.
    pub target_area: String,
    /// Short headline; often empty.
    #[serde(default)]
    pub headline_text: String,
    /// Free-text forecast body.
    pub text: String,
}

/// The most recent earthquake, normalized across feed shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeReport {
    /// Occurrence time as published by the feed.
    pub time: String,
    /// Epicenter name, or a placeholder when unknown.
    pub location: String,
    /// Maximum observed intensity label, or a placeholder when unknown.
    pub intensity: String,
    /// Depth in km; `None` when unknown.
    pub depth_km: Option<i32>,
    /// Magnitude; `None` when unknown.
    pub magnitude: Option<f64>,
}

/// Fetches overview forecasts.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Returns the forecast for a six-digit zone code.
    async fn forecast(&self, zone: &str) -> Result<WeatherForecast, LookupError>;
}

/// Fetches earthquake information.
#[async_trait]
pub trait EarthquakeSource: Send + Sync {
    /// Returns the most recent earthquake.
    async fn latest(&self) -> Result<EarthquakeReport, LookupError>;
}

/// Answers free-text questions.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Returns a short answer to `question`.
    async fn answer(&self, question: &str) -> Result<String, LookupError>;
}
