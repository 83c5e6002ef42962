//! Test lookups — canned `WeatherSource`, `EarthquakeSource`, and
//! `AnswerSource` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use helperbot_core::lookup::{
    AnswerSource, EarthquakeReport, EarthquakeSource, LookupError, WeatherForecast,
    WeatherSource,
};

/// Returns the same forecast for every zone and records requested zones.
#[derive(Debug)]
pub struct StubWeatherSource {
    forecast: WeatherForecast,
    requested: Mutex<Vec<String>>,
}

impl StubWeatherSource {
    /// Create a stub returning `forecast`.
    #[must_use]
    pub fn new(forecast: WeatherForecast) -> Self {
        Self {
            forecast,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// A stub returning a fixed Tokyo forecast.
    #[must_use]
    pub fn tokyo() -> Self {
        Self::new(WeatherForecast {
            publishing_office: "気象庁".to_owned(),
            report_datetime: "2026-01-15T10:41:00+09:00".to_owned(),
            target_area: "東京都".to_owned(),
            headline_text: String::new(),
            text: "東京地方は晴れています。".to_owned(),
        })
    }

    /// Zones requested so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requested_zones(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherSource for StubWeatherSource {
    async fn forecast(&self, zone: &str) -> Result<WeatherForecast, LookupError> {
        self.requested.lock().unwrap().push(zone.to_owned());
        Ok(self.forecast.clone())
    }
}

/// Always returns the configured earthquake report.
#[derive(Debug)]
pub struct StubEarthquakeSource(pub EarthquakeReport);

impl StubEarthquakeSource {
    /// A stub returning a fixed moderate earthquake.
    #[must_use]
    pub fn moderate() -> Self {
        Self(EarthquakeReport {
            time: "2026/01/15 09:12:00".to_owned(),
            location: "千葉県北西部".to_owned(),
            intensity: "震度3".to_owned(),
            depth_km: Some(70),
            magnitude: Some(4.5),
        })
    }
}

#[async_trait]
impl EarthquakeSource for StubEarthquakeSource {
    async fn latest(&self) -> Result<EarthquakeReport, LookupError> {
        Ok(self.0.clone())
    }
}

/// Answers every question with the same text.
#[derive(Debug)]
pub struct StubAnswerSource(pub String);

#[async_trait]
impl AnswerSource for StubAnswerSource {
    async fn answer(&self, _question: &str) -> Result<String, LookupError> {
        Ok(self.0.clone())
    }
}

/// A lookup that always fails with a transport error.
#[derive(Debug)]
pub struct FailingLookup;

#[async_trait]
impl WeatherSource for FailingLookup {
    async fn forecast(&self, _zone: &str) -> Result<WeatherForecast, LookupError> {
        Err(LookupError::Transport("connection refused".into()))
    }
}

#[async_trait]
impl EarthquakeSource for FailingLookup {
    async fn latest(&self) -> Result<EarthquakeReport, LookupError> {
        Err(LookupError::Transport("connection refused".into()))
    }
}

#[async_trait]
impl AnswerSource for FailingLookup {
    async fn answer(&self, _question: &str) -> Result<String, LookupError> {
        Err(LookupError::Transport("connection refused".into()))
    }
}
