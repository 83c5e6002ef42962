//! P2PQuake JMA earthquake feed adapter.
//!
//! The feed reports `-1` for unknown numeric values; those become `None`
//! in the normalized report.

use async_trait::async_trait;
use helperbot_core::lookup::{EarthquakeReport, EarthquakeSource, LookupError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{USER_AGENT, check_response};

/// Public P2PQuake endpoint.
pub const DEFAULT_P2PQUAKE_BASE_URL: &str = "https://api.p2pquake.net";

/// Placeholder for fields the feed leaves out.
pub const UNKNOWN: &str = "不明";

#[derive(Debug, Deserialize)]
struct QuakeRecord {
    #[serde(default)]
    time: Option<String>,
    earthquake: QuakeBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuakeBody {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    hypocenter: Option<Hypocenter>,
    #[serde(default)]
    max_scale: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Hypocenter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    depth: Option<i32>,
    #[serde(default)]
    magnitude: Option<f64>,
}

/// JMA seismic intensity label for a P2PQuake scale code.
#[must_use]
pub fn intensity_label(scale: i32) -> &'static str {
    match scale {
        10 => "震度1",
        20 => "震度2",
        30 => "震度3",
        40 => "震度4",
        45 => "震度5弱",
        50 => "震度5強",
        55 => "震度6弱",
        60 => "震度6強",
        70 => "震度7",
        _ => UNKNOWN,
    }
}

fn normalize(record: QuakeRecord) -> EarthquakeReport {
    let QuakeRecord { time, earthquake } = record;
    let hypocenter = earthquake.hypocenter;
    let location = hypocenter
        .as_ref()
        .and_then(|h| h.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned());
    EarthquakeReport {
        time: earthquake
            .time
            .or(time)
            .unwrap_or_else(|| UNKNOWN.to_owned()),
        location,
        intensity: intensity_label(earthquake.max_scale.unwrap_or(-1)).to_owned(),
        depth_km: hypocenter.as_ref().and_then(|h| h.depth).filter(|d| *d >= 0),
        magnitude: hypocenter
            .as_ref()
            .and_then(|h| h.magnitude)
            .filter(|m| *m >= 0.0),
    }
}

/// Parses a feed page and normalizes its most recent entry.
///
/// # Errors
///
/// Returns `LookupError::Decode` for malformed JSON and `LookupError::Empty`
/// for an empty list.
pub fn parse_latest(body: &str) -> Result<EarthquakeReport, LookupError> {
    let records: Vec<QuakeRecord> =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    records
        .into_iter()
        .next()
        .map(normalize)
        .ok_or(LookupError::Empty)
}

/// Fetches `{base}/v2/jma/quake?limit=1`.
#[derive(Debug, Clone)]
pub struct P2pQuakeClient {
    client: Client,
    base_url: String,
}

impl P2pQuakeClient {
    /// Creates a client against `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl EarthquakeSource for P2pQuakeClient {
    #[instrument(skip(self))]
    async fn latest(&self) -> Result<EarthquakeReport, LookupError> {
        let response = check_response(
            self.client
                .get(format!("{}/v2/jma/quake", self.base_url))
                .query(&[("limit", "1")])
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .send()
                .await,
        )?;
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let report = parse_latest(&body)?;
        debug!(location = %report.location, intensity = %report.intensity, "earthquake fetched");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::extract::RawQuery;
    use axum::routing::get;
    use helperbot_core::lookup::{EarthquakeSource, LookupError};
    use reqwest::Client;

    use super::*;

    const SAMPLE: &str = r#"[
      {
        "id": "6789",
        "code": 551,
        "time": "2026/01/15 09:14:31.120",
        "issue": {"source": "気象庁", "time": "2026/01/15 09:14:00", "type": "DetailScale"},
        "earthquake": {
          "time": "2026/01/15 09:12:00",
          "hypocenter": {"name": "千葉県北西部", "latitude": 35.7, "longitude": 140.1, "depth": 70, "magnitude": 4.5},
          "maxScale": 45,
          "domesticTsunami": "None",
          "foreignTsunami": "Unknown"
        },
        "points": []
      }
    ]"#;

    #[test]
    fn test_intensity_label_covers_scale_codes() {
        assert_eq!(intensity_label(10), "震度1");
        assert_eq!(intensity_label(45), "震度5弱");
        assert_eq!(intensity_label(50), "震度5強");
        assert_eq!(intensity_label(70), "震度7");
        assert_eq!(intensity_label(-1), "不明");
        assert_eq!(intensity_label(35), "不明");
    }

    #[test]
    fn test_parse_latest_normalizes_first_entry() {
        let report = parse_latest(SAMPLE).unwrap();

        assert_eq!(report.time, "2026/01/15 09:12:00");
        assert_eq!(report.location, "千葉県北西部");
        assert_eq!(report.intensity, "震度5弱");
        assert_eq!(report.depth_km, Some(70));
        assert_eq!(report.magnitude, Some(4.5));
    }

    #[test]
    fn test_parse_latest_fills_placeholders_for_missing_fields() {
        // Arrange
        let body = r#"[{"time":"2026/01/15 10:00:00.000","earthquake":{"hypocenter":{"name":"","depth":-1,"magnitude":-1},"maxScale":-1}}]"#;

        // Act
        let report = parse_latest(body).unwrap();

        // Assert
        assert_eq!(report.time, "2026/01/15 10:00:00.000");
        assert_eq!(report.location, "不明");
        assert_eq!(report.intensity, "不明");
        assert_eq!(report.depth_km, None);
        assert_eq!(report.magnitude, None);
    }

    #[test]
    fn test_parse_latest_keeps_zero_depth() {
        let body = r#"[{"earthquake":{"time":"t","hypocenter":{"name":"石川県能登地方","depth":0,"magnitude":3.1},"maxScale":20}}]"#;

        assert_eq!(parse_latest(body).unwrap().depth_km, Some(0));
    }

    #[test]
    fn test_parse_latest_rejects_empty_and_malformed_feeds() {
        assert!(matches!(parse_latest("[]"), Err(LookupError::Empty)));
        assert!(matches!(parse_latest("{}"), Err(LookupError::Decode(_))));
    }

    #[tokio::test]
    async fn test_latest_requests_single_entry() {
        // Arrange
        let app = Router::new().route(
            "/v2/jma/quake",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(query.as_deref(), Some("limit=1"));
                SAMPLE
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = P2pQuakeClient::new(Client::new(), &format!("http://{addr}"));

        // Act
        let report = client.latest().await.unwrap();

        // Assert
        assert_eq!(report.location, "千葉県北西部");
    }
}
