//! Firebase Realtime Database REST implementation of `ConversationStore`.
//!
//! `GET` reads a record (absent records read as `null`), `PUT` overwrites
//! it, and `PATCH` merges top-level fields.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument};

use helperbot_core::config::{Config, ConfigPatch, StoredConfig};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::error::DomainError;
use helperbot_core::store::ConversationStore;

use crate::ROOT_NAMESPACE;

/// Store backed by a Firebase Realtime Database over its REST API.
#[derive(Debug, Clone)]
pub struct FirebaseConversationStore {
    client: Client,
    database_url: String,
    auth: Option<String>,
}

impl FirebaseConversationStore {
    /// Creates a store for `database_url` (e.g.
    /// `https://example-default-rtdb.firebaseio.com`). `auth` is sent as the
    /// `auth` query parameter when present.
    #[must_use]
    pub fn new(client: Client, database_url: &str, auth: Option<String>) -> Self {
        Self {
            client,
            database_url: database_url.trim_end_matches('/').to_owned(),
            auth: auth.filter(|token| !token.is_empty()),
        }
    }

    /// REST URL of the record for `key`.
    #[must_use]
    pub fn record_url(&self, key: &ConversationKey) -> String {
        format!("{}/{ROOT_NAMESPACE}/{}.json", self.database_url, key.path())
    }

    fn request(&self, method: Method, key: &ConversationKey) -> RequestBuilder {
        let builder = self.client.request(method, self.record_url(key));
        match &self.auth {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder, operation: &str) -> Result<Response, DomainError> {
        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("store {operation} failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Infrastructure(format!(
                "store {operation} returned {status}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl ConversationStore for FirebaseConversationStore {
    #[instrument(skip(self), fields(conversation = %key))]
    async fn load(&self, key: &ConversationKey) -> Result<StoredConfig, DomainError> {
        let response = Self::send(self.request(Method::GET, key), "read").await?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("store read returned bad JSON: {e}")))?;
        debug!("loaded conversation record");
        StoredConfig::from_json(value)
    }

    #[instrument(skip(self, config), fields(conversation = %key))]
    async fn replace(&self, key: &ConversationKey, config: &Config) -> Result<(), DomainError> {
        Self::send(self.request(Method::PUT, key).json(config), "replace").await?;
        Ok(())
    }

    #[instrument(skip(self, patch), fields(conversation = %key))]
    async fn update(&self, key: &ConversationKey, patch: &ConfigPatch) -> Result<(), DomainError> {
        Self::send(self.request(Method::PATCH, key).json(patch), "update").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{Method as HttpMethod, StatusCode};
    use axum::routing::any;
    use helperbot_core::config::{Config, ConfigPatch, DEFAULT_WEATHER_ZONE};
    use helperbot_core::conversation::ConversationKey;
    use helperbot_core::error::DomainError;
    use helperbot_core::store::ConversationStore;
    use reqwest::Client;

    use super::FirebaseConversationStore;

    #[derive(Debug, Clone)]
    struct SeenRequest {
        method: HttpMethod,
        path: String,
        query: Option<String>,
        body: String,
    }

    type Seen = Arc<Mutex<Vec<SeenRequest>>>;

    async fn record(
        State((seen, reply)): State<(Seen, &'static str)>,
        method: HttpMethod,
        Path(path): Path<String>,
        RawQuery(query): RawQuery,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        seen.lock().unwrap().push(SeenRequest {
            method,
            path,
            query,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        (StatusCode::OK, reply)
    }

    /// Serves a fake database that answers every request with `reply`.
    async fn fake_database(reply: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/{*path}", any(record))
            .with_state((seen.clone(), reply));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), seen)
    }

    #[test]
    fn test_record_url_uses_namespace_and_conversation_path() {
        let store = FirebaseConversationStore::new(
            Client::new(),
            "https://bot-default-rtdb.firebaseio.com/",
            None,
        );

        assert_eq!(
            store.record_url(&ConversationKey::group("C42")),
            "https://bot-default-rtdb.firebaseio.com/data/group/C42.json"
        );
    }

    #[tokio::test]
    async fn test_load_of_missing_record_yields_defaults() {
        // Arrange
        let (base, seen) = fake_database("null").await;
        let store = FirebaseConversationStore::new(Client::new(), &base, Some("secret".to_owned()));

        // Act
        let stored = store.load(&ConversationKey::user("U1")).await.unwrap();

        // Assert
        assert_eq!(stored.merge_with_defaults().weather_zone, DEFAULT_WEATHER_ZONE);
        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests[0].method, HttpMethod::GET);
        assert_eq!(requests[0].path, "data/user/U1.json");
        assert_eq!(requests[0].query.as_deref(), Some("auth=secret"));
    }

    #[tokio::test]
    async fn test_replace_puts_whole_record_and_update_patches_fields() {
        // Arrange
        let (base, seen) = fake_database("{}").await;
        let store = FirebaseConversationStore::new(Client::new(), &base, None);
        let key = ConversationKey::room("R1");
        let patch = ConfigPatch {
            is_silent: Some(true),
            ..ConfigPatch::default()
        };

        // Act
        store.replace(&key, &Config::default()).await.unwrap();
        store.update(&key, &patch).await.unwrap();

        // Assert
        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests[0].method, HttpMethod::PUT);
        assert!(requests[0].body.contains("\"weather_zone\":\"130000\""));
        assert_eq!(requests[1].method, HttpMethod::PATCH);
        assert_eq!(requests[1].body, "{\"is_silent\":true}");
        assert_eq!(requests[1].query, None);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_infrastructure_error() {
        let store = FirebaseConversationStore::new(Client::new(), "http://127.0.0.1:9", None);

        let result = store.load(&ConversationKey::user("U1")).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
