//! Server configuration, read once from the environment at startup.

use std::path::PathBuf;
use std::time::Duration;

use helperbot_lookup::answer::{DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL};

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Where conversation records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firebase Realtime Database over REST.
    Firebase {
        /// Database root URL.
        database_url: String,
        /// Optional `auth` query token.
        auth: Option<String>,
    },
    /// Process-local map; records are lost on restart.
    Memory,
}

/// Settings for the AI answerer.
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// Bearer token.
    pub api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name.
    pub model: String,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Everything the server needs to start.
#[derive(Clone)]
pub struct ServerConfig {
    pub channel_secret: String,
    pub channel_access_token: String,
    pub store: StoreBackend,
    pub host: String,
    pub port: u16,
    pub quiz_bank_path: Option<PathBuf>,
    /// `None` when `AI_API_KEY` is unset; questions are then disabled.
    pub ai: Option<AiConfig>,
    pub debug_commands: bool,
    pub http_timeout: Duration,
    pub otlp_endpoint: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("store", &self.store)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("quiz_bank_path", &self.quiz_bank_path)
            .field("ai", &self.ai)
            .field("debug_commands", &self.debug_commands)
            .field("http_timeout", &self.http_timeout)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| {
                AppError::Config(format!("{name} environment variable must be set"))
            })
        };

        let channel_secret = required("CHANNEL_SECRET")?;
        let channel_access_token = required("CHANNEL_ACCESS_TOKEN")?;

        let store = match var("STORE_BACKEND").as_deref().unwrap_or("firebase") {
            "firebase" => StoreBackend::Firebase {
                database_url: required("FIREBASE_DATABASE")?,
                auth: var("FIREBASE_AUTH"),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(AppError::Config(format!(
                    "STORE_BACKEND must be `firebase` or `memory`, got `{other}`"
                )));
            }
        };

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let ai = var("AI_API_KEY").map(|api_key| AiConfig {
            api_key,
            base_url: var("AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            model: var("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
        });

        let debug_commands = match var("BOT_DEBUG_COMMANDS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("BOT_DEBUG_COMMANDS must be a boolean, got `{raw}`"))
            })?,
            None => false,
        };

        let timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("HTTP_TIMEOUT_SECS must be a whole number: {e}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            channel_secret,
            channel_access_token,
            store,
            host,
            port,
            quiz_bank_path: var("QUIZ_BANK_PATH").map(PathBuf::from),
            ai,
            debug_commands,
            http_timeout: Duration::from_secs(timeout_secs),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const BASE: [(&str, &str); 3] = [
        ("CHANNEL_SECRET", "secret"),
        ("CHANNEL_ACCESS_TOKEN", "token"),
        ("FIREBASE_DATABASE", "https://bot.firebaseio.com"),
    ];

    #[test]
    fn test_minimal_environment_uses_defaults() {
        // Act
        let config = config_from(&BASE).unwrap();

        // Assert
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(
            config.store,
            StoreBackend::Firebase {
                database_url: "https://bot.firebaseio.com".into(),
                auth: None,
            }
        );
        assert!(config.ai.is_none());
        assert!(!config.debug_commands);
        assert!(config.quiz_bank_path.is_none());
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_missing_channel_secret_is_config_error() {
        // Act
        let result = config_from(&[("CHANNEL_ACCESS_TOKEN", "token")]);

        // Assert
        match result {
            Err(AppError::Config(message)) => assert!(message.contains("CHANNEL_SECRET")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_firebase_backend_requires_database_url() {
        // Act
        let result = config_from(&BASE[..2]);

        // Assert
        assert!(
            matches!(result, Err(AppError::Config(message)) if message.contains("FIREBASE_DATABASE"))
        );
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        // Arrange
        let mut pairs = BASE[..2].to_vec();
        pairs.push(("STORE_BACKEND", "memory"));

        // Act
        let config = config_from(&pairs).unwrap();

        // Assert
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("STORE_BACKEND", "postgres"));

        // Act / Assert
        assert!(matches!(config_from(&pairs), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "http"));

        // Act / Assert
        assert!(matches!(config_from(&pairs), Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("HTTP_TIMEOUT_SECS", "0"));

        // Act / Assert
        assert!(matches!(config_from(&pairs), Err(AppError::Config(_))));
    }

    #[test]
    fn test_ai_key_enables_answers_with_default_model() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("AI_API_KEY", "sk-test"));

        // Act
        let config = config_from(&pairs).unwrap();

        // Assert
        let ai = config.ai.unwrap();
        assert_eq!(ai.api_key, "sk-test");
        assert_eq!(ai.base_url, DEFAULT_AI_BASE_URL);
        assert_eq!(ai.model, DEFAULT_AI_MODEL);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("AI_API_KEY", ""));
        pairs.push(("FIREBASE_AUTH", "  "));

        // Act
        let config = config_from(&pairs).unwrap();

        // Assert
        assert!(config.ai.is_none());
        assert!(matches!(config.store, StoreBackend::Firebase { auth: None, .. }));
    }

    #[test]
    fn test_debug_flag_accepts_common_spellings() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("BOT_DEBUG_COMMANDS", "TRUE"));

        // Act
        let config = config_from(&pairs).unwrap();

        // Assert
        assert!(config.debug_commands);
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        // Arrange
        let mut pairs = BASE.to_vec();
        pairs.push(("AI_API_KEY", "sk-test"));
        let config = config_from(&pairs).unwrap();

        // Act
        let rendered = format!("{config:?}");

        // Assert
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("token"));
    }
}
