//! The per-conversation `Config` record and its partial forms.
//!
//! Three shapes exist:
//! - [`Config`]: every field present, what handlers work with.
//! - [`StoredConfig`]: what the store returns; any field may be missing.
//! - [`ConfigPatch`]: a shallow, top-level partial update.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Forecast area used until a conversation picks its own (Tokyo).
pub const DEFAULT_WEATHER_ZONE: &str = "130000";

/// Complete per-conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Whether a quiz is in progress.
    pub quiz_status: bool,
    /// Index of the posed question; meaningful only while `quiz_status` is set.
    pub current_question: usize,
    /// Cumulative quiz points per user id.
    pub user_scores: BTreeMap<String, u32>,
    /// Six-digit forecast area code.
    pub weather_zone: String,
    /// To-do items in insertion order.
    pub todo_list: Vec<String>,
    /// Reminder opt-in flag (schema only).
    pub reminder_enabled: bool,
    /// Epoch millis of the last reminder (schema only).
    pub last_reminder: i64,
    /// Suppresses notification banners on replies.
    pub is_silent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_status: false,
            current_question: 0,
            user_scores: BTreeMap::new(),
            weather_zone: DEFAULT_WEATHER_ZONE.to_owned(),
            todo_list: Vec::new(),
            reminder_enabled: false,
            last_reminder: 0,
            is_silent: false,
        }
    }
}

impl Config {
    /// Returns the user's score, or 0 when the user has no entry yet.
    #[must_use]
    pub fn score_of(&self, user_id: &str) -> u32 {
        self.user_scores.get(user_id).copied().unwrap_or(0)
    }

    /// Applies a partial update in place. Absent patch fields are untouched.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(value) = patch.quiz_status {
            self.quiz_status = value;
        }
        if let Some(value) = patch.current_question {
            self.current_question = value;
        }
        if let Some(value) = &patch.user_scores {
            self.user_scores.clone_from(value);
        }
        if let Some(value) = &patch.weather_zone {
            self.weather_zone.clone_from(value);
        }
        if let Some(value) = &patch.todo_list {
            self.todo_list.clone_from(value);
        }
        if let Some(value) = patch.reminder_enabled {
            self.reminder_enabled = value;
        }
        if let Some(value) = patch.last_reminder {
            self.last_reminder = value;
        }
        if let Some(value) = patch.is_silent {
            self.is_silent = value;
        }
    }
}

/// A stored record as read back from the conversation store.
///
/// Fields go missing when the schema grows, and some stores drop empty
/// maps and lists entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    /// See [`Config::quiz_status`].
    pub quiz_status: Option<bool>,
    /// See [`Config::current_question`].
    pub current_question: Option<usize>,
    /// See [`Config::user_scores`].
    pub user_scores: Option<BTreeMap<String, u32>>,
    /// See [`Config::weather_zone`].
    pub weather_zone: Option<String>,
    /// See [`Config::todo_list`].
    #[serde(deserialize_with = "deserialize_task_list")]
    pub todo_list: Option<Vec<String>>,
    /// See [`Config::reminder_enabled`].
    pub reminder_enabled: Option<bool>,
    /// See [`Config::last_reminder`].
    pub last_reminder: Option<i64>,
    /// See [`Config::is_silent`].
    pub is_silent: Option<bool>,
}

impl StoredConfig {
    /// Decodes a raw stored JSON value. `null` means "nothing stored yet".
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the value is not a record.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| DomainError::Infrastructure(format!("stored config is malformed: {e}")))
    }

    /// Fills every missing field from [`Config::default`].
    #[must_use]
    pub fn merge_with_defaults(self) -> Config {
        let defaults = Config::default();
        Config {
            quiz_status: self.quiz_status.unwrap_or(defaults.quiz_status),
            current_question: self.current_question.unwrap_or(defaults.current_question),
            user_scores: self.user_scores.unwrap_or(defaults.user_scores),
            weather_zone: self.weather_zone.unwrap_or(defaults.weather_zone),
            todo_list: self.todo_list.unwrap_or(defaults.todo_list),
            reminder_enabled: self.reminder_enabled.unwrap_or(defaults.reminder_enabled),
            last_reminder: self.last_reminder.unwrap_or(defaults.last_reminder),
            is_silent: self.is_silent.unwrap_or(defaults.is_silent),
        }
    }
}

impl From<Config> for StoredConfig {
    fn from(config: Config) -> Self {
        Self {
            quiz_status: Some(config.quiz_status),
            current_question: Some(config.current_question),
            user_scores: Some(config.user_scores),
            weather_zone: Some(config.weather_zone),
            todo_list: Some(config.todo_list),
            reminder_enabled: Some(config.reminder_enabled),
            last_reminder: Some(config.last_reminder),
            is_silent: Some(config.is_silent),
        }
    }
}

/// Accepts a task list stored either as a JSON array (possibly with `null`
/// holes) or as an object keyed by array index.
fn deserialize_task_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TaskList {
        List(Vec<Option<String>>),
        Indexed(BTreeMap<String, String>),
    }

    let raw = Option::<TaskList>::deserialize(deserializer)?;
    Ok(raw.map(|list| match list {
        TaskList::List(items) => items.into_iter().flatten().collect(),
        TaskList::Indexed(entries) => {
            let mut indexed: Vec<(usize, String)> = entries
                .into_iter()
                .filter_map(|(index, task)| index.parse().ok().map(|i| (i, task)))
                .collect();
            indexed.sort_by_key(|(index, _)| *index);
            indexed.into_iter().map(|(_, task)| task).collect()
        }
    }))
}

/// A shallow partial update. Nested values are always written whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigPatch {
    /// New quiz status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_status: Option<bool>,
    /// New question index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<usize>,
    /// Replacement score map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_scores: Option<BTreeMap<String, u32>>,
    /// New forecast zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_zone: Option<String>,
    /// Replacement to-do list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo_list: Option<Vec<String>>,
    /// New reminder flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_enabled: Option<bool>,
    /// New last-reminder timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reminder: Option<i64>,
    /// New silent flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_silent: Option<bool>,
}

impl ConfigPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn populated() -> Config {
        Config {
            quiz_status: true,
            current_question: 4,
            user_scores: BTreeMap::from([("U1".to_owned(), 30), ("U2".to_owned(), 0)]),
            weather_zone: "270000".to_owned(),
            todo_list: vec!["milk".to_owned(), "eggs".to_owned()],
            reminder_enabled: true,
            last_reminder: 1_700_000_000_000,
            is_silent: true,
        }
    }

    #[test]
    fn test_null_record_merges_to_defaults() {
        // Arrange
        let stored = StoredConfig::from_json(serde_json::Value::Null).unwrap();

        // Act
        let merged = stored.merge_with_defaults();

        // Assert
        assert_eq!(merged, Config::default());
        assert_eq!(merged.weather_zone, DEFAULT_WEATHER_ZONE);
    }

    #[test]
    fn test_missing_fields_are_filled_and_present_fields_kept() {
        // Arrange
        let raw = json!({ "quiz_status": true, "current_question": 2, "weather_zone": "016000" });

        // Act
        let merged = StoredConfig::from_json(raw).unwrap().merge_with_defaults();

        // Assert
        assert!(merged.quiz_status);
        assert_eq!(merged.current_question, 2);
        assert_eq!(merged.weather_zone, "016000");
        assert!(merged.user_scores.is_empty());
        assert!(merged.todo_list.is_empty());
        assert!(!merged.is_silent);
    }

    #[test]
    fn test_merge_is_idempotent_for_complete_records() {
        let config = populated();

        let once = StoredConfig::from(config.clone()).merge_with_defaults();
        let twice = StoredConfig::from(once.clone()).merge_with_defaults();

        assert_eq!(once, config);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_serialized_config_round_trips_through_stored_form() {
        let config = populated();
        let value = serde_json::to_value(&config).unwrap();

        let merged = StoredConfig::from_json(value).unwrap().merge_with_defaults();

        assert_eq!(merged, config);
    }

    #[test]
    fn test_task_list_accepts_index_keyed_object() {
        let raw = json!({ "todo_list": { "1": "second", "0": "first", "10": "last" } });

        let stored = StoredConfig::from_json(raw).unwrap();

        assert_eq!(
            stored.todo_list,
            Some(vec!["first".to_owned(), "second".to_owned(), "last".to_owned()])
        );
    }

    #[test]
    fn test_task_list_skips_null_holes() {
        let raw = json!({ "todo_list": ["a", null, "c"] });

        let stored = StoredConfig::from_json(raw).unwrap();

        assert_eq!(stored.todo_list, Some(vec!["a".to_owned(), "c".to_owned()]));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = json!({ "legacy_flag": 1, "is_silent": true });

        let merged = StoredConfig::from_json(raw).unwrap().merge_with_defaults();

        assert!(merged.is_silent);
    }

    #[test]
    fn test_malformed_record_is_infrastructure_error() {
        let result = StoredConfig::from_json(json!({ "quiz_status": "yes" }));

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        // Arrange
        let mut config = populated();
        let patch = ConfigPatch {
            quiz_status: Some(false),
            todo_list: Some(Vec::new()),
            ..ConfigPatch::default()
        };

        // Act
        config.apply(&patch);

        // Assert
        assert!(!config.quiz_status);
        assert!(config.todo_list.is_empty());
        assert_eq!(config.current_question, 4);
        assert_eq!(config.score_of("U1"), 30);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ConfigPatch {
            weather_zone: Some("130000".to_owned()),
            ..ConfigPatch::default()
        };

        let value = serde_json::to_value(&patch).unwrap();

        assert_eq!(value, json!({ "weather_zone": "130000" }));
        assert!(!patch.is_empty());
        assert!(ConfigPatch::default().is_empty());
    }
}
