//! Application settings, backed by a JSON document and merged with defaults on load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::{
    data::SortField,
    document::{Document, LoadOutcome, read_json, write_json_pretty},
    error::SettingsError,
    macros::logs::{debug_path, warn_fallback},
};

/// All settings, with every built-in key always present
///
/// Keys which aren't built in are kept in `extra`, so settings written by other versions
/// survive a load and save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid_columns: u32,
    pub card_size: String,
    pub close_on_launch: bool,
    pub track_playtime: bool,
    pub show_playtime: bool,
    pub sort_by: String,
    /// `"asc"` or `"desc"`
    pub sort_order: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Unix timestamp of the last check for application updates
    pub last_update_check: i64,
    pub auto_check_updates: bool,
    pub show_sidebar: bool,
    pub theme: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_columns: 4,
            card_size: "medium".to_owned(),
            close_on_launch: false,
            track_playtime: true,
            show_playtime: true,
            sort_by: SortField::Name.as_str().to_owned(),
            sort_order: "asc".to_owned(),
            window_width: 1400,
            window_height: 900,
            last_update_check: 0,
            auto_check_updates: true,
            show_sidebar: true,
            theme: "dark".to_owned(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Field the library should be sorted by, falling back to name for unknown values
    pub fn sort_field(&self) -> SortField {
        self.sort_by.parse().unwrap_or_default()
    }

    /// Whether the library should be sorted in descending order
    ///
    /// Always false for an unknown `sort_by`, which sorts by name ascending.
    pub fn sort_descending(&self) -> bool {
        self.sort_by.parse::<SortField>().is_ok() && self.sort_order.eq_ignore_ascii_case("desc")
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Builds settings from the loaded keys, keeping the default of any key whose value has the
/// wrong type
fn merge_over_defaults(loaded: Map<String, Value>) -> Settings {
    let defaults = Settings::default().to_map();
    let mut merged = defaults.clone();

    for (key, value) in loaded {
        let mut candidate = defaults.clone();
        candidate.insert(key.clone(), value.clone());

        match serde_json::from_value::<Settings>(Value::Object(candidate)) {
            Ok(_) => {
                merged.insert(key, value);
            }
            Err(e) => warn!("Invalid value for setting '{key}', using its default: {e}"),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        warn!("Could not merge settings, using defaults: {e}");
        Settings::default()
    })
}

/// Store for the application settings
#[derive(Debug)]
pub struct SettingsStore {
    path_document: PathBuf,
    settings: Settings,
    load_outcome: LoadOutcome,
}

impl SettingsStore {
    /// Opens the settings document at the given path
    ///
    /// If the document is missing, unreadable or not an object, the defaults are used instead and
    /// the document is left untouched until the next save. Keys missing from the document, or
    /// with a value of the wrong type, take their default values.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn open(path_document: impl Into<PathBuf>) -> Self {
        let path_document = path_document.into();
        debug_path!("settings document", path_document);

        let (settings, load_outcome) = match read_json::<Map<String, Value>>(&path_document) {
            Document::Found(map) => {
                let len = map.len();
                (merge_over_defaults(map), LoadOutcome::Found(len))
            }
            Document::NotFound => {
                debug!("No settings document found, using defaults");
                (Settings::default(), LoadOutcome::NotFound)
            }
            Document::Malformed(reason) => {
                warn_fallback!("Settings document", path_document, reason);
                (Settings::default(), LoadOutcome::Malformed(reason))
            }
        };

        Self {
            path_document,
            settings,
            load_outcome,
        }
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn path(&self) -> &Path {
        &self.path_document
    }

    /// Typed access to all settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Value of the given key, or `None` if the key isn't set
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings.to_map().remove(key)
    }

    /// Value of the given key, or the given default if the key isn't set
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Changes a single setting in memory
    ///
    /// Built-in keys only accept values of their own type. Call [`SettingsStore::save`] to
    /// persist the change.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), SettingsError> {
        self.update(Map::from_iter([(key.to_owned(), value.into())]))
    }

    /// Changes several settings in memory at once
    ///
    /// Either all values are applied, or none are if any is invalid.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn update(&mut self, values: Map<String, Value>) -> Result<(), SettingsError> {
        let mut map = self.settings.to_map();
        let keys = values.keys().cloned().collect::<Vec<_>>();
        map.extend(values);

        self.settings = serde_json::from_value(Value::Object(map)).map_err(|e| {
            SettingsError::InvalidValue {
                key: keys.join(", "),
                reason: e.to_string(),
            }
        })?;

        Ok(())
    }

    /// Restores the built-in defaults and saves them immediately
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.save()
    }

    /// Writes all settings to the settings document
    pub fn save(&self) -> Result<(), SettingsError> {
        write_json_pretty(&self.path_document, &self.settings).map_err(|e| {
            error!("Error saving settings to {:?}: {e}", self.path_document);
            SettingsError::from(e)
        })
    }
}
