//! Settings and controller options
//!
//! `Settings` is the opaque key/value object handed to the worker (title,
//! text and whatever else the platform side understands). `ControllerOptions`
//! is the embedder's configuration, optionally loaded from a JSON file.

use crate::error::{BackgroundError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace of the JavaScript object that receives events
pub const DEFAULT_JS_NAMESPACE: &str = "cordova.plugins.backgroundMode";

/// Opaque worker settings (a JSON object)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Settings {
    type Error = BackgroundError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(BackgroundError::Configuration(
                "settings must be a JSON object".to_string(),
            )),
        }
    }
}

/// Controller options (persisted by the embedder, never by the controller)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerOptions {
    #[serde(default = "default_js_namespace")]
    pub js_namespace: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Settings used for the first activation
    #[serde(default)]
    pub defaults: Settings,
}

fn default_js_namespace() -> String {
    DEFAULT_JS_NAMESPACE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            js_namespace: default_js_namespace(),
            log_level: default_log_level(),
            defaults: Settings::default(),
        }
    }
}

impl ControllerOptions {
    /// Parse `log_level`, falling back to `Info` for unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Get the default path of the options file
pub fn default_options_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("background-mode");
        path.push("options.json");
        path
    })
}

/// Load options from a JSON file
pub fn load_options_from_file(path: &Path) -> Option<ControllerOptions> {
    if !path.exists() {
        log::info!("No options file found at {:?}", path);
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(options) => {
                log::info!("Loaded background mode options from {:?}", path);
                Some(options)
            }
            Err(e) => {
                log::error!("Failed to parse options file: {}", e);
                None
            }
        },
        Err(e) => {
            log::error!("Failed to read options file: {}", e);
            None
        }
    }
}

/// Save options to a JSON file, creating the parent directory
pub fn save_options(path: &Path, options: &ControllerOptions) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(options)?;
    fs::write(path, content)?;

    log::info!("[OPTIONS] saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = ControllerOptions::default();
        assert_eq!(options.js_namespace, DEFAULT_JS_NAMESPACE);
        assert_eq!(options.level_filter(), log::LevelFilter::Info);
        assert!(options.defaults.is_empty());
    }

    #[test]
    fn test_partial_options_use_defaults() {
        let options: ControllerOptions =
            serde_json::from_value(json!({ "logLevel": "debug" })).unwrap();
        assert_eq!(options.js_namespace, DEFAULT_JS_NAMESPACE);
        assert_eq!(options.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_settings_from_non_object() {
        let err = Settings::try_from(json!("title")).unwrap_err();
        assert!(matches!(err, BackgroundError::Configuration(_)));

        let settings = Settings::try_from(json!({ "title": "Syncing" })).unwrap();
        assert_eq!(settings.get("title"), Some(&json!("Syncing")));
    }

    #[test]
    fn test_save_and_load_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("options.json");

        let mut options = ControllerOptions::default();
        options.defaults.insert("text", "Still running");
        save_options(&path, &options).unwrap();

        let loaded = load_options_from_file(&path).unwrap();
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_load_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        assert!(load_options_from_file(&path).is_none());

        fs::write(&path, "{ not json").unwrap();
        assert!(load_options_from_file(&path).is_none());
    }
}
