//! Application settings storage
//!
//! Persists the remote-service credential and model choice in a JSON file.
//! Owned explicitly and injected into collaborators rather than held in a
//! global, so non-default backing locations (tests, other platforms) just
//! pass a different path.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A key shorter than this is treated as not configured at all
const MIN_KEY_LEN: usize = 10;

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self { openai_api_key: None, model: default_model() }
    }
}

/// Settings plus the file they round-trip through
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Default location: `<config_dir>/thoughtspace/settings.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thoughtspace")
            .join("settings.json")
    }

    /// Load settings from disk, or start from defaults if the file is
    /// missing or unreadable
    pub fn load(path: PathBuf) -> Self {
        let settings = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Settings::default(),
        };
        Self { path, settings }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let content = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(&self.path, content)
            .map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Current API key (environment variable takes precedence over the
    /// stored setting)
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.settings.openai_api_key.clone()
    }

    /// "Configured" means a credential longer than 10 characters
    pub fn has_api_key(&self) -> bool {
        self.get_api_key().map(|k| k.len() > MIN_KEY_LEN).unwrap_or(false)
    }

    /// Set and persist the API key; an empty string clears it
    pub fn set_api_key(&mut self, key: String) -> Result<(), String> {
        self.settings.openai_api_key = if key.is_empty() { None } else { Some(key) };
        self.save()
    }

    pub fn get_model(&self) -> &str {
        &self.settings.model
    }

    pub fn set_model(&mut self, model: String) -> Result<(), String> {
        self.settings.model = model;
        self.save()
    }

    /// Masked key for display (first and last 4 chars)
    pub fn masked_api_key(&self) -> Option<String> {
        self.get_api_key().map(|key| {
            if key.len() <= 8 {
                "*".repeat(key.len())
            } else {
                format!("{}...{}", &key[..4], &key[key.len() - 4..])
            }
        })
    }
}
