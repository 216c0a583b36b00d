use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Deserialize;

use crate::api::client::DEFAULT_REQUEST_TIMEOUT;
use crate::insight::{DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL, DEFAULT_AI_TIMEOUT};
use crate::sync::DEFAULT_BOOTSTRAP_TIMEOUT;

pub const API_URL_ENV: &str = "SMARTCONTACT_API_URL";
pub const API_KEY_ENV: &str = "API_KEY";

/// Client settings, stored as `smartcontact.toml` in the user config dir.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub bootstrap_timeout_ms: u64,
    /// Deadline for each add or delete call once bootstrap is done.
    pub request_timeout_ms: u64,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_base_url: String,
    pub ai_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            bootstrap_timeout_ms: DEFAULT_BOOTSTRAP_TIMEOUT.as_millis() as u64,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            ai_api_key: None,
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_base_url: DEFAULT_AI_BASE_URL.to_string(),
            ai_timeout_ms: DEFAULT_AI_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("smartcontact.toml"))
    }

    /// Load from the default location and apply environment overrides.
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        let from_file = Self::toml_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default();
        from_file.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let text = fs::read_to_string(path).ok()?;
        match toml::from_str::<Settings>(&text) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("settings: ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.ai_api_key = Some(key);
        }
        self
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.bootstrap_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_timeout_ms)
    }
}
