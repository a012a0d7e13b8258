//! Configuration management for MovieManager
//!
//! Handles config file loading/saving and backend URL resolution.
//! Config is stored at ~/.config/moviemanager/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BACKEND_URL;
use crate::store::ThemeMode;

/// Environment variable selecting the backend origin
pub const BACKEND_ENV: &str = "MOVIES_BACKEND";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin, e.g. http://localhost:8000
    pub backend_url: Option<String>,
    /// Color scheme, persisted when toggled
    #[serde(default)]
    pub theme: ThemeMode,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/moviemanager/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviemanager").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, or return default if missing or invalid
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }

    /// Backend URL with fallback chain:
    /// 1. Explicit override (--backend)
    /// 2. Environment variable MOVIES_BACKEND
    /// 3. Config file
    /// 4. http://localhost:8000
    pub fn backend_url(&self, explicit: Option<&str>) -> String {
        let env = std::env::var(BACKEND_ENV).ok();
        resolve_backend_url(explicit, env.as_deref(), self.backend_url.as_deref())
    }
}

fn resolve_backend_url(explicit: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [explicit, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
        .to_string()
}
