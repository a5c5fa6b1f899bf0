use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

// ── Remote service ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the inventory record-keeping service.  Overridden at
    /// runtime by the `SHELFWATCH_BASE_URL` environment variable when set.
    pub base_url: String,
    /// Per-request timeout in seconds for all remote calls.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

// ── Refresh loop ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Milliseconds between scheduled snapshot refreshes.
    pub interval_ms: u64,
    /// Milliseconds a burst of search-term changes is collapsed over before
    /// a remote fetch is issued.  The local view filter is not debounced.
    pub search_debounce_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            search_debounce_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub refresh: RefreshConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        // Env overrides take precedence over file values.
        if let Ok(value) = env::var("SHELFWATCH_BASE_URL") {
            if !value.is_empty() {
                config.service.base_url = value;
            }
        }
        if let Ok(value) = env::var("SHELFWATCH_LOG") {
            if !value.is_empty() {
                config.telemetry.log_level = value;
            }
        }

        Url::parse(&config.service.base_url)
            .with_context(|| format!("invalid service.base_url: {}", config.service.base_url))?;

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Base URL with any trailing slash removed, ready for path joining.
    pub fn service_root(&self) -> &str {
        self.service.base_url.trim_end_matches('/')
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
