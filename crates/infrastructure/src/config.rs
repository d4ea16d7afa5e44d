use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request, when set.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LedgerConfig {
    #[serde(default = "default_status_display_ms")]
    pub status_display_ms: u64,
    #[serde(default = "default_ledger_page_size")]
    pub page_size: u64,
}

fn default_status_display_ms() -> u64 {
    3000
}
fn default_ledger_page_size() -> u64 {
    10
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            status_display_ms: default_status_display_ms(),
            page_size: default_ledger_page_size(),
        }
    }
}

impl LedgerConfig {
    pub fn status_window(&self) -> Duration {
        Duration::from_millis(self.status_display_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_search_page_size")]
    pub page_size: u64,
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_search_page_size() -> u64 {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_search_page_size(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LabConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl LabConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_with_mode(config_dir, &run_mode)
    }

    pub fn load_with_mode(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Shared settings, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. OPU__API__BASE_URL=http://10.0.0.5/api)
            .add_source(Environment::with_prefix("OPU").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("opu-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = scratch_dir("empty");
        let config = LabConfig::load_with_mode(dir.to_str().unwrap(), "test").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.ledger.status_window(), Duration::from_millis(3000));
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.page_size, 20);
    }

    #[test]
    fn test_run_mode_file_overrides_default_file() {
        let dir = scratch_dir("layered");
        fs::write(
            dir.join("default.toml"),
            "[api]\nbase_url = \"http://lab.local/api\"\ntimeout_secs = 10\n\n[ledger]\npage_size = 25\n",
        )
        .unwrap();
        fs::write(
            dir.join("staging.toml"),
            "[api]\nbase_url = \"http://staging.lab.local/api\"\n",
        )
        .unwrap();

        let config = LabConfig::load_with_mode(dir.to_str().unwrap(), "staging").unwrap();
        assert_eq!(config.api.base_url, "http://staging.lab.local/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.ledger.page_size, 25);
        assert_eq!(config.ledger.status_display_ms, 3000);
        assert_eq!(config.api.token, None);
    }
}
