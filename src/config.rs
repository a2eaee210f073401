use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::chart::DEFAULT_CHART_BASE;
use crate::error::{ReportError, ReportResult};
use crate::search_console::{TrafficType, DEFAULT_API_BASE};
use crate::telegram::DEFAULT_TELEGRAM_BASE;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_chart_base() -> String {
    DEFAULT_CHART_BASE.to_string()
}

fn default_telegram_base() -> String {
    DEFAULT_TELEGRAM_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Property identifier exactly as registered in Search Console,
    /// e.g. "sc-domain:example.com" or "https://example.com/"
    pub site_url: String,
    /// Display name used in the notification text
    pub site_name: String,
    pub traffic_type: TrafficType,
    pub emoji: String,
    /// IANA zone name, e.g. "America/Argentina/Buenos_Aires"
    pub timezone: String,
    /// Path to the service-account key JSON
    pub service_account_key_file: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    /// Send a plain-text failure notice to the chat when a run aborts
    #[serde(default)]
    pub notify_on_failure: bool,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    #[serde(default = "default_chart_base")]
    pub chart_base_url: String,
    #[serde(default = "default_telegram_base")]
    pub telegram_base_url: String,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("SEARCH_PULSE_CONFIG_DIR") {
            PathBuf::from(dir)
        } else {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("~/.config"))
                .join("search-pulse")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn load() -> ReportResult<Self> {
        Self::load_from_dir(&Self::config_dir())
    }

    /// Load from an explicit directory, bypassing the env-var/default lookup
    pub fn load_from_dir(dir: &Path) -> ReportResult<Self> {
        let path = dir.join("config.toml");
        let content = fs::read_to_string(&path).map_err(|e| {
            ReportError::Config(format!(
                "could not read config at {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("failed to parse config file: {e}")))
    }

    pub fn save(&self) -> ReportResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        // Restrict config dir permissions
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;

        let path = Self::config_file();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReportError::Config(format!("failed to serialize config: {e}")))?;
        fs::write(&path, &content)?;
        // Restrict config file permissions (contains bot token)
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        Ok(())
    }

    /// Resolve the configured IANA zone name
    pub fn timezone(&self) -> ReportResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ReportError::Config(format!("unknown timezone {:?}", self.timezone)))
    }

    pub fn service_account_key_path(&self) -> PathBuf {
        PathBuf::from(&self.service_account_key_file)
    }
}
