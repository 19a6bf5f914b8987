//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::market_data::{DEFAULT_PAGE_SIZE, LookbackWindow, SortPolicy};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Rows per market list page
    pub page_size: usize,

    /// Chart window used when a detail view is opened
    pub default_lookback_days: u32,

    /// How repeated sort invocations pick a direction
    pub sort_policy: SortPolicy,

    /// Logging level
    pub log_level: String,

    /// File-based logging configuration
    pub log: LogConfig,

    /// Upstream endpoints
    pub api: ApiConfig,

    /// UI-specific configuration
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// CoinGecko REST base URL
    pub market_url: String,

    /// Quote currency for prices
    pub vs_currency: String,

    /// CryptoCompare news endpoint
    pub news_url: String,

    /// News language filter
    pub news_lang: String,

    /// CryptoCompare API key; read from file or env, never written back
    #[serde(skip_serializing)]
    pub news_api_key: Option<String>,

    /// Request timeout in seconds; no timeout when unset
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start in dark mode
    pub dark_mode: bool,

    /// UI refresh rate in milliseconds
    pub refresh_rate_ms: u64,

    /// Coin ids shown as navbar shortcuts
    pub quick_links: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Absolute or relative path to the log file used by the TUI
    pub file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_lookback_days: LookbackWindow::MONTH.days(),
            sort_policy: SortPolicy::default(),
            log_level: "info".to_string(),
            log: LogConfig::default(),
            api: ApiConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            market_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            news_url: "https://min-api.cryptocompare.com/data/v2/news/".to_string(),
            news_lang: "EN".to_string(),
            news_api_key: None,
            timeout_seconds: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            refresh_rate_ms: 100,
            quick_links: vec!["bitcoin".to_string(), "ethereum".to_string()],
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: "logs/coinview.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply `COINVIEW_*` environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("COINVIEW_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            self.page_size = value;
        }

        if let Some(value) = lookup("COINVIEW_LOOKBACK_DAYS").and_then(|v| v.parse().ok()) {
            self.default_lookback_days = value;
        }

        if let Some(policy) = lookup("COINVIEW_SORT_POLICY") {
            match policy.parse() {
                Ok(value) => self.sort_policy = value,
                Err(e) => tracing::warn!("Ignoring COINVIEW_SORT_POLICY: {}", e),
            }
        }

        if let Some(log_level) = lookup("COINVIEW_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(file_path) = lookup("COINVIEW_LOG_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.log.file_path = file_path;
            }
        }

        if let Some(url) = lookup("COINVIEW_MARKET_URL") {
            self.api.market_url = url;
        }

        if let Some(url) = lookup("COINVIEW_NEWS_URL") {
            self.api.news_url = url;
        }

        if let Some(key) = lookup("COINVIEW_NEWS_API_KEY") {
            self.api.news_api_key = Some(key).filter(|k| !k.trim().is_empty());
        }

        if let Some(value) = lookup("COINVIEW_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.api.timeout_seconds = Some(value);
        }

        if let Some(dark) = lookup("COINVIEW_DARK_MODE") {
            self.ui.dark_mode = dark.parse().unwrap_or(self.ui.dark_mode);
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to default; env overrides apply either way.
    ///
    /// A missing file is not an error. Any other load failure is returned next
    /// to the fallback so the caller can report it once logging is up.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        let path = path.as_ref();
        let fallback = || {
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        };

        if !path.exists() {
            return (fallback(), None);
        }

        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (fallback(), Some(err)),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }

        if self.default_lookback_days == 0 {
            anyhow::bail!("default_lookback_days must be greater than 0");
        }

        if self.ui.refresh_rate_ms == 0 {
            anyhow::bail!("Refresh rate must be greater than 0");
        }

        if self.api.timeout_seconds == Some(0) {
            anyhow::bail!("Timeout must be greater than 0 when set");
        }

        if self.log.file_path.trim().is_empty() {
            anyhow::bail!("Log file path must not be empty");
        }

        for (name, url) in [
            ("api.market_url", &self.api.market_url),
            ("api.news_url", &self.api.news_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must be an http(s) URL: {}", name, url);
            }
        }

        if self.ui.quick_links.iter().any(|id| id.trim().is_empty()) {
            anyhow::bail!("ui.quick_links must not contain empty ids");
        }

        Ok(())
    }

    /// Display formatted configuration
    pub fn display(&self) -> Result<()> {
        println!("Current configuration:");
        println!(
            "{}",
            toml::to_string_pretty(self).context("Failed to serialize configuration")?
        );
        println!(
            "# news_api_key: {}",
            if self.api.news_api_key.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        Ok(())
    }

    /// Display configuration summary
    pub fn display_summary(&self) -> Result<()> {
        println!("Configuration loaded successfully");
        println!("  Page size: {}", self.page_size);
        println!(
            "  Default chart window: {}",
            LookbackWindow::new(self.default_lookback_days).label()
        );
        println!("  Sort policy: {:?}", self.sort_policy);
        println!("  Market API: {}", self.api.market_url);
        println!("  News API: {}", self.api.news_url);
        println!("  Log file: {}", self.log.file_path);
        Ok(())
    }

    /// Display configuration management help
    pub fn display_help() -> Result<()> {
        println!("Configuration management commands:");
        println!("  coinview config show    - Show current configuration");
        println!("  coinview config reset   - Reset to default configuration");
        Ok(())
    }

    /// Handle configuration command
    pub fn handle_command(
        action: &Option<crate::cli::ConfigAction>,
        config_path: &str,
        current: &Config,
    ) -> Result<()> {
        match action {
            Some(crate::cli::ConfigAction::Show) => {
                current.display()?;
            }
            Some(crate::cli::ConfigAction::Reset) => {
                let default_config = Config::default();
                default_config.save_to_file(config_path)?;
                println!("Wrote default configuration to {}", config_path);
                default_config.display()?;
            }
            None => {
                Config::display_help()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.default_lookback_days, 30);
        assert_eq!(config.sort_policy, SortPolicy::ToggleEveryInvocation);
        assert_eq!(config.ui.quick_links, vec!["bitcoin", "ethereum"]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
page_size = 50
sort_policy = "reset_on_field_change"

[ui]
dark_mode = true
"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.sort_policy, SortPolicy::ResetOnFieldChange);
        assert!(config.ui.dark_mode);
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert_eq!(config.api.vs_currency, "usd");
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            ("COINVIEW_PAGE_SIZE", "10"),
            ("COINVIEW_LOOKBACK_DAYS", "not-a-number"),
            ("COINVIEW_SORT_POLICY", "reset_on_field_change"),
            ("COINVIEW_MARKET_URL", "http://127.0.0.1:9000"),
            ("COINVIEW_NEWS_API_KEY", "secret"),
            ("COINVIEW_TIMEOUT_SECONDS", "5"),
            ("COINVIEW_DARK_MODE", "true"),
        ]));

        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_lookback_days, 30);
        assert_eq!(config.sort_policy, SortPolicy::ResetOnFieldChange);
        assert_eq!(config.api.market_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.news_api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_seconds, Some(5));
        assert!(config.ui.dark_mode);
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("COINVIEW_NEWS_API_KEY", "  ")]));
        assert!(config.api.news_api_key.is_none());
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let mut config = Config::default();
        config.api.news_api_key = Some("secret".to_string());
        let serialized = toml::to_string(&config).unwrap();
        assert!(!serialized.contains("secret"));
        assert!(!serialized.contains("news_api_key"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.market_url = "api.coingecko.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.page_size = 25;
        let temp_file = NamedTempFile::new().unwrap();

        // Test save
        config.save_to_file(temp_file.path()).unwrap();

        // Test load
        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.page_size, 25);
        assert_eq!(loaded_config.api.market_url, config.api.market_url);
    }

    #[test]
    fn test_load_or_default_reports_bad_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "page_size = \"twenty\"\n").unwrap();

        let (config, err) = Config::load_or_default(temp_file.path());
        assert_eq!(config.page_size, 20);
        let err = err.expect("parse failure is reported");
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_or_default_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let (config, err) = Config::load_or_default(dir.path().join("absent.toml"));
        assert!(err.is_none());
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_log_level_override() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("COINVIEW_LOG_LEVEL", "warn")]));
        assert_eq!(config.log_level, "warn");
    }
}
