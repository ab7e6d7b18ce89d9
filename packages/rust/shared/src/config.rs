//! Application configuration for BrandGate.
//!
//! User config lives at `~/.brandgate/brandgate.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BrandGateError, Result};
use crate::types::Environment;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "brandgate.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".brandgate";

// ---------------------------------------------------------------------------
// Config structs (matching brandgate.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Notification webhook settings.
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Environment selector; `test` writes to `_dev`-suffixed tables.
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Database file path. A leading `~` expands to the home directory.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            db_path: default_db_path(),
        }
    }
}

fn default_environment() -> Environment {
    Environment::Test
}
fn default_db_path() -> String {
    "~/.brandgate/brandgate.db".into()
}

/// `[notifier]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Webhook URL the notification payload is POSTed to.
    #[serde(default)]
    pub webhook_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

fn default_notify_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.brandgate/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BrandGateError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.brandgate/brandgate.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BrandGateError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BrandGateError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BrandGateError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BrandGateError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BrandGateError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the configured database path, expanding a leading `~`.
pub fn resolve_db_path(config: &AppConfig) -> Result<PathBuf> {
    let raw = &config.defaults.db_path;
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| BrandGateError::config("could not determine home directory"))?;
        Ok(home.join(rest))
    } else {
        Ok(PathBuf::from(raw))
    }
}

/// Check that a notification webhook URL is configured.
pub fn validate_webhook(config: &AppConfig) -> Result<()> {
    if config.notifier.webhook_url.is_empty() {
        return Err(BrandGateError::config(
            "notification webhook URL not configured. Set [notifier] webhook_url in brandgate.toml.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("db_path"));
        assert!(toml_str.contains("environment"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.environment, Environment::Test);
        assert_eq!(parsed.notifier.timeout_secs, 30);
    }

    #[test]
    fn prod_environment_parses() {
        let toml_str = r#"
[defaults]
environment = "prod"
db_path = "/var/lib/brandgate/requests.db"

[notifier]
webhook_url = "https://hooks.example.com/notify"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.environment, Environment::Prod);
        assert_eq!(
            resolve_db_path(&config).unwrap(),
            PathBuf::from("/var/lib/brandgate/requests.db")
        );
        assert!(validate_webhook(&config).is_ok());
    }

    #[test]
    fn missing_webhook_rejected() {
        let config = AppConfig::default();
        let result = validate_webhook(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("webhook"));
    }

    #[test]
    fn tilde_expansion() {
        let mut config = AppConfig::default();
        config.defaults.db_path = "~/.brandgate/brandgate.db".into();
        let resolved = resolve_db_path(&config).expect("resolve");
        assert!(!resolved.to_string_lossy().starts_with('~'));
        assert!(resolved.ends_with(".brandgate/brandgate.db"));
    }
}
