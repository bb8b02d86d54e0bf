//! Portfolio configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default name shown when the profile has none.
pub const DEFAULT_PROFILE_NAME: &str = "John Developer";

/// Default tagline shown when the profile has no title.
pub const DEFAULT_PROFILE_TITLE: &str = "Full Stack Developer & UI/UX Designer passionate about creating beautiful, functional web experiences";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Edit workflow settings.
    #[serde(default)]
    pub editing: EditingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Profile placeholder content.
    #[serde(default)]
    pub profile: ProfileDefaults,
}

impl PortfolioConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            Self::from_toml(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Prefix joined to every endpoint path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scheme and host that relative base URLs resolve against when the
    /// client runs outside a browser. `None` leaves URLs as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

fn default_base_url() -> String {
    "/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            origin: None,
        }
    }
}

impl ApiConfig {
    /// Join the base URL with an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// What to do when an edit affordance is activated while a modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReopenPolicy {
    /// Keep the open modal and drop the new activation.
    #[default]
    Ignore,
    /// Replace the target of the open modal.
    Retarget,
}

/// Edit workflow settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditingConfig {
    #[serde(default)]
    pub reopen: ReopenPolicy,
}

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

/// Placeholder content for a profile with missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_name")]
    pub default_name: String,
    #[serde(default = "default_title")]
    pub default_title: String,
    /// Image shown when the profile has no photo. Empty renders a plain
    /// placeholder block.
    #[serde(default)]
    pub placeholder_image_url: String,
}

fn default_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

fn default_title() -> String {
    DEFAULT_PROFILE_TITLE.to_string()
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            default_name: default_name(),
            default_title: default_title(),
            placeholder_image_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PortfolioConfig::from_toml("").unwrap();
        assert_eq!(config, PortfolioConfig::default());
        assert_eq!(config.api.base_url, "/api");
        assert_eq!(config.api.origin, None);
        assert_eq!(config.editing.reopen, ReopenPolicy::Ignore);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.profile.default_name, "John Developer");
    }

    #[test]
    fn test_full_toml() {
        let config = PortfolioConfig::from_toml(
            r#"
[api]
base_url = "https://example.com/api/"

[editing]
reopen = "retarget"

[logging]
level = "debug"
format = "human"

[profile]
default_name = "Jane"
"#,
        )
        .unwrap();

        assert_eq!(config.editing.reopen, ReopenPolicy::Retarget);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Human);
        assert_eq!(config.profile.default_name, "Jane");
        assert_eq!(config.profile.default_title, DEFAULT_PROFILE_TITLE);
        assert_eq!(
            config.api.url_for("/projects"),
            "https://example.com/api/projects"
        );
    }

    #[test]
    fn test_api_origin() {
        let config =
            PortfolioConfig::from_toml("[api]\norigin = \"http://localhost:3000\"").unwrap();
        assert_eq!(config.api.origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.api.base_url, "/api");
        assert_eq!(PortfolioConfig::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }

    #[test]
    fn test_invalid_reopen_policy_rejected() {
        assert!(PortfolioConfig::from_toml("[editing]\nreopen = \"sometimes\"").is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_policy() {
        let mut config = PortfolioConfig::default();
        config.editing.reopen = ReopenPolicy::Retarget;
        let text = config.to_toml().unwrap();
        assert_eq!(PortfolioConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = PortfolioConfig::load("/nonexistent/folio.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }
}
