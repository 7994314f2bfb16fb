use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::assets::{get_config_dir, get_default_config};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Upper bound for a single HTTP exchange.
    pub request_secs: u64,
    /// Upper bound for a whole scenario, all of its requests included.
    pub scenario_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            scenario_secs: 120,
        }
    }
}

/// Validated harness configuration.
///
/// Built once and passed explicitly to the client, the fixture factory and the
/// runner. Nothing in the harness reads ambient configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Url,
    pub prefix: String,
    pub spec_pattern: String,
    pub auth_scheme: String,
    pub email_domain: String,
    pub timeouts: TimeoutConfig,
}

impl Config {
    /// Default settings pointed at `base_url`.
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            prefix: DEFAULT_PREFIX.to_string(),
            spec_pattern: DEFAULT_SPEC_PATTERN.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_secs)
    }

    pub fn scenario_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.scenario_secs)
    }

    /// Applies command line overrides and validates the result again.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
        let mut raw = RawConfig::from(self);
        if let Some(base_url) = overrides.base_url {
            raw.base_url = Some(base_url);
        }
        if let Some(prefix) = overrides.prefix {
            raw.prefix = Some(prefix);
        }
        if let Some(spec_pattern) = overrides.spec_pattern {
            raw.spec_pattern = Some(spec_pattern);
        }
        raw.to_config()
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub prefix: Option<String>,
    pub spec_pattern: Option<String>,
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_PREFIX: &str = "schmilblick";
const DEFAULT_SPEC_PATTERN: &str = "**/*";
const DEFAULT_AUTH_SCHEME: &str = "Bearer";
const DEFAULT_EMAIL_DOMAIN: &str = "django-ninja.dev";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    base_url: Option<String>,
    prefix: Option<String>,
    spec_pattern: Option<String>,
    auth_scheme: Option<String>,
    email_domain: Option<String>,
    #[serde(default)]
    timeouts: TimeoutConfig,
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        Self {
            base_url: Some(config.base_url.to_string()),
            prefix: Some(config.prefix),
            spec_pattern: Some(config.spec_pattern),
            auth_scheme: Some(config.auth_scheme),
            email_domain: Some(config.email_domain),
            timeouts: config.timeouts,
        }
    }
}

fn non_empty(field: &str, value: Option<&str>, default: &str) -> Result<String, ConfigError> {
    let value = value.unwrap_or(default).trim();
    if value.is_empty() {
        return Err(ConfigError::Config(format!("'{field}' must not be empty")));
    }
    Ok(value.to_string())
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, ConfigError> {
        let base_url_text = non_empty("base_url", self.base_url.as_deref(), DEFAULT_BASE_URL)?;
        let base_url = Url::parse(&base_url_text)
            .map_err(|e| ConfigError::Config(format!("Invalid base_url '{base_url_text}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Config(format!(
                "base_url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let spec_pattern = non_empty(
            "spec_pattern",
            self.spec_pattern.as_deref(),
            DEFAULT_SPEC_PATTERN,
        )?;
        glob::Pattern::new(&spec_pattern).map_err(|e| {
            ConfigError::Config(format!("Invalid spec_pattern '{spec_pattern}': {e}"))
        })?;

        if self.timeouts.request_secs == 0 || self.timeouts.scenario_secs == 0 {
            return Err(ConfigError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            base_url,
            prefix: non_empty("prefix", self.prefix.as_deref(), DEFAULT_PREFIX)?,
            spec_pattern,
            auth_scheme: non_empty(
                "auth_scheme",
                self.auth_scheme.as_deref(),
                DEFAULT_AUTH_SCHEME,
            )?,
            email_domain: non_empty(
                "email_domain",
                self.email_domain.as_deref(),
                DEFAULT_EMAIL_DOMAIN,
            )?
            .trim_start_matches('@')
            .to_string(),
            timeouts: self.timeouts.clone(),
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| get_config_dir().join("conduit-e2e.yml"));

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = if content.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };
    raw.to_config()
}
