//! Harness settings: base URL, timeout, retry budget and environment.
//!
//! Settings are loaded once at startup and passed by reference to whatever
//! needs them. There is no process-wide instance; tests build their own.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::environment::Environment;
use crate::error::{Error, ErrorKind, Result};

/// Environment variable naming an alternative settings file.
pub const CONFIG_PATH_VAR: &str = "RESTCHECK_CONFIG";
/// Overrides `ApiSettings.BaseUrl`.
pub const BASE_URL_VAR: &str = "RESTCHECK_BASE_URL";
/// Overrides `ApiSettings.TimeoutInSeconds`.
pub const TIMEOUT_VAR: &str = "RESTCHECK_TIMEOUT_SECS";
/// Overrides `ApiSettings.MaxRetries`.
pub const MAX_RETRIES_VAR: &str = "RESTCHECK_MAX_RETRIES";
/// Overrides `TestSettings.Environment`.
pub const ENVIRONMENT_VAR: &str = "RESTCHECK_ENVIRONMENT";

/// Settings file used when [`CONFIG_PATH_VAR`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/appsettings.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Validated harness settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base URL every endpoint is resolved against.
    pub base_url: String,
    /// Per-attempt transport timeout in seconds. Always greater than zero.
    pub timeout_secs: u64,
    /// Additional attempts after the first; 0 disables retry.
    pub max_retries: u32,
    /// Environment name, used only to choose log verbosity.
    pub environment: String,
    /// Where reports are written, if configured.
    pub report_path: Option<PathBuf>,
    /// Ceiling on a single backoff delay. `None` leaves backoff uncapped.
    pub max_retry_delay_secs: Option<u64>,
}

/// On-disk layout of the settings file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsFile {
    api_settings: ApiSection,
    test_settings: TestSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiSection {
    base_url: String,
    timeout_in_seconds: u64,
    max_retries: u32,
    #[serde(default)]
    max_retry_delay_in_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TestSection {
    environment: String,
    #[serde(default)]
    report_path: Option<PathBuf>,
}

impl ApiSettings {
    /// Create settings from explicit values, validating them.
    pub fn new(
        base_url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        environment: impl Into<String>,
    ) -> Result<Self> {
        let settings = Self {
            base_url: base_url.into(),
            timeout_secs,
            max_retries,
            environment: environment.into(),
            report_path: None,
            max_retry_delay_secs: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from the JSON settings-file layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SettingsFile = serde_json::from_str(json)?;
        let settings = Self {
            base_url: file.api_settings.base_url,
            timeout_secs: file.api_settings.timeout_in_seconds,
            max_retries: file.api_settings.max_retries,
            environment: file.test_settings.environment,
            report_path: file.test_settings.report_path,
            max_retry_delay_secs: file.api_settings.max_retry_delay_in_seconds,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading settings");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `$RESTCHECK_CONFIG`, or `config/appsettings.json`
    /// under the working directory.
    pub fn load_default() -> Result<Self> {
        Self::load(default_path())
    }

    /// Build settings purely from environment variables.
    ///
    /// `RESTCHECK_BASE_URL` and `RESTCHECK_ENVIRONMENT` are required; timeout
    /// and retry budget fall back to 30 seconds and 3 retries.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_VAR).ok_or_else(|| missing_var(BASE_URL_VAR))?;
        let environment = lookup(ENVIRONMENT_VAR).ok_or_else(|| missing_var(ENVIRONMENT_VAR))?;

        let settings = Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            environment,
            report_path: None,
            max_retry_delay_secs: None,
        };
        settings.apply_overrides(lookup)
    }

    /// Apply `RESTCHECK_*` environment overrides on top of these settings.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup, then re-validate.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(BASE_URL_VAR) {
            self.base_url = url;
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            self.timeout_secs = parse_var(TIMEOUT_VAR, &value)?;
        }
        if let Some(value) = lookup(MAX_RETRIES_VAR) {
            self.max_retries = parse_var(MAX_RETRIES_VAR, &value)?;
        }
        if let Some(env) = lookup(ENVIRONMENT_VAR) {
            self.environment = env;
        }
        self.validate()?;
        Ok(self)
    }

    /// Set the backoff ceiling.
    pub fn with_max_retry_delay(mut self, secs: u64) -> Self {
        self.max_retry_delay_secs = Some(secs);
        self
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        let parsed = url::Url::parse(base_url)
            .map_err(|e| invalid("base_url", format!("{base_url:?} is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(
                "base_url",
                format!("unsupported scheme {:?}", parsed.scheme()),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }
        if self.environment.trim().is_empty() {
            return Err(invalid("environment", "must not be empty"));
        }
        Ok(())
    }

    /// The parsed environment tier.
    pub fn environment(&self) -> Environment {
        Environment::from_name(&self.environment)
    }
}

/// Path of the settings file [`ApiSettings::load_default`] reads.
pub fn default_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        Error::new(ErrorKind::EnvVar {
            name: name.to_string(),
            message: format!("{value:?}: {e}"),
        })
    })
}

fn missing_var(name: &str) -> Error {
    Error::new(ErrorKind::EnvVar {
        name: name.to_string(),
        message: "not set".to_string(),
    })
}

fn invalid(field: &'static str, message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Invalid {
        field,
        message: message.into(),
    })
}
