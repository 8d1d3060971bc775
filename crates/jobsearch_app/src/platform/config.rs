use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use jobsearch_core::{Tuning, DEFAULT_ROUTE};
use jobsearch_engine::{ClientSettings, DEFAULT_API_BASE};
use jobsearch_logging::LogDestination;
use log::LevelFilter;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "jobsearch.ron";
pub const LOG_FILENAME: &str = "jobsearch.log";

pub const ENV_API_BASE: &str = "JOBSEARCH_API_BASE";
pub const ENV_API_TOKEN: &str = "JOBSEARCH_API_TOKEN";
pub const ENV_LOG: &str = "JOBSEARCH_LOG";
pub const ENV_LOG_LEVEL: &str = "JOBSEARCH_LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings of the headless front end, read from `jobsearch.ron` and then
/// overridden by `JOBSEARCH_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub api_token: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    /// Location used when none is given on the command line.
    pub route: String,
    /// `terminal`, `file` or `both`.
    pub log: String,
    pub log_level: String,
    pub text_quiet_ms: u64,
    pub typeahead_quiet_ms: u64,
    pub salary_quiet_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let tuning = Tuning::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_bytes: client.max_bytes,
            route: DEFAULT_ROUTE.to_string(),
            // The terminal belongs to the rendered screen.
            log: "file".to_string(),
            log_level: "info".to_string(),
            text_quiet_ms: tuning.text_quiet.as_millis() as u64,
            typeahead_quiet_ms: tuning.typeahead_quiet.as_millis() as u64,
            salary_quiet_ms: tuning.salary_quiet.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Load `jobsearch.ron` from `dir` (a missing file means defaults) and
    /// apply the process environment.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::from_file(&dir.join(CONFIG_FILENAME))?
            .with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = (!token.is_empty()).then_some(token);
        }
        if let Some(log) = lookup(ENV_LOG) {
            self.log = log;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.api_base).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "api_base",
                value: self.api_base.clone(),
            });
        }
        if LogDestination::from_str(&self.log).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "log",
                value: self.log.clone(),
            });
        }
        if LevelFilter::from_str(&self.log_level).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "log_level",
                value: self.log_level.clone(),
            });
        }
        Ok(())
    }

    pub fn log_destination(&self) -> LogDestination {
        self.log.parse().unwrap_or(LogDestination::File)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_base: self.api_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            bearer_token: self.api_token.clone(),
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            text_quiet: Duration::from_millis(self.text_quiet_ms),
            typeahead_quiet: Duration::from_millis(self.typeahead_quiet_ms),
            salary_quiet: Duration::from_millis(self.salary_quiet_ms),
            ..Tuning::default()
        }
    }
}
