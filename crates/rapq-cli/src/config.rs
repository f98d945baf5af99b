//! Configuration management for the rapq CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file (`--config`, or `~/.rapq/config.yaml` when present)
//! 2. Environment variables (with `RAPQ_` prefix, plus `DWAVE_API_TOKEN`
//!    and `DWAVE_API_ENDPOINT`)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::fmt;
use std::path::{Path, PathBuf};

use rapq_hal::{DWAVE_TOKEN_ENV, SolverConfig};
use rapq_rap::{DEFAULT_LABEL, RapProblem};
use serde::{Deserialize, Serialize};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RapqConfig {
    /// Problem instance to build
    #[serde(default)]
    pub problem: RapProblem,

    /// Solver selection and credentials
    #[serde(default)]
    pub solver: SolverSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Solver settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Solver backend: "exact" or "leap"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Problem label sent with the submission
    #[serde(default = "default_label")]
    pub label: String,

    /// Run-time limit in seconds (leap only)
    #[serde(default)]
    pub time_limit: Option<f64>,

    /// Variable limit of the exact solver
    #[serde(default)]
    pub max_variables: Option<u64>,

    /// SAPI endpoint (leap only)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Remote solver name (leap only)
    #[serde(default)]
    pub solver_name: Option<String>,

    /// API token (set via DWAVE_API_TOKEN)
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl fmt::Debug for SolverSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverSettings")
            .field("backend", &self.backend)
            .field("label", &self.label)
            .field("time_limit", &self.time_limit)
            .field("max_variables", &self.max_variables)
            .field("endpoint", &self.endpoint)
            .field("solver_name", &self.solver_name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used without `-v`: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_backend() -> String {
    "exact".to_string()
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            backend: default_backend(),
            label: default_label(),
            time_limit: None,
            max_variables: None,
            endpoint: None,
            solver_name: None,
            token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Default configuration file location (`~/.rapq/config.yaml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rapq").join("config.yaml"))
}

impl RapqConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load from the given file, else the default file if it exists
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => RapqConfig::default(),
            },
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables from a lookup function into this configuration.
    ///
    /// Only variables the lookup returns override the file-loaded (or
    /// default) values.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Solver
        if let Some(v) = lookup("RAPQ_SOLVER") {
            self.solver.backend = v;
        }
        if let Some(v) = lookup("RAPQ_LABEL") {
            self.solver.label = v;
        }
        if let Some(v) = lookup("RAPQ_TIME_LIMIT") {
            if let Ok(val) = v.parse() {
                self.solver.time_limit = Some(val);
            }
        }
        if let Some(v) = lookup("RAPQ_LEAP_SOLVER") {
            self.solver.solver_name = Some(v);
        }

        // Credentials
        if let Some(v) = lookup(DWAVE_TOKEN_ENV) {
            self.solver.token = Some(v);
        }
        if let Some(v) = lookup("DWAVE_API_ENDPOINT") {
            self.solver.endpoint = Some(v);
        }

        // Logging
        if let Some(v) = lookup("RAPQ_LOG_LEVEL") {
            self.logging.level = v;
        }

        self
    }

    /// Backend name, lowercased.
    pub fn backend(&self) -> String {
        self.solver.backend.trim().to_ascii_lowercase()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend().as_str() {
            "exact" | "leap" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown solver backend: {other} (expected exact or leap)"
                )));
            }
        }

        if self.solver.label.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "solver label must not be empty".to_string(),
            ));
        }

        if let Some(t) = self.solver.time_limit {
            if !(t.is_finite() && t > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "time_limit must be a positive number of seconds, got {t}"
                )));
            }
        }

        if let Some(ref token) = self.solver.token {
            if token.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "token must not be empty; unset DWAVE_API_TOKEN instead".to_string(),
                ));
            }
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        self.problem
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid problem: {e}")))
    }

    /// Solver configuration handed to the adapter factories.
    pub fn solver_config(&self) -> SolverConfig {
        let s = &self.solver;
        let mut config = SolverConfig::new(self.backend());
        if let Some(ref endpoint) = s.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(ref token) = s.token {
            config = config.with_token(token.clone());
        }
        if let Some(ref name) = s.solver_name {
            config = config.with_extra("solver", serde_json::json!(name));
        }
        if let Some(t) = s.time_limit {
            config = config.with_extra("time_limit", serde_json::json!(t));
        }
        if let Some(n) = s.max_variables {
            config = config.with_extra("max_variables", serde_json::json!(n));
        }
        config
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
