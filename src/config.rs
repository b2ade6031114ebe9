//! Configuration for the logging layer.
//!
//! `LogConfig` is loaded with `figment`, layering built-in defaults, a
//! `flowlog.toml` file, `FLOWLOG_`-prefixed environment variables and finally
//! command-line overrides.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::LogError;
use crate::facility::{parse_log_facility, Facility};

/// Configuration file read when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "flowlog.toml";

/// Settings consumed by the [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    /// Emit debug-level records.
    #[serde(default)]
    pub debug: bool,
    /// Syslog facility name, e.g. `"daemon"` or `"local0"`. Enables the syslog sink.
    pub syslog: Option<String>,
    /// Path of the log file. Enables the file sink.
    pub logfile: Option<PathBuf>,
    /// Render file sink timestamps in UTC rather than local time.
    #[serde(default)]
    pub timestamps_utc: bool,
    /// Identity passed to `openlog(3)`.
    pub ident: String,
}

impl LogConfig {
    /// Loads the configuration, letting `cli` override every other source.
    pub fn load(cli: &Cli) -> Result<Self, LogError> {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config: LogConfig = Figment::new()
            .merge(Serialized::defaults(LogConfig::default()))
            .merge(Toml::file(path))
            // e.g. FLOWLOG_TIMESTAMPS_UTC=true
            .merge(Env::prefixed("FLOWLOG_"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }

    /// Resolves the configured syslog facility, if syslog output is enabled.
    pub fn facility(&self) -> Result<Option<Facility>, LogError> {
        match &self.syslog {
            Some(name) => Ok(Some(parse_log_facility(name)?)),
            None => Ok(None),
        }
    }

    /// True when at least one structured sink is configured.
    pub fn has_sinks(&self) -> bool {
        self.syslog.is_some() || self.logfile.is_some()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            syslog: None,
            logfile: None,
            timestamps_utc: false,
            ident: "flowlog".to_string(),
        }
    }
}
