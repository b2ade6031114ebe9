//! Command-Line Interface (CLI) argument parsing.
//!
//! Arguments are parsed with `clap` and merged on top of the configuration
//! file and environment variables through the figment [`Provider`] impl.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

use crate::severity::Severity;

/// Writes a message, or a hex dump of a file, through the configured log sinks.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Severity of the emitted record.
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub level: Severity,

    /// Syslog facility to log to (enables the syslog sink).
    #[arg(long, value_name = "FACILITY")]
    pub syslog: Option<String>,

    /// Log file to append to (enables the file sink).
    #[arg(long, value_name = "FILE")]
    pub logfile: Option<PathBuf>,

    /// Render log file timestamps in UTC.
    #[arg(long)]
    pub utc: bool,

    /// Emit debug-level records.
    #[arg(short, long)]
    pub debug: bool,

    /// Hex dump the contents of this file instead of logging a message.
    #[arg(long, value_name = "FILE", conflicts_with = "message")]
    pub hex: Option<PathBuf>,

    /// Message to log. Read from stdin when omitted.
    #[arg(value_name = "MESSAGE")]
    pub message: Vec<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(facility) = &self.syslog {
            dict.insert("syslog".into(), Value::from(facility.clone()));
        }

        if let Some(path) = &self.logfile {
            dict.insert(
                "logfile".into(),
                Value::from(path.to_string_lossy().into_owned()),
            );
        }

        // Flags only override when present; absent means "leave the file's value".
        if self.utc {
            dict.insert("timestamps_utc".into(), Value::from(true));
        }
        if self.debug {
            dict.insert("debug".into(), Value::from(true));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
