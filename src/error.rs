use std::path::PathBuf;
use thiserror::Error;

use crate::facility::FacilityError;

/// Errors raised while setting up logging. Once a dispatcher exists, logging
/// itself never fails.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to load logging configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Facility(#[from] FacilityError),

    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syslog identity {0:?} contains a NUL byte")]
    InvalidIdent(String),
}

impl From<figment::Error> for LogError {
    fn from(err: figment::Error) -> Self {
        LogError::Config(Box::new(err))
    }
}
