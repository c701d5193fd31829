use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Setup-time misconfiguration. Fatal to the setup call, never to the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unterminated placeholder at byte {position} of template")]
    UnterminatedPlaceholder { position: usize },

    #[error("unknown severity name {0:?}")]
    UnknownSeverity(String),

    #[error("failed opening log file {path}")]
    OpenSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-write destination failure. Reported back to the logger, never raised
/// into the caller's control flow.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink io failure")]
    Io(#[from] io::Error),

    #[error("sink is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("logger {name:?} is already configured differently")]
    Conflict { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Aggregate of the destinations that failed during one emit. Destinations
/// that succeeded have already received the record.
#[derive(Debug, Error)]
#[error("{} of {} destinations failed", .failures.len(), .attempted)]
pub struct EmitError {
    pub attempted: usize,
    pub failures: Vec<(usize, SinkError)>,
}
