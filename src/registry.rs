use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::{LoggerConfig, SinkSpec};
use crate::errors::{ConfigError, RegistryError};
use crate::formatters::Formatter;
use crate::logger::Logger;
use crate::sinks::{FileSink, NullSink, Sink, StderrSink};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

struct Entry {
    logger: Arc<Logger>,
    applied: Option<LoggerConfig>,
}

/// Keyed lookup table from logger name to shared logger instance. The
/// process-wide one lives behind `Registry::global`; tests construct their
/// own with `Registry::new` for isolation.
#[derive(Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Entry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created lazily on first use and torn down
    /// only at process exit.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Idempotent: concurrent calls for one name all land on the same
    /// instance. A fresh logger starts at DEBUG with zero destinations.
    pub fn get_or_create(&self, name: &str) -> Arc<Logger> {
        let mut entries = self.entries.lock().unwrap();

        entries
            .entry(name.to_string())
            .or_insert_with(|| Entry {
                logger: Arc::new(Logger::new(name)),
                applied: None,
            })
            .logger
            .clone()
    }

    /// Configures a logger from a config value. Re-applying an identical
    /// config is a no-op returning the existing instance; a differing config
    /// for an already-configured name is a conflict.
    pub fn apply(&self, config: &LoggerConfig) -> Result<Arc<Logger>, RegistryError> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.get(&config.name) {
            if let Some(applied) = &entry.applied {
                if applied == config {
                    return Ok(entry.logger.clone());
                }
                return Err(RegistryError::Conflict {
                    name: config.name.clone(),
                });
            }
        }

        // Validate the template and open every sink before touching the
        // logger, so a bad config leaves no half-configured state behind.
        let formatter = Formatter::new(&config.template)?;
        let mut destinations: Vec<(Formatter, Box<dyn Sink>)> =
            Vec::with_capacity(config.destinations.len());
        for spec in &config.destinations {
            let sink: Box<dyn Sink> = match spec {
                SinkSpec::Stderr => Box::new(StderrSink::new()),
                SinkSpec::File { path } => {
                    Box::new(FileSink::new(path).map_err(|source| ConfigError::OpenSink {
                        path: path.clone(),
                        source,
                    })?)
                }
                SinkSpec::Null => Box::new(NullSink),
            };
            destinations.push((formatter.clone(), sink));
        }

        let entry = entries.entry(config.name.clone()).or_insert_with(|| Entry {
            logger: Arc::new(Logger::new(&config.name)),
            applied: None,
        });
        entry.logger.set_threshold(config.threshold);
        for (formatter, sink) in destinations {
            entry.logger.add_destination(formatter, sink);
        }
        entry.applied = Some(config.clone());

        Ok(entry.logger.clone())
    }

    /// Drains any buffering in every registered logger's sinks. Meant for
    /// shutdown paths.
    pub fn flush_all(&self) {
        let entries = self.entries.lock().unwrap();
        for entry in entries.values() {
            entry.logger.flush();
        }
    }
}
