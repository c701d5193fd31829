//! A minimal structured-logging core: leveled, formatted, multi-destination
//! log emission for a service binary. No rotation, shipping or retries; that
//! belongs to an ingestion pipeline, not the emission core.

pub mod config;
pub mod errors;
pub mod formatters;
pub mod logger;
pub mod record;
pub mod registry;
pub mod severity;
pub mod sinks;

pub use config::{LoggerConfig, SinkSpec};
pub use errors::{ConfigError, EmitError, RegistryError, SinkError};
pub use formatters::{Formatter, DEFAULT_TEMPLATE};
pub use logger::Logger;
pub use record::Record;
pub use registry::Registry;
pub use severity::Severity;
pub use sinks::{FileSink, MemorySink, NullSink, Sink, StderrSink};
