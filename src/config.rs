use std::path::PathBuf;

use crate::formatters::DEFAULT_TEMPLATE;
use crate::severity::Severity;

/// A destination kind plus its parameters, resolved into a real sink when
/// the config is applied to a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSpec {
    Stderr,
    File { path: PathBuf },
    Null,
}

/// The full configuration surface for one named logger. Applied through
/// `Registry::apply`; template validation happens there, so a bad template
/// surfaces at setup rather than per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub name: String,
    pub threshold: Severity,
    pub template: String,
    pub destinations: Vec<SinkSpec>,
}

impl LoggerConfig {
    /// Defaults: DEBUG threshold, the default template, one stderr
    /// destination.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: Severity::Debug,
            template: DEFAULT_TEMPLATE.to_string(),
            destinations: vec![SinkSpec::Stderr],
        }
    }

    pub fn with_threshold(self, threshold: Severity) -> Self {
        Self { threshold, ..self }
    }

    pub fn with_template(self, template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..self
        }
    }

    pub fn with_destination(mut self, destination: SinkSpec) -> Self {
        self.destinations.push(destination);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_console_logger() {
        let config = LoggerConfig::new("svc");

        assert_eq!(config.name, "svc");
        assert_eq!(config.threshold, Severity::Debug);
        assert_eq!(config.template, DEFAULT_TEMPLATE);
        assert_eq!(config.destinations, vec![SinkSpec::Stderr]);
    }

    #[test]
    fn builder_calls_accumulate() {
        let config = LoggerConfig::new("svc")
            .with_threshold(Severity::Warn)
            .with_template("{level} {message}")
            .with_destination(SinkSpec::File {
                path: "/tmp/svc.log".into(),
            });

        assert_eq!(config.threshold, Severity::Warn);
        assert_eq!(config.template, "{level} {message}");
        assert_eq!(config.destinations.len(), 2);
    }
}
