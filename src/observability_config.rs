//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics export.

use std::env;

/// Observability configuration for different environments
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Prometheus metrics and health check port
    pub metrics_port: u16,
    /// Whether the metrics port may be below 1024
    pub allow_privileged_ports: bool,
    /// Log level for this crate's targets
    pub log_level: String,
    /// Log output format, `pretty` or `json`
    pub log_format: String,
    /// Whether to serve metrics over HTTP
    pub enable_metrics_export: bool,
    /// Global labels attached to every exported metric
    pub tags: Vec<(String, String)>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            metrics_port: 9090,
            allow_privileged_ports: false,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            enable_metrics_export: true,
            tags: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            metrics_port: parse_metrics_port(env::var("METRICS_PORT").ok().as_deref())?,
            allow_privileged_ports: env::var("ALLOW_PRIVILEGED_PORTS")
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_level: env::var("OBSERVABILITY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            enable_metrics_export: env::var("ENABLE_METRICS_EXPORT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            tags: env::var("METRICS_TAGS")
                .map(|tags| parse_tags(&tags))
                .unwrap_or_default(),
        };
        config.add_default_tags();
        Ok(config)
    }

    /// Add default tags based on environment
    fn add_default_tags(&mut self) {
        self.tags
            .push(("environment".to_string(), self.environment.clone()));
        self.tags
            .push(("service".to_string(), "number-lookup-bot".to_string()));

        if let Ok(hostname) = env::var("HOSTNAME") {
            self.tags.push(("hostname".to_string(), hostname));
        }
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether logs should be rendered human-readable
    pub fn use_pretty_logs(&self) -> bool {
        self.is_development() || self.log_format == "pretty"
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.metrics_port == 0 {
            return Err(format!("Invalid metrics port: {}", self.metrics_port));
        }

        if !self.allow_privileged_ports && self.metrics_port < 1024 {
            return Err(format!(
                "Metrics port {} is privileged. Set ALLOW_PRIVILEGED_PORTS=true or use port >= 1024",
                self.metrics_port
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(format!("Invalid log level: {}", other)),
        }

        if self.log_format != "json" && self.log_format != "pretty" {
            return Err(format!("Invalid log format: {}", self.log_format));
        }

        Ok(())
    }
}

/// Parse `METRICS_PORT`, defaulting to 9090 when unset
fn parse_metrics_port(raw: Option<&str>) -> Result<u16, String> {
    match raw {
        None => Ok(9090),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("METRICS_PORT must be a valid port number, got '{}'", value)),
    }
}

/// Parse tags from environment variable string
/// Format: "key1=value1,key2=value2,key3=value3"
fn parse_tags(tags_str: &str) -> Vec<(String, String)> {
    tags_str
        .split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.log_level, "info");
        assert!(config.enable_metrics_export);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.log_level = "warn".to_string();

        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
        config.log_format = "pretty".to_string();

        config.metrics_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tag_parsing() {
        let tags = parse_tags("env=prod, version=1.2.3,broken,=empty");

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], ("env".to_string(), "prod".to_string()));
        assert_eq!(tags[1], ("version".to_string(), "1.2.3".to_string()));
    }

    #[test]
    fn test_privileged_port_requires_opt_in() {
        let mut config = ObservabilityConfig {
            metrics_port: 80,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.allow_privileged_ports = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_metrics_port_parsing() {
        assert_eq!(parse_metrics_port(None), Ok(9090));
        assert_eq!(parse_metrics_port(Some(" 9191 ")), Ok(9191));
        assert!(parse_metrics_port(Some("abc")).is_err());
        assert!(parse_metrics_port(Some("70000")).is_err());
    }

    #[test]
    fn test_pretty_logs_in_development() {
        let config = ObservabilityConfig {
            log_format: "json".to_string(),
            ..Default::default()
        };
        assert!(config.use_pretty_logs());

        let config = ObservabilityConfig {
            environment: "production".to_string(),
            ..config
        };
        assert!(!config.use_pretty_logs());
    }
}
