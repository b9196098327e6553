//! # Unified Application Configuration
//!
//! This module consolidates all application settings into a single,
//! structured configuration object loaded from environment variables.
//! Secrets (bot token, lookup access key) have no defaults and must be
//! supplied by the deployment.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Bot-specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Telegram API client timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        // Telegram bot tokens look like `<numeric bot id>:<secret>`
        let Some((bot_id, secret)) = self.token.split_once(':') else {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        };

        if secret.contains(':') {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if bot_id.parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if secret.len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Upstream lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Phone endpoint base URL; the number is appended verbatim
    pub phone_endpoint: String,
    /// Id endpoint URL; the number and access key are sent as query parameters
    pub id_endpoint: String,
    /// Static access key for the id endpoint
    pub id_access_key: String,
    /// Query parameter name carrying the id number
    pub id_query_param: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            phone_endpoint: String::new(),
            id_endpoint: String::new(),
            id_access_key: String::new(),
            id_query_param: "id".to_string(),
            timeout_secs: 10,
        }
    }
}

impl LookupConfig {
    /// Validate lookup configuration
    pub fn validate(&self) -> AppResult<()> {
        for (name, url) in [
            ("Phone lookup URL", &self.phone_endpoint),
            ("Id lookup URL", &self.id_endpoint),
        ] {
            if url.trim().is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", name)));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "{} must start with 'http://' or 'https://'",
                    name
                )));
            }
        }

        if reqwest::Url::parse(&self.id_endpoint).is_err() {
            return Err(AppError::Config("Id lookup URL is not a valid URL".to_string()));
        }

        if self.id_access_key.trim().is_empty() {
            return Err(AppError::Config(
                "Id lookup access key cannot be empty".to_string(),
            ));
        }

        if self.id_query_param.trim().is_empty() {
            return Err(AppError::Config(
                "Id lookup query parameter name cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config("Lookup timeout cannot be 0".to_string()));
        }

        if self.timeout_secs > 120 {
            return Err(AppError::Config(
                "Lookup timeout cannot be greater than 120 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Bot configuration
    pub bot: BotConfig,
    /// Upstream lookup configuration
    pub lookup: LookupConfig,
    /// Observability configuration, including the metrics server port
    pub observability: ObservabilityConfig,
}

/// Read a required variable, treating blank values as missing
fn required_var(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Config(format!(
            "{} environment variable is required",
            key
        ))),
    }
}

/// Read an optional numeric variable with a default
fn parsed_var<T: std::str::FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a valid number", key)))
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// The observability section is loaded first by the caller, since logging
    /// must be up before the rest of the configuration can be reported on.
    pub fn from_env(observability: ObservabilityConfig) -> AppResult<Self> {
        let mut config = Self {
            observability,
            ..Self::default()
        };

        // Load bot configuration
        config.bot.token = required_var("TELEGRAM_BOT_TOKEN")?;
        config.bot.http_timeout_secs = parsed_var("HTTP_CLIENT_TIMEOUT_SECS", "30")?;

        // Load lookup configuration
        config.lookup.phone_endpoint = required_var("PHONE_LOOKUP_URL")?;
        config.lookup.id_endpoint = required_var("ID_LOOKUP_URL")?;
        config.lookup.id_access_key = required_var("ID_LOOKUP_ACCESS_KEY")?;
        config.lookup.id_query_param =
            env::var("ID_LOOKUP_QUERY_PARAM").unwrap_or_else(|_| "id".to_string());
        config.lookup.timeout_secs = parsed_var("LOOKUP_TIMEOUT_SECS", "10")?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.lookup.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], phone_endpoint={}, id_endpoint={}, id_access_key=[REDACTED], lookup_timeout_secs={}, metrics_port={}, environment={}",
            self.lookup.phone_endpoint,
            self.lookup.id_endpoint,
            self.lookup.timeout_secs,
            self.observability.metrics_port,
            self.observability.environment
        )
    }
}
