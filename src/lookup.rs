//! # Lookup Client
//!
//! Issues single HTTP GET calls to the two upstream lookup services and
//! returns the parsed JSON document. There is no retry and no caching;
//! a `LookupClient` holds only read-only configuration and a pooled
//! `reqwest::Client`, so it can be shared freely between chats.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, Instrument};

use crate::config::LookupConfig;
use crate::errors::{error_logging, AppError, AppResult, LookupError};
use crate::observability::{self, mask_identifier};
use crate::validation::is_valid_for;

const USER_AGENT: &str = concat!("number-lookup-bot/", env!("CARGO_PKG_VERSION"));

/// Which upstream service a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    Phone,
    Id,
}

impl LookupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKind::Phone => "phone",
            LookupKind::Id => "id",
        }
    }

    /// Whether failures on this path are reported to the user with their details.
    ///
    /// The phone path shows status codes and transport errors verbatim, the id
    /// path only ever shows a generic "service unavailable" notice.
    pub fn exposes_error_detail(self) -> bool {
        matches!(self, LookupKind::Phone)
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated identifier paired with the service it should be sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    kind: LookupKind,
    identifier: String,
}

impl LookupRequest {
    /// Build a request, rejecting identifiers that do not match `kind`'s format
    pub fn new(kind: LookupKind, identifier: &str) -> AppResult<Self> {
        if !is_valid_for(kind, identifier) {
            return Err(AppError::Validation(format!(
                "malformed {} identifier",
                kind
            )));
        }

        Ok(Self {
            kind,
            identifier: identifier.to_string(),
        })
    }

    pub fn phone(number: &str) -> AppResult<Self> {
        Self::new(LookupKind::Phone, number)
    }

    pub fn id(number: &str) -> AppResult<Self> {
        Self::new(LookupKind::Id, number)
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// HTTP client for the phone and id lookup services
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    config: LookupConfig,
}

impl LookupClient {
    /// Create a client whose every request is bounded by `config.timeout_secs`
    pub fn new(config: LookupConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Phone lookups append the number directly to the configured base URL
    pub fn phone_url(&self, number: &str) -> String {
        format!("{}{}", self.config.phone_endpoint, number)
    }

    /// Id lookups send the number and access key as query parameters
    pub fn id_url(&self, number: &str) -> Result<Url, LookupError> {
        Url::parse_with_params(
            &self.config.id_endpoint,
            &[
                (self.config.id_query_param.as_str(), number),
                ("key", self.config.id_access_key.as_str()),
            ],
        )
        .map_err(|e| LookupError::Network {
            message: format!("invalid id lookup URL: {}", e),
        })
    }

    /// Run the lookup described by `request`, recording metrics for the call
    pub async fn lookup(&self, request: &LookupRequest) -> Result<Value, LookupError> {
        let kind = request.kind();
        let span = observability::lookup_span(kind.as_str());

        async {
            let start = Instant::now();
            info!(
                kind = %kind,
                identifier = %mask_identifier(request.identifier()),
                "Starting upstream lookup"
            );

            let result = match kind {
                LookupKind::Phone => self.lookup_phone(request.identifier()).await,
                LookupKind::Id => self.lookup_id(request.identifier()).await,
            };

            let duration = start.elapsed();
            match &result {
                Ok(_) => {
                    info!(kind = %kind, duration_ms = duration.as_millis() as u64, "Upstream lookup succeeded");
                    observability::record_lookup_metrics(kind.as_str(), "success", duration);
                }
                Err(e) => {
                    error_logging::log_network_error(e, "lookup", Some(kind.as_str()), None);
                    observability::record_lookup_metrics(kind.as_str(), e.kind(), duration);
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Query the phone service. Only HTTP 200 counts as success.
    pub async fn lookup_phone(&self, number: &str) -> Result<Value, LookupError> {
        let url = self.phone_url(number);
        debug!("Calling phone lookup endpoint");

        let response = self
            .http
            .get(url.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(network_error)?;

        if response.status() != StatusCode::OK {
            return Err(LookupError::HttpStatus {
                code: response.status().as_u16(),
            });
        }

        parse_json_body(response).await
    }

    /// Query the id service. Any 2xx status counts as success; the body of
    /// a non-2xx answer is never read.
    pub async fn lookup_id(&self, number: &str) -> Result<Value, LookupError> {
        let url = self.id_url(number)?;
        debug!("Calling id lookup endpoint");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(LookupError::HttpStatus {
                code: response.status().as_u16(),
            });
        }

        parse_json_body(response).await
    }
}

/// Strip the URL from transport errors; id URLs carry the access key.
fn network_error(err: reqwest::Error) -> LookupError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.without_url().to_string()
    };
    LookupError::Network { message }
}

async fn parse_json_body(response: reqwest::Response) -> Result<Value, LookupError> {
    let body = response.text().await.map_err(network_error)?;
    serde_json::from_str(&body).map_err(|e| LookupError::Parse {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LookupClient {
        LookupClient::new(LookupConfig {
            phone_endpoint: "https://phone.example.com/?mobile=".to_string(),
            id_endpoint: "https://id.example.com/fetch".to_string(),
            id_access_key: "secret key".to_string(),
            ..LookupConfig::default()
        })
        .expect("client builds")
    }

    #[test]
    fn test_request_requires_matching_format() {
        assert!(LookupRequest::phone("9876543210").is_ok());
        assert!(LookupRequest::phone("123456789012").is_err());
        assert!(LookupRequest::id("123456789012").is_ok());
        assert!(matches!(
            LookupRequest::id("12345"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_request_accessors() {
        let request = LookupRequest::id("123456789012").expect("valid id");
        assert_eq!(request.kind(), LookupKind::Id);
        assert_eq!(request.identifier(), "123456789012");
    }

    #[test]
    fn test_phone_url_appends_number() {
        assert_eq!(
            client().phone_url("9876543210"),
            "https://phone.example.com/?mobile=9876543210"
        );
    }

    #[test]
    fn test_id_url_encodes_query_parameters() {
        let url = client().id_url("123456789012").expect("valid url");
        assert_eq!(url.path(), "/fetch");
        assert_eq!(url.query(), Some("id=123456789012&key=secret+key"));
    }

    #[test]
    fn test_error_detail_policy() {
        assert!(LookupKind::Phone.exposes_error_detail());
        assert!(!LookupKind::Id.exposes_error_detail());
    }
}
