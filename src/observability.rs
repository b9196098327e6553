//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection and Prometheus export
//! - Liveness and readiness endpoints for monitoring
//! - Spans and metric helpers used by the bot and the lookup client

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize logging, then metrics export when enabled
pub async fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    if config.enable_metrics_export {
        let metrics_handle = init_metrics_with_config(config)?;
        start_metrics_server(metrics_handle, config.metrics_port).await?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        metrics_port = %config.metrics_port,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Initialize structured logging with tracing and configuration
fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("number_lookup_bot={}", config.log_level).parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("teloxide=warn".parse()?);

    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder with the configured global labels
fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<PrometheusHandle> {
    let mut builder = PrometheusBuilder::new();
    for (key, value) in &config.tags {
        builder = builder.add_global_label(key.clone(), value.clone());
    }
    let handle = builder.install_recorder()?;

    tracing::info!(global_labels = config.tags.len(), "Metrics collection initialized");
    Ok(handle)
}

async fn start_metrics_server(metrics_handle: PrometheusHandle, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on {}", addr);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let metrics_handle = metrics_handle.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = hyper::service::service_fn(
                            move |req: hyper::Request<hyper::body::Incoming>| {
                                let metrics_handle = metrics_handle.clone();
                                async move {
                                    Ok::<_, Infallible>(route_metrics_request(
                                        req.method(),
                                        req.uri().path(),
                                        &metrics_handle,
                                    ))
                                }
                            },
                        );

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await
                        {
                            tracing::error!("Error serving connection: {:?}", err);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Error accepting connection: {}", e);
                }
            }
        }
    });

    Ok(())
}

fn route_metrics_request(
    method: &hyper::Method,
    path: &str,
    metrics_handle: &PrometheusHandle,
) -> hyper::Response<String> {
    match (method, path) {
        (&hyper::Method::GET, "/metrics") => {
            let mut response = hyper::Response::new(metrics_handle.render());
            response.headers_mut().insert(
                "content-type",
                hyper::header::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
            );
            response
        }
        // Readiness equals liveness once the dispatcher runs
        (&hyper::Method::GET, "/health/live") | (&hyper::Method::GET, "/health/ready") => {
            hyper::Response::new("OK".to_string())
        }
        _ => {
            let mut response = hyper::Response::new("Not Found".to_string());
            *response.status_mut() = hyper::StatusCode::NOT_FOUND;
            response
        }
    }
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, chat_id: Option<i64>) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        chat_id = chat_id,
        component = "telegram"
    )
}

/// Create a span for upstream lookups
pub fn lookup_span(kind: &str) -> tracing::Span {
    tracing::info_span!("lookup_operation", kind = kind, component = "lookup")
}

/// Record Telegram message processing metrics
pub fn record_telegram_message(message_type: &'static str) {
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}

/// Record handler duration for one inbound update
pub fn record_request_metrics(action: &'static str, success: bool, duration: Duration) {
    metrics::counter!(
        "requests_total",
        "action" => action,
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
    metrics::histogram!("request_duration_seconds", "action" => action).record(duration.as_secs_f64());
}

/// Record the outcome and latency of one upstream lookup
pub fn record_lookup_metrics(kind: &'static str, outcome: &'static str, duration: Duration) {
    metrics::counter!("lookups_total", "kind" => kind, "outcome" => outcome).increment(1);
    metrics::histogram!("lookup_duration_seconds", "kind" => kind).record(duration.as_secs_f64());
}

/// Record a conversation state change
pub fn record_dialogue_transition(from: &'static str, to: &'static str) {
    metrics::counter!("dialogue_transitions_total", "from" => from, "to" => to).increment(1);
}

/// Mask an identifier for logging, keeping only its last four characters
pub fn mask_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
