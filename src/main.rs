use anyhow::Result;
use number_lookup_bot::bot::{self, BotServices};
use number_lookup_bot::config::AppConfig;
use number_lookup_bot::errors::error_logging;
use number_lookup_bot::localization;
use number_lookup_bot::lookup::LookupClient;
use number_lookup_bot::observability;
use number_lookup_bot::observability_config::ObservabilityConfig;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;

/// Load and validate configuration, logging the failure before aborting
fn load_configuration(observability_config: ObservabilityConfig) -> Result<AppConfig> {
    let config = AppConfig::from_env(observability_config).map_err(|e| {
        error_logging::log_config_error(&e, "environment", "load_configuration");
        anyhow::anyhow!(e)
    })?;

    config.validate().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "validate_configuration");
        anyhow::anyhow!(e)
    })?;

    info!("{}", config.summary());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    // Logging comes up before anything else so configuration errors are recorded.
    // The metrics port is validated before it is bound.
    let observability_config = ObservabilityConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;
    observability::init_observability(&observability_config).await?;

    info!("Starting number lookup Telegram bot");

    let config = load_configuration(observability_config)?;

    let localization_manager = localization::create_localization_manager()?;
    let lookup_client = LookupClient::new(config.lookup.clone())?;
    let services = Arc::new(BotServices::new(lookup_client, localization_manager));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    info!(
        http_timeout_secs = config.bot.http_timeout_secs,
        lookup_timeout_secs = config.lookup.timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let services = Arc::clone(&services);
        move |bot: Bot, msg: Message| {
            let services = Arc::clone(&services);
            async move { bot::message_handler(bot, msg, services).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
