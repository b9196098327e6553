//! Lookup Handler module running upstream lookups on behalf of a chat

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::errors::error_logging;
use crate::localization::LocalizationManager;
use crate::lookup::{LookupClient, LookupRequest};

use super::ui_builder::{
    create_main_keyboard, format_delivery_failure_message, format_failure_status,
    format_payload_message, format_searching_message, format_success_status,
};
use super::HandlerContext;

/// Messages produced by one finished lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupReport {
    /// Short success or failure line
    pub status_line: String,
    /// HTML code block with the JSON payload, present only on success
    pub payload: Option<String>,
}

impl LookupReport {
    pub fn is_success(&self) -> bool {
        self.payload.is_some()
    }
}

/// Perform the upstream call and turn its outcome into chat messages
pub async fn run_lookup(
    client: &LookupClient,
    request: &LookupRequest,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> LookupReport {
    match client.lookup(request).await {
        Ok(payload) => LookupReport {
            status_line: format_success_status(localization, request, language_code),
            payload: Some(format_payload_message(&payload)),
        },
        Err(e) => LookupReport {
            status_line: format_failure_status(localization, request.kind(), &e, language_code),
            payload: None,
        },
    }
}

/// Send the searching notice, run the lookup and deliver its report.
///
/// The searching notice restores the main keyboard, so a chat coming from
/// a prompt gets its menu back whatever the outcome.
pub async fn handle_lookup(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    client: &LookupClient,
    request: &LookupRequest,
) -> Result<()> {
    ctx.bot
        .send_message(
            chat_id,
            format_searching_message(ctx.localization, request, ctx.language_code),
        )
        .reply_markup(create_main_keyboard())
        .await?;

    let report = run_lookup(client, request, ctx.localization, ctx.language_code).await;

    ctx.bot.send_message(chat_id, report.status_line).await?;

    if let Some(payload) = report.payload {
        let sent = ctx
            .bot
            .send_message(chat_id, payload)
            .parse_mode(ParseMode::Html)
            .await;

        if let Err(e) = sent {
            error_logging::log_internal_error(&e, "lookup_handler", "send_payload", Some(chat_id.0));
            ctx.bot
                .send_message(
                    chat_id,
                    format_delivery_failure_message(ctx.localization, ctx.language_code),
                )
                .await?;
        }
    }

    Ok(())
}
