//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use teloxide::prelude::*;
use tracing::{debug, Instrument};

use crate::errors::error_logging;
use crate::observability;

use super::command_handlers::{
    handle_cancel, handle_fallback, handle_help_command, handle_invalid_input,
    handle_lookup_prompt, handle_quick_start, handle_start_command,
};
use super::lookup_handler::handle_lookup;
use super::router::{BotAction, InboundMessage};
use super::{BotServices, HandlerContext};

/// Convert a Telegram message into the transport-independent inbound form
pub fn inbound_from_message(msg: &Message) -> InboundMessage {
    match msg.text() {
        Some(text) => InboundMessage::from_text(msg.chat.id.0, text),
        None => InboundMessage::non_text(msg.chat.id.0),
    }
}

/// Perform one routed action against the Telegram API
async fn execute_action(
    ctx: &HandlerContext<'_>,
    msg: &Message,
    action: &BotAction,
    services: &BotServices,
) -> Result<()> {
    let chat_id = msg.chat.id;

    match action {
        BotAction::Welcome => {
            let first_name = msg.from.as_ref().map(|user| user.first_name.as_str());
            handle_start_command(ctx, chat_id, first_name).await
        }
        BotAction::Help => handle_help_command(ctx, chat_id).await,
        BotAction::QuickStart => handle_quick_start(ctx, chat_id).await,
        BotAction::Prompt(kind) => handle_lookup_prompt(ctx, chat_id, *kind).await,
        BotAction::Cancelled => handle_cancel(ctx, chat_id).await,
        BotAction::Lookup(request) => {
            handle_lookup(ctx, chat_id, &services.lookup_client, request).await
        }
        BotAction::InvalidInput(kind) => {
            error_logging::log_validation_error(
                &"identifier does not match the expected format",
                "awaiting_input",
                Some(chat_id.0),
                kind.as_str(),
                msg.text().map(str::trim),
            );
            handle_invalid_input(ctx, chat_id, *kind).await
        }
        BotAction::Fallback => handle_fallback(ctx, chat_id).await,
    }
}

pub async fn message_handler(bot: Bot, msg: Message, services: Arc<BotServices>) -> Result<()> {
    let span = observability::telegram_span("message_handler", Some(msg.chat.id.0));

    async {
        let start_time = Instant::now();
        let message_type = if msg.text().is_some() { "text" } else { "unsupported" };
        observability::record_telegram_message(message_type);

        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref());

        let inbound = inbound_from_message(&msg);
        let action = match services.controller.handle(&inbound).await {
            Ok(action) => action,
            Err(e) => {
                error_logging::log_internal_error(&e, "dialogue_manager", "handle", Some(msg.chat.id.0));
                return Err(e);
            }
        };
        debug!(chat_id = %msg.chat.id, action = action.name(), "Routed inbound message");

        let ctx = HandlerContext {
            bot: &bot,
            localization: &services.localization,
            language_code,
        };

        let result = execute_action(&ctx, &msg, &action, &services).await;
        if let Err(e) = &result {
            error_logging::log_internal_error(e, "message_handler", action.name(), Some(msg.chat.id.0));
        }

        observability::record_request_metrics(action.name(), result.is_ok(), start_time.elapsed());
        result
    }
    .instrument(span)
    .await
}
