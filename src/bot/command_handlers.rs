//! Command Handlers module sending the bot's static replies

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use crate::lookup::LookupKind;

use super::ui_builder::{
    create_cancel_keyboard, create_main_keyboard, format_fallback_message, format_help_message,
    format_invalid_input_message, format_prompt_message, format_quick_start_message,
    format_welcome_message,
};
use super::HandlerContext;

/// Handle /start
pub async fn handle_start_command(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    first_name: Option<&str>,
) -> Result<()> {
    let welcome_message = format_welcome_message(ctx.localization, first_name, ctx.language_code);
    ctx.bot
        .send_message(chat_id, welcome_message)
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}

/// Handle /help and the help button
pub async fn handle_help_command(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    ctx.bot
        .send_message(chat_id, format_help_message(ctx.localization, ctx.language_code))
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}

pub async fn handle_quick_start(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    ctx.bot
        .send_message(
            chat_id,
            format_quick_start_message(ctx.localization, ctx.language_code),
        )
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}

/// Ask for a phone or id number and swap in the cancel keyboard
pub async fn handle_lookup_prompt(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    kind: LookupKind,
) -> Result<()> {
    debug!(chat_id = %chat_id, kind = %kind, "Prompting for identifier");
    ctx.bot
        .send_message(
            chat_id,
            format_prompt_message(ctx.localization, kind, ctx.language_code),
        )
        .reply_markup(create_cancel_keyboard())
        .await?;
    Ok(())
}

pub async fn handle_cancel(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    ctx.bot
        .send_message(
            chat_id,
            crate::localization::t_lang(ctx.localization, "operation-cancelled", ctx.language_code),
        )
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}

pub async fn handle_invalid_input(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    kind: LookupKind,
) -> Result<()> {
    ctx.bot
        .send_message(
            chat_id,
            format_invalid_input_message(ctx.localization, kind, ctx.language_code),
        )
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}

/// Generic reminder for anything the bot does not understand
pub async fn handle_fallback(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    ctx.bot
        .send_message(chat_id, format_fallback_message(ctx.localization, ctx.language_code))
        .reply_markup(create_main_keyboard())
        .await?;
    Ok(())
}
