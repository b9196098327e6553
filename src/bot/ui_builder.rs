//! UI Builder module for creating keyboards and formatting messages

use serde_json::Value;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html;

use crate::errors::LookupError;
use crate::localization::{t_args_lang, t_lang, LocalizationManager};
use crate::lookup::{LookupKind, LookupRequest};

use super::router::MenuButton;

/// Telegram's message length limit, counted in UTF-16 code units
pub const MAX_MESSAGE_UTF16_UNITS: usize = 4096;

/// Budget for the pretty-printed payload, in UTF-16 code units of its
/// HTML-escaped form. Leaves room for the code block tags and the marker.
pub const MAX_PAYLOAD_UTF16_UNITS: usize = 3000;

const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Persistent keyboard with the four main options
pub fn create_main_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(MenuButton::PhoneLookup.label()),
            KeyboardButton::new(MenuButton::IdLookup.label()),
        ],
        vec![
            KeyboardButton::new(MenuButton::Help.label()),
            KeyboardButton::new(MenuButton::QuickStart.label()),
        ],
    ])
    .resize_keyboard()
}

/// Single-button keyboard shown while waiting for an identifier
pub fn create_cancel_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(MenuButton::Cancel.label())]])
        .resize_keyboard()
}

fn command_list(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    [
        t_lang(localization, "commands-title", language_code),
        t_lang(localization, "command-phone", language_code),
        t_lang(localization, "command-id", language_code),
        t_lang(localization, "command-help", language_code),
        t_lang(localization, "command-cancel", language_code),
    ]
    .join("\n")
}

fn accepted_formats(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    format!(
        "{}\n{}",
        t_lang(localization, "format-phone", language_code),
        t_lang(localization, "format-id", language_code)
    )
}

pub fn format_welcome_message(
    localization: &LocalizationManager,
    first_name: Option<&str>,
    language_code: Option<&str>,
) -> String {
    let name = first_name.filter(|n| !n.trim().is_empty()).unwrap_or("friend");
    format!(
        "{}\n\n{}\n\n{}\n{}\n\n{}",
        t_args_lang(localization, "welcome-title", &[("name", name)], language_code),
        t_lang(localization, "welcome-description", language_code),
        t_lang(localization, "welcome-usage", language_code),
        accepted_formats(localization, language_code),
        command_list(localization, language_code)
    )
}

pub fn format_help_message(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        t_lang(localization, "help-title", language_code),
        accepted_formats(localization, language_code),
        command_list(localization, language_code),
        t_lang(localization, "help-buttons", language_code)
    )
}

pub fn format_quick_start_message(
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    format!(
        "{}\n\n{}\n{}\n\n{}",
        t_lang(localization, "quick-start-title", language_code),
        t_lang(localization, "quick-start-phone", language_code),
        t_lang(localization, "quick-start-id", language_code),
        t_lang(localization, "help-buttons", language_code)
    )
}

pub fn format_prompt_message(
    localization: &LocalizationManager,
    kind: LookupKind,
    language_code: Option<&str>,
) -> String {
    let (prompt, example) = match kind {
        LookupKind::Phone => ("prompt-phone", "prompt-phone-example"),
        LookupKind::Id => ("prompt-id", "prompt-id-example"),
    };
    format!(
        "{}\n{}\n\n{}",
        t_lang(localization, prompt, language_code),
        t_lang(localization, example, language_code),
        t_lang(localization, "prompt-cancel-hint", language_code)
    )
}

pub fn format_invalid_input_message(
    localization: &LocalizationManager,
    kind: LookupKind,
    language_code: Option<&str>,
) -> String {
    let key = match kind {
        LookupKind::Phone => "invalid-phone",
        LookupKind::Id => "invalid-id",
    };
    t_lang(localization, key, language_code)
}

pub fn format_fallback_message(
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    format!(
        "{}\n{}\n\n{}",
        t_lang(localization, "fallback-reminder", language_code),
        accepted_formats(localization, language_code),
        t_lang(localization, "help-buttons", language_code)
    )
}

/// Intermediate notice sent before the upstream call
pub fn format_searching_message(
    localization: &LocalizationManager,
    request: &LookupRequest,
    language_code: Option<&str>,
) -> String {
    let key = match request.kind() {
        LookupKind::Phone => "searching-phone",
        LookupKind::Id => "searching-id",
    };
    t_args_lang(
        localization,
        key,
        &[("identifier", request.identifier())],
        language_code,
    )
}

pub fn format_success_status(
    localization: &LocalizationManager,
    request: &LookupRequest,
    language_code: Option<&str>,
) -> String {
    let key = match request.kind() {
        LookupKind::Phone => "lookup-success-phone",
        LookupKind::Id => "lookup-success-id",
    };
    t_args_lang(
        localization,
        key,
        &[("identifier", request.identifier())],
        language_code,
    )
}

/// One-line failure notice. Only paths that expose error details mention
/// the status code or the transport error.
pub fn format_failure_status(
    localization: &LocalizationManager,
    kind: LookupKind,
    error: &LookupError,
    language_code: Option<&str>,
) -> String {
    if !kind.exposes_error_detail() {
        return t_lang(localization, "lookup-error-id-unavailable", language_code);
    }

    match error {
        LookupError::HttpStatus { code } => t_args_lang(
            localization,
            "lookup-error-status",
            &[("code", &code.to_string())],
            language_code,
        ),
        other => t_args_lang(
            localization,
            "lookup-error-detail",
            &[("detail", &other.user_detail())],
            language_code,
        ),
    }
}

/// UTF-16 length of `c` once HTML-escaped
fn escaped_utf16_len(c: char) -> usize {
    match c {
        '&' => "&amp;".len(),
        '<' | '>' => "&lt;".len(),
        '"' => "&quot;".len(),
        _ => c.len_utf16(),
    }
}

/// Pretty-print a payload, cutting it once its escaped form would exceed
/// `MAX_PAYLOAD_UTF16_UNITS`
pub fn format_json_payload(payload: &Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());

    let mut used = 0;
    for (index, c) in pretty.char_indices() {
        used += escaped_utf16_len(c);
        if used > MAX_PAYLOAD_UTF16_UNITS {
            return format!("{}{}", &pretty[..index], TRUNCATION_MARKER);
        }
    }
    pretty
}

/// Payload rendered as an HTML code block, to be sent with `ParseMode::Html`
pub fn format_payload_message(payload: &Value) -> String {
    html::code_block_with_lang(&format_json_payload(payload), "json")
}

/// Sent when the payload message itself was rejected by Telegram
pub fn format_delivery_failure_message(
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    t_lang(localization, "lookup-error-delivery", language_code)
}
