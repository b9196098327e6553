//! # UI Builder Tests
//!
//! Keyboards, localized replies and payload rendering.

use anyhow::Result;
use number_lookup_bot::bot::router::MenuButton;
use number_lookup_bot::bot::ui_builder::{
    create_cancel_keyboard, create_main_keyboard, format_failure_status, format_fallback_message,
    format_help_message, format_invalid_input_message, format_json_payload,
    format_payload_message, format_prompt_message, format_quick_start_message,
    format_delivery_failure_message, format_searching_message, format_welcome_message,
    MAX_MESSAGE_UTF16_UNITS, MAX_PAYLOAD_UTF16_UNITS,
};
use number_lookup_bot::errors::LookupError;
use number_lookup_bot::localization::create_localization_manager;
use number_lookup_bot::lookup::{LookupKind, LookupRequest};
use serde_json::{json, Value};
use teloxide::types::KeyboardMarkup;

fn labels(keyboard: &KeyboardMarkup) -> Vec<Vec<String>> {
    keyboard
        .keyboard
        .iter()
        .map(|row| row.iter().map(|button| button.text.clone()).collect())
        .collect()
}

#[test]
fn test_main_keyboard_layout() {
    let keyboard = create_main_keyboard();

    assert_eq!(
        labels(&keyboard),
        vec![
            vec!["📱 Phone Lookup".to_string(), "🆔 Aadhaar/ID Lookup".to_string()],
            vec!["ℹ️ Help".to_string(), "🚀 Quick Start".to_string()],
        ]
    );
}

#[test]
fn test_cancel_keyboard_has_single_button() {
    let keyboard = create_cancel_keyboard();
    assert_eq!(labels(&keyboard), vec![vec![MenuButton::Cancel.label().to_string()]]);
}

#[test]
fn test_welcome_message_uses_first_name() -> Result<()> {
    let localization = create_localization_manager()?;

    let message = format_welcome_message(&localization, Some("Priya"), None);
    assert!(message.starts_with("👋 Welcome, Priya!"));
    assert!(message.contains("/phone"));
    assert!(message.contains("/aadhaar"));

    let anonymous = format_welcome_message(&localization, None, None);
    assert!(anonymous.starts_with("👋 Welcome, friend!"));
    Ok(())
}

#[test]
fn test_help_and_quick_start_messages() -> Result<()> {
    let localization = create_localization_manager()?;

    let help = format_help_message(&localization, Some("en-US"));
    assert!(help.contains("📘 Help Guide"));
    assert!(help.contains("10-digit mobile number"));
    assert!(help.contains("/cancel"));

    let quick_start = format_quick_start_message(&localization, None);
    assert!(quick_start.contains("send 9876543210"));
    assert!(quick_start.contains("send 123456789012"));
    Ok(())
}

#[test]
fn test_prompt_and_invalid_input_messages() -> Result<()> {
    let localization = create_localization_manager()?;

    let phone = format_prompt_message(&localization, LookupKind::Phone, None);
    assert!(phone.contains("Enter a 10-digit mobile number"));
    assert!(phone.contains("/cancel"));

    let id = format_prompt_message(&localization, LookupKind::Id, None);
    assert!(id.contains("Enter a 12-digit Aadhaar/ID number"));

    assert!(format_invalid_input_message(&localization, LookupKind::Phone, None)
        .starts_with("❌ Invalid phone number"));
    assert!(format_invalid_input_message(&localization, LookupKind::Id, None)
        .starts_with("❌ Invalid Aadhaar/ID number"));
    Ok(())
}

#[test]
fn test_fallback_lists_accepted_formats() -> Result<()> {
    let localization = create_localization_manager()?;
    let message = format_fallback_message(&localization, None);

    assert!(message.starts_with("Please send:"));
    assert!(message.contains("9876543210"));
    assert!(message.contains("123456789012"));
    Ok(())
}

#[test]
fn test_searching_message_includes_identifier() -> Result<()> {
    let localization = create_localization_manager()?;
    let request = LookupRequest::id("123456789012")?;

    assert_eq!(
        format_searching_message(&localization, &request, None),
        "🔍 Searching Aadhaar/ID: 123456789012..."
    );
    Ok(())
}

#[test]
fn test_failure_status_per_kind() -> Result<()> {
    let localization = create_localization_manager()?;
    let status = LookupError::HttpStatus { code: 404 };
    let network = LookupError::Network {
        message: "request timed out".to_string(),
    };

    assert_eq!(
        format_failure_status(&localization, LookupKind::Phone, &status, None),
        "❌ API Error - Status: 404"
    );
    assert_eq!(
        format_failure_status(&localization, LookupKind::Phone, &network, None),
        "❌ Error - request timed out"
    );

    for error in [status, network] {
        assert_eq!(
            format_failure_status(&localization, LookupKind::Id, &error, None),
            "❌ Aadhaar/ID API Error - Please try again later"
        );
    }
    Ok(())
}

#[test]
fn test_small_payload_is_pretty_printed_whole() {
    let payload = json!({"name": "Ravi", "circle": "Mumbai"});
    let rendered = format_json_payload(&payload);

    assert_eq!(rendered, serde_json::to_string_pretty(&payload).unwrap());
    assert!(!rendered.contains("(truncated)"));
}

const MARKER: &str = "\n... (truncated)";

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[test]
fn test_large_payload_is_truncated() {
    let payload = Value::String("x".repeat(MAX_PAYLOAD_UTF16_UNITS * 2));
    let rendered = format_json_payload(&payload);

    assert!(rendered.ends_with(MARKER));
    let kept = utf16_len(&rendered) - utf16_len(MARKER);
    assert!(kept <= MAX_PAYLOAD_UTF16_UNITS);
    assert!(kept > MAX_PAYLOAD_UTF16_UNITS - 10);
}

#[test]
fn test_truncation_respects_multibyte_characters() {
    let payload = Value::String("नमस्ते".repeat(MAX_PAYLOAD_UTF16_UNITS));
    let rendered = format_json_payload(&payload);

    assert!(rendered.ends_with("(truncated)"));
    assert!(rendered.starts_with("\"नमस्ते"));
}

#[test]
fn test_astral_characters_fit_one_telegram_message() {
    // Each emoji is two UTF-16 code units
    let payload = json!({"name": "😀".repeat(4000)});
    let message = format_payload_message(&payload);

    assert!(message.contains("(truncated)"));
    assert!(utf16_len(&message) <= MAX_MESSAGE_UTF16_UNITS);
}

#[test]
fn test_html_escaping_counts_against_the_limit() {
    let payload = json!({"note": "&<>".repeat(3000)});
    let message = format_payload_message(&payload);

    assert!(message.contains("&amp;&lt;&gt;"));
    assert!(utf16_len(&message) <= MAX_MESSAGE_UTF16_UNITS);
}

#[test]
fn test_delivery_failure_message() -> Result<()> {
    let localization = create_localization_manager()?;
    assert_eq!(
        format_delivery_failure_message(&localization, None),
        "❌ The result could not be displayed. Please try again later"
    );
    Ok(())
}

#[test]
fn test_payload_message_escapes_html() {
    let payload = json!({"note": "<b>bold</b> & more"});
    let message = format_payload_message(&payload);

    assert!(message.starts_with("<pre>"));
    assert!(message.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(message.contains("&amp; more"));
    assert!(!message.contains("<b>"));
}
