//! # Number Lookup Telegram Bot
//!
//! A Telegram bot that accepts a mobile phone number or a 12-digit ID
//! number, validates its format, queries the matching upstream lookup
//! service and relays the JSON answer back to the chat.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod lookup;
pub mod observability;
pub mod observability_config;
pub mod validation;

// Re-export types for easier access
pub use lookup::{LookupClient, LookupKind, LookupRequest};
pub use validation::{is_id_number, is_phone_number};
