//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `router`: Pure routing from (dialogue state, inbound message) to an action
//! - `dialogue_manager`: Conversation controller owning per-chat state
//! - `message_handler`: Entry point for Telegram messages
//! - `command_handlers`: Static replies (welcome, help, prompts, cancel)
//! - `lookup_handler`: Upstream lookups and their result messages
//! - `ui_builder`: Creates keyboards and formats messages

pub mod command_handlers;
pub mod dialogue_manager;
pub mod lookup_handler;
pub mod message_handler;
pub mod router;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::Bot;

use crate::localization::LocalizationManager;
use crate::lookup::LookupClient;

/// Common context for bot handlers containing shared dependencies
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub localization: &'a Arc<LocalizationManager>,
    pub language_code: Option<&'a str>,
}

/// Process-wide services shared by every update
#[derive(Debug)]
pub struct BotServices {
    pub controller: dialogue_manager::ConversationController,
    pub lookup_client: LookupClient,
    pub localization: Arc<LocalizationManager>,
}

impl BotServices {
    pub fn new(lookup_client: LookupClient, localization: Arc<LocalizationManager>) -> Self {
        Self {
            controller: dialogue_manager::ConversationController::new(),
            lookup_client,
            localization,
        }
    }
}

// Re-export main handler functions for use in main.rs
pub use dialogue_manager::ConversationController;
pub use message_handler::message_handler;
pub use router::{route, BotAction, BotCommand, InboundMessage, MenuButton, Transition};
