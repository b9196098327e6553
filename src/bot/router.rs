//! Router module mapping inbound messages to bot actions
//!
//! Routing is a pure function of the chat's current dialogue state and the
//! inbound message. Priority, highest first:
//! 1. slash commands
//! 2. exact menu button labels
//! 3. a pending prompt (awaiting phone or id input)
//! 4. opportunistic detection of a phone or id number
//! 5. the generic help reminder

use crate::dialogue::LookupDialogueState;
use crate::lookup::{LookupKind, LookupRequest};
use crate::validation::classify_identifier;

/// Transport-independent view of an incoming chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// Raw message text, `None` for photos, stickers and other non-text updates
    pub text: Option<String>,
    /// Lowercased command name without the leading slash or `@botname` suffix
    pub command: Option<String>,
}

impl InboundMessage {
    /// Build a message from raw text, extracting the command name if present
    pub fn from_text(chat_id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        let command = parse_command_name(&text);
        Self {
            chat_id,
            text: Some(text),
            command,
        }
    }

    /// A message without any text
    pub fn non_text(chat_id: i64) -> Self {
        Self {
            chat_id,
            text: None,
            command: None,
        }
    }
}

/// `/phone@LookupBot 123` -> `phone`
fn parse_command_name(text: &str) -> Option<String> {
    let token = text.trim_start().split_whitespace().next()?;
    let name = token.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or_default();
    Some(name.to_lowercase())
}

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Phone,
    Id,
    Cancel,
}

impl BotCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            "phone" => Some(BotCommand::Phone),
            "aadhaar" | "id" => Some(BotCommand::Id),
            "cancel" => Some(BotCommand::Cancel),
            _ => None,
        }
    }
}

/// Reply keyboard buttons; their labels are matched verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    PhoneLookup,
    IdLookup,
    Help,
    QuickStart,
    Cancel,
}

impl MenuButton {
    pub const ALL: [MenuButton; 5] = [
        MenuButton::PhoneLookup,
        MenuButton::IdLookup,
        MenuButton::Help,
        MenuButton::QuickStart,
        MenuButton::Cancel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuButton::PhoneLookup => "📱 Phone Lookup",
            MenuButton::IdLookup => "🆔 Aadhaar/ID Lookup",
            MenuButton::Help => "ℹ️ Help",
            MenuButton::QuickStart => "🚀 Quick Start",
            MenuButton::Cancel => "❌ Cancel",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.label() == text)
    }
}

/// What the bot should do in response to one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Welcome,
    Help,
    QuickStart,
    /// Ask for an identifier and show the cancel keyboard
    Prompt(LookupKind),
    Cancelled,
    Lookup(LookupRequest),
    /// Input given after a prompt did not match the expected format
    InvalidInput(LookupKind),
    /// Generic reminder of what the bot accepts
    Fallback,
}

impl BotAction {
    /// Label used for metrics and logs
    pub fn name(&self) -> &'static str {
        match self {
            BotAction::Welcome => "welcome",
            BotAction::Help => "help",
            BotAction::QuickStart => "quick_start",
            BotAction::Prompt(_) => "prompt",
            BotAction::Cancelled => "cancel",
            BotAction::Lookup(_) => "lookup",
            BotAction::InvalidInput(_) => "invalid_input",
            BotAction::Fallback => "fallback",
        }
    }
}

/// Result of routing: the action to perform and the chat's next state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub action: BotAction,
    pub next_state: LookupDialogueState,
}

impl Transition {
    fn idle(action: BotAction) -> Self {
        Self {
            action,
            next_state: LookupDialogueState::Idle,
        }
    }

    fn prompt(kind: LookupKind) -> Self {
        Self {
            action: BotAction::Prompt(kind),
            next_state: LookupDialogueState::awaiting(kind),
        }
    }
}

/// Decide the action and next state for `message` given the chat's `state`
pub fn route(state: LookupDialogueState, message: &InboundMessage) -> Transition {
    if let Some(name) = message.command.as_deref() {
        return route_command(BotCommand::from_name(name));
    }

    // Non-text updates leave a pending prompt in place
    let Some(text) = message.text.as_deref() else {
        return Transition {
            action: BotAction::Fallback,
            next_state: state,
        };
    };
    let text = text.trim();

    if let Some(button) = MenuButton::from_label(text) {
        return route_button(button);
    }

    if let Some(kind) = state.awaited_kind() {
        if text.eq_ignore_ascii_case("cancel") {
            return Transition::idle(BotAction::Cancelled);
        }
        return match LookupRequest::new(kind, text) {
            Ok(request) => Transition::idle(BotAction::Lookup(request)),
            Err(_) => Transition::idle(BotAction::InvalidInput(kind)),
        };
    }

    match classify_identifier(text).and_then(|kind| LookupRequest::new(kind, text).ok()) {
        Some(request) => Transition::idle(BotAction::Lookup(request)),
        None => Transition::idle(BotAction::Fallback),
    }
}

fn route_command(command: Option<BotCommand>) -> Transition {
    match command {
        Some(BotCommand::Start) => Transition::idle(BotAction::Welcome),
        Some(BotCommand::Help) => Transition::idle(BotAction::Help),
        Some(BotCommand::Phone) => Transition::prompt(LookupKind::Phone),
        Some(BotCommand::Id) => Transition::prompt(LookupKind::Id),
        Some(BotCommand::Cancel) => Transition::idle(BotAction::Cancelled),
        None => Transition::idle(BotAction::Fallback),
    }
}

fn route_button(button: MenuButton) -> Transition {
    match button {
        MenuButton::PhoneLookup => Transition::prompt(LookupKind::Phone),
        MenuButton::IdLookup => Transition::prompt(LookupKind::Id),
        MenuButton::Help => Transition::idle(BotAction::Help),
        MenuButton::QuickStart => Transition::idle(BotAction::QuickStart),
        MenuButton::Cancel => Transition::idle(BotAction::Cancelled),
    }
}
