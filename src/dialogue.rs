//! Lookup dialogue module for tracking per-chat conversation state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::lookup::LookupKind;

/// What the bot expects from a chat's next free-text message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupDialogueState {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingId,
}

impl LookupDialogueState {
    /// The state entered after prompting for `kind`
    pub fn awaiting(kind: LookupKind) -> Self {
        match kind {
            LookupKind::Phone => LookupDialogueState::AwaitingPhone,
            LookupKind::Id => LookupDialogueState::AwaitingId,
        }
    }

    /// The lookup this state is waiting for input to, if any
    pub fn awaited_kind(self) -> Option<LookupKind> {
        match self {
            LookupDialogueState::Idle => None,
            LookupDialogueState::AwaitingPhone => Some(LookupKind::Phone),
            LookupDialogueState::AwaitingId => Some(LookupKind::Id),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LookupDialogueState::Idle => "idle",
            LookupDialogueState::AwaitingPhone => "awaiting_phone",
            LookupDialogueState::AwaitingId => "awaiting_id",
        }
    }
}

/// Dialogue handle for one chat, backed by teloxide's in-memory storage.
///
/// Idle chats are removed from the storage rather than stored, so it only
/// holds chats with a pending prompt. Nothing survives a restart.
pub type LookupDialogue = Dialogue<LookupDialogueState, InMemStorage<LookupDialogueState>>;
