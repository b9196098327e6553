//! Dialogue Manager module applying routing decisions to per-chat state

use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::ChatId;
use tracing::debug;

use crate::dialogue::{LookupDialogue, LookupDialogueState};
use crate::observability;

use super::router::{route, BotAction, InboundMessage, Transition};

/// Conversation controller owning every chat's dialogue state.
///
/// Each call to [`ConversationController::handle`] reads the chat's state,
/// routes the message and stores the next state before returning the action
/// to perform. Chats never see each other's state.
pub struct ConversationController {
    storage: Arc<InMemStorage<LookupDialogueState>>,
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController").finish_non_exhaustive()
    }
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationController {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }

    fn dialogue(&self, chat_id: i64) -> LookupDialogue {
        LookupDialogue::new(Arc::clone(&self.storage), ChatId(chat_id))
    }

    /// Current state of a chat, `Idle` for chats never seen
    pub async fn state(&self, chat_id: i64) -> Result<LookupDialogueState> {
        Ok(self.dialogue(chat_id).get().await?.unwrap_or_default())
    }

    /// Route `message` and advance its chat's state
    pub async fn handle(&self, message: &InboundMessage) -> Result<BotAction> {
        let dialogue = self.dialogue(message.chat_id);
        let current = dialogue.get().await?.unwrap_or_default();
        let Transition { action, next_state } = route(current, message);

        if next_state != current {
            match next_state {
                // Idle chats are not kept in the storage
                LookupDialogueState::Idle => dialogue.exit().await?,
                awaiting => dialogue.update(awaiting).await?,
            }

            observability::record_dialogue_transition(current.as_str(), next_state.as_str());
            debug!(
                chat_id = message.chat_id,
                from = current.as_str(),
                to = next_state.as_str(),
                action = action.name(),
                "Dialogue state changed"
            );
        }

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_then_lookup_returns_to_idle() -> Result<()> {
        let controller = ConversationController::new();

        controller
            .handle(&InboundMessage::from_text(7, "/phone"))
            .await?;
        assert_eq!(controller.state(7).await?, LookupDialogueState::AwaitingPhone);

        let action = controller
            .handle(&InboundMessage::from_text(7, "9876543210"))
            .await?;
        assert!(matches!(action, BotAction::Lookup(_)));
        assert_eq!(controller.state(7).await?, LookupDialogueState::Idle);
        Ok(())
    }

    #[tokio::test]
    async fn test_idle_to_idle_does_not_touch_storage() -> Result<()> {
        let controller = ConversationController::new();

        // Removing a chat that was never stored would fail, so Idle -> Idle
        // must leave the storage alone
        for text in ["hello", "/cancel", "9876543210"] {
            controller.handle(&InboundMessage::from_text(8, text)).await?;
        }
        assert_eq!(controller.state(8).await?, LookupDialogueState::Idle);
        Ok(())
    }
}
