use crate::contract::{Conversation, ConversationSummary, Message, MessageWithSender};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingRepository: Send + Sync {
    /// All conversations containing the user, newest activity first, with
    /// the other participant's nickname and the latest message attached.
    async fn list_conversations(&self, user_id: Uuid) -> anyhow::Result<Vec<ConversationSummary>>;
    /// Load a conversation by id.
    async fn find_conversation(&self, id: Uuid) -> anyhow::Result<Option<Conversation>>;
    /// Find the conversation for an unordered user pair.
    async fn find_conversation_for_pair(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> anyhow::Result<Option<Conversation>>;
    /// Insert a new conversation.
    async fn create_conversation(&self, conversation: Conversation) -> anyhow::Result<()>;
    /// Insert a message and bump the conversation's last_message_at, atomically.
    async fn insert_message(&self, message: Message) -> anyhow::Result<()>;
    /// Messages of one conversation, oldest first, with sender nicknames.
    async fn list_messages(&self, conversation_id: Uuid)
        -> anyhow::Result<Vec<MessageWithSender>>;
}
