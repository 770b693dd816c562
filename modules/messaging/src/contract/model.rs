use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One conversation between an unordered pair of users.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The other side of the conversation, from `user_id`'s point of view.
    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.user_a == user_id {
            self.user_b
        } else {
            self.user_a
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Message send input.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Option<Uuid>,
    pub recipient_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
}

/// The latest message shown in a conversation listing.
#[derive(Debug, Clone, PartialEq)]
pub struct LastMessage {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender_nickname: Option<String>,
}

/// Conversation as listed for one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub other_user_id: Uuid,
    pub other_nickname: Option<String>,
    pub last_message: Option<LastMessage>,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Message plus the sender's nickname for history rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageWithSender {
    pub message: Message,
    pub sender_nickname: Option<String>,
}
