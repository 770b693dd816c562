use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::{Conversation, ConversationSummary, Message, MessageWithSender, NewMessage};
use crate::domain::error::DomainError;
use crate::domain::repo::MessagingRepository;

const MAX_CONTENT_LEN: usize = 1000;

/// Domain service with business rules for direct messaging.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn MessagingRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn MessagingRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "messaging.service.conversations", skip(self), fields(user_id = %user_id))]
    pub async fn conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, DomainError> {
        self.repo
            .list_conversations(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Send a message, creating the conversation for the pair if needed.
    /// Returns the stored message and the conversation it landed in.
    #[instrument(
        name = "messaging.service.send_message",
        skip(self, new_message),
        fields(sender_id = %sender_id, recipient_id = %new_message.recipient_id)
    )]
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        new_message: NewMessage,
    ) -> Result<(Message, Uuid), DomainError> {
        let len = new_message.content.chars().count();
        if len == 0 || len > MAX_CONTENT_LEN {
            return Err(DomainError::validation(
                "content",
                format!("content must be 1-{MAX_CONTENT_LEN} characters"),
            ));
        }

        let conversation_id = match new_message.conversation_id {
            Some(id) => {
                let conversation = self
                    .repo
                    .find_conversation(id)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?
                    .ok_or_else(|| DomainError::conversation_not_found(id))?;
                if !conversation.has_participant(sender_id) {
                    return Err(DomainError::NotParticipant);
                }
                id
            }
            None => {
                match self
                    .repo
                    .find_conversation_for_pair(sender_id, new_message.recipient_id)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?
                {
                    Some(existing) => existing.id,
                    None => {
                        let conversation = Conversation {
                            id: Uuid::new_v4(),
                            user_a: sender_id,
                            user_b: new_message.recipient_id,
                            last_message_at: None,
                            created_at: Utc::now(),
                        };
                        self.repo
                            .create_conversation(conversation.clone())
                            .await
                            .map_err(|e| DomainError::database(e.to_string()))?;
                        debug!("Created conversation {}", conversation.id);
                        conversation.id
                    }
                }
            }
        };

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content: new_message.content,
            media_url: new_message.media_url,
            created_at: Utc::now(),
        };

        self.repo
            .insert_message(message.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Message {} sent in conversation {}", message.id, conversation_id);
        Ok((message, conversation_id))
    }

    /// Message history, restricted to participants.
    #[instrument(
        name = "messaging.service.messages",
        skip(self),
        fields(user_id = %user_id, conversation_id = %conversation_id)
    )]
    pub async fn messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageWithSender>, DomainError> {
        let conversation = self
            .repo
            .find_conversation(conversation_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::NotParticipant)?;

        if !conversation.has_participant(user_id) {
            return Err(DomainError::NotParticipant);
        }

        self.repo
            .list_messages(conversation_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}
