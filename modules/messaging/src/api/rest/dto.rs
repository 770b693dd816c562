use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::{ConversationSummary, Message, MessageWithSender, NewMessage};

const UNKNOWN_NICKNAME: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationPartyDto {
    pub id: Uuid,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageDto {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryDto {
    pub id: Uuid,
    pub other_user: ConversationPartyDto,
    pub last_message: Option<LastMessageDto>,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummaryDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageReq {
    pub conversation_id: Option<Uuid>,
    pub recipient_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: MessageDto,
    pub conversation_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessagesQuery {
    pub conversation_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageWithSenderDto {
    #[serde(flatten)]
    pub message: MessageDto,
    pub sender: ConversationPartyDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessagesResponse {
    pub messages: Vec<MessageWithSenderDto>,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            content: m.content,
            media_url: m.media_url,
            created_at: m.created_at,
        }
    }
}

impl From<ConversationSummary> for ConversationSummaryDto {
    fn from(s: ConversationSummary) -> Self {
        Self {
            id: s.id,
            other_user: ConversationPartyDto {
                id: s.other_user_id,
                nickname: s
                    .other_nickname
                    .unwrap_or_else(|| UNKNOWN_NICKNAME.to_string()),
            },
            last_message: s.last_message.map(|m| LastMessageDto {
                content: m.content,
                created_at: m.created_at,
                sender: m
                    .sender_nickname
                    .unwrap_or_else(|| UNKNOWN_NICKNAME.to_string()),
            }),
            last_message_at: s.last_message_at,
        }
    }
}

impl From<MessageWithSender> for MessageWithSenderDto {
    fn from(m: MessageWithSender) -> Self {
        let sender_id = m.message.sender_id;
        Self {
            message: MessageDto::from(m.message),
            sender: ConversationPartyDto {
                id: sender_id,
                nickname: m
                    .sender_nickname
                    .unwrap_or_else(|| UNKNOWN_NICKNAME.to_string()),
            },
        }
    }
}

impl From<SendMessageReq> for NewMessage {
    fn from(req: SendMessageReq) -> Self {
        Self {
            conversation_id: req.conversation_id,
            recipient_id: req.recipient_id,
            content: req.content,
            media_url: req.media_url,
        }
    }
}
