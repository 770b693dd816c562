use axum::{extract::Query, http::Uri, response::Json, Extension};
use std::sync::Arc;
use tracing::{debug, error};

use api_core::problem::Problem;
use api_core::{problem, CurrentUser, ProblemResponse};

use crate::api::rest::dto::{
    ConversationListResponse, ConversationSummaryDto, MessageDto, MessageWithSenderDto,
    MessagesQuery, MessagesResponse, SendMessageReq, SendMessageResponse,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// List the caller's conversations, newest activity first.
#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "messaging",
    responses(
        (status = 200, description = "The caller's conversations", body = ConversationListResponse),
        (status = 401, description = "Missing or invalid token", body = Problem)
    )
)]
pub async fn list_conversations(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
) -> Result<Json<ConversationListResponse>, ProblemResponse> {
    debug!("Listing conversations for user {}", current.id);

    match svc.conversations(current.id).await {
        Ok(summaries) => Ok(Json(ConversationListResponse {
            conversations: summaries
                .into_iter()
                .map(ConversationSummaryDto::from)
                .collect(),
        })),
        Err(e) => {
            error!("Failed to list conversations: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Send a message, creating the conversation if needed.
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messaging",
    request_body = SendMessageReq,
    responses(
        (status = 200, description = "Message stored", body = SendMessageResponse),
        (status = 400, description = "Validation error", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 403, description = "Not a participant of the conversation", body = Problem),
        (status = 404, description = "Conversation not found", body = Problem)
    )
)]
pub async fn send_message(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Json(req_body): Json<SendMessageReq>,
) -> Result<Json<SendMessageResponse>, ProblemResponse> {
    match svc.send_message(current.id, req_body.into()).await {
        Ok((message, conversation_id)) => Ok(Json(SendMessageResponse {
            message: MessageDto::from(message),
            conversation_id,
        })),
        Err(e) => {
            error!("Failed to send message: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Message history for one conversation.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messaging",
    params(MessagesQuery),
    responses(
        (status = 200, description = "Messages oldest first", body = MessagesResponse),
        (status = 400, description = "Conversation ID required", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 403, description = "Not a participant of the conversation", body = Problem)
    )
)]
pub async fn list_messages(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ProblemResponse> {
    let conversation_id = query
        .conversation_id
        .ok_or_else(|| problem::bad_request("Conversation ID required"))?;

    match svc.messages(current.id, conversation_id).await {
        Ok(messages) => Ok(Json(MessagesResponse {
            messages: messages.into_iter().map(MessageWithSenderDto::from).collect(),
        })),
        Err(e) => {
            error!("Failed to list messages: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
