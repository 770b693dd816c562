use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::{GatewayEvent, NewSubscription, Plan, Subscription, SubscriptionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub renews_at: DateTime<Utc>,
    pub provider: String,
    pub provider_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeReq {
    pub plan: Plan,
    /// PayGate payment method reference.
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscribeResponse {
    pub subscription: SubscriptionDto,
    pub message: String,
}

/// `{id?, event, data}` envelope as PayGate posts it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookEnvelope {
    /// Delivery id; used for idempotency when present.
    pub id: Option<String>,
    pub event: String,
    pub data: WebhookData,
}

/// Payload of a PayGate event. Only the subscription reference matters to
/// us; the rest of the gateway's fields are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub subscription_id: String,
}

/// Acknowledgement body PayGate expects.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}

impl From<Subscription> for SubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            plan: s.plan,
            status: s.status,
            renews_at: s.renews_at,
            provider: s.provider,
            provider_ref: s.provider_ref,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<SubscribeReq> for NewSubscription {
    fn from(req: SubscribeReq) -> Self {
        Self {
            plan: req.plan,
            payment_method: req.payment_method,
        }
    }
}

impl From<WebhookEnvelope> for GatewayEvent {
    fn from(envelope: WebhookEnvelope) -> Self {
        Self {
            id: envelope.id,
            kind: envelope.event,
            subscription_ref: envelope.data.subscription_id,
        }
    }
}
