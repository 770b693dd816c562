use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// The only payment provider wired up.
pub const PROVIDER: &str = "PAYGATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    Standard,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Standard => "STANDARD",
            Plan::Premium => "PREMIUM",
        }
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Plan::Standard),
            "PREMIUM" => Ok(Plan::Premium),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Canceled => "CANCELED",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(SubscriptionStatus::Active),
            "PAST_DUE" => Ok(SubscriptionStatus::PastDue),
            "CANCELED" => Ok(SubscriptionStatus::Canceled),
            other => Err(format!("unknown subscription status '{other}'")),
        }
    }
}

/// One purchase cycle in the subscription ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub renews_at: DateTime<Utc>,
    pub provider: String,
    /// Correlation id shared with the gateway (the payment-method reference).
    pub provider_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscribe input.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub plan: Plan,
    pub payment_method: String,
}

/// A payment event as delivered by the gateway, already unwrapped from its
/// envelope.
#[derive(Debug, Clone)]
pub struct GatewayEvent {
    /// Delivery id used for idempotency; gateways do not always send one.
    pub id: Option<String>,
    pub kind: String,
    /// `data.subscriptionId`: matches `Subscription.provider_ref`.
    pub subscription_ref: String,
}
