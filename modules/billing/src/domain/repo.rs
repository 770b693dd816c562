use crate::contract::Subscription;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Port for the domain layer.
///
/// Every multi-row operation here is atomic: the implementation wraps the
/// ledger write and its user-row cascade in one database transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingRepository: Send + Sync {
    /// The user's subscription with status ACTIVE or PAST_DUE, if any.
    async fn find_active_or_past_due(&self, user_id: Uuid)
        -> anyhow::Result<Option<Subscription>>;
    /// Locate a ledger row by the gateway's correlation id.
    async fn find_by_provider_ref(&self, provider_ref: &str)
        -> anyhow::Result<Option<Subscription>>;
    /// Insert the ledger row and set the user's premium_until to its
    /// renews_at, in one transaction.
    async fn create_with_premium(&self, subscription: Subscription) -> anyhow::Result<()>;
    /// status → ACTIVE with a new renews_at; user's premium_until follows,
    /// in one transaction.
    async fn mark_renewed(
        &self,
        id: Uuid,
        user_id: Uuid,
        renews_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    /// status → PAST_DUE. The user row is untouched.
    async fn mark_past_due(&self, id: Uuid) -> anyhow::Result<()>;
    /// status → CANCELED and the user's premium_until cleared, in one
    /// transaction.
    async fn mark_canceled(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<()>;
    /// Record a webhook delivery id. Returns false when the id was already
    /// recorded (duplicate delivery).
    async fn record_event(&self, event_id: &str) -> anyhow::Result<bool>;
}
