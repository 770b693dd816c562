use std::sync::Arc;

use chrono::{DateTime, Duration, Months, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::contract::{
    GatewayEvent, NewSubscription, Subscription, SubscriptionStatus, PROVIDER,
};
use crate::domain::error::DomainError;
use crate::domain::repo::BillingRepository;

pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment.succeeded";
pub const EVENT_PAYMENT_FAILED: &str = "payment.failed";
pub const EVENT_SUBSCRIPTION_CANCELED: &str = "subscription.canceled";

/// What the webhook handler did with a delivery. Every variant except
/// `UnknownEvent` is acknowledged to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Transition applied.
    Applied,
    /// Delivery id seen before; nothing re-applied.
    Duplicate,
    /// No ledger row matches the provider reference. The event is dropped
    /// (the gateway does not retry).
    UnknownReference,
    /// Event type we don't handle; reported back as a client error.
    UnknownEvent,
}

/// One calendar month ahead; falls back to 30 days if the date cannot be
/// represented.
pub fn renewal_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(1))
        .unwrap_or(now + Duration::days(30))
}

/// Subscription lifecycle manager.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn BillingRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn BillingRepository>) -> Self {
        Self { repo }
    }

    /// Start a subscription: one ledger row plus the premium flag, atomically.
    #[instrument(
        name = "billing.service.subscribe",
        skip(self, new_subscription),
        fields(user_id = %user_id, plan = %new_subscription.plan.as_str())
    )]
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, DomainError> {
        info!("Creating subscription");

        if new_subscription.payment_method.trim().is_empty() {
            return Err(DomainError::validation(
                "paymentMethod",
                "payment method reference must not be empty",
            ));
        }

        if self
            .repo
            .find_active_or_past_due(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .is_some()
        {
            return Err(DomainError::DuplicateSubscription);
        }

        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan: new_subscription.plan,
            status: SubscriptionStatus::Active,
            renews_at: renewal_from(now),
            provider: PROVIDER.to_string(),
            provider_ref: new_subscription.payment_method,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .create_with_premium(subscription.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Subscription {} created, renews at {}", subscription.id, subscription.renews_at);
        Ok(subscription)
    }

    /// Apply one gateway event to the ledger.
    ///
    /// Deliveries that carry an id are recorded first; a replayed id is
    /// acknowledged without re-applying the transition. Deliveries without
    /// an id cannot be deduplicated and are applied every time.
    #[instrument(
        name = "billing.service.handle_event",
        skip(self, event),
        fields(kind = %event.kind, provider_ref = %event.subscription_ref)
    )]
    pub async fn handle_event(&self, event: GatewayEvent) -> Result<WebhookOutcome, DomainError> {
        match event.kind.as_str() {
            EVENT_PAYMENT_SUCCEEDED | EVENT_PAYMENT_FAILED | EVENT_SUBSCRIPTION_CANCELED => {}
            other => {
                warn!("Unknown webhook event: {}", other);
                return Ok(WebhookOutcome::UnknownEvent);
            }
        }

        match event.id {
            Some(ref event_id) => {
                let fresh = self
                    .repo
                    .record_event(event_id)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                if !fresh {
                    info!("Duplicate delivery of event {}, skipping", event_id);
                    return Ok(WebhookOutcome::Duplicate);
                }
            }
            None => warn!("Webhook delivery without an event id; cannot deduplicate"),
        }

        let subscription = match self
            .repo
            .find_by_provider_ref(&event.subscription_ref)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            Some(subscription) => subscription,
            None => {
                error!(
                    "Subscription not found for PayGate reference {}",
                    event.subscription_ref
                );
                return Ok(WebhookOutcome::UnknownReference);
            }
        };

        match event.kind.as_str() {
            EVENT_PAYMENT_SUCCEEDED => {
                let renews_at = renewal_from(Utc::now());
                self.repo
                    .mark_renewed(subscription.id, subscription.user_id, renews_at)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                info!("Payment succeeded for user {}", subscription.user_id);
            }
            EVENT_PAYMENT_FAILED => {
                self.repo
                    .mark_past_due(subscription.id)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                info!("Payment failed for user {}", subscription.user_id);
            }
            EVENT_SUBSCRIPTION_CANCELED => {
                self.repo
                    .mark_canceled(subscription.id, subscription.user_id)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))?;
                info!("Subscription canceled for user {}", subscription.user_id);
            }
            _ => unreachable!("kind checked above"),
        }

        debug!("Webhook event applied");
        Ok(WebhookOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Plan;
    use crate::domain::repo::MockBillingRepository;

    fn sample_subscription(provider_ref: &str) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan: Plan::Premium,
            status: SubscriptionStatus::Active,
            renews_at: renewal_from(now),
            provider: PROVIDER.to_string(),
            provider_ref: provider_ref.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn event(id: Option<&str>, kind: &str, subscription_ref: &str) -> GatewayEvent {
        GatewayEvent {
            id: id.map(str::to_string),
            kind: kind.to_string(),
            subscription_ref: subscription_ref.to_string(),
        }
    }

    #[test]
    fn renewal_is_one_calendar_month_ahead() {
        let start = "2026-03-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            renewal_from(start),
            "2026-04-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn renewal_clamps_at_month_end() {
        let start = "2026-01-31T08:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            renewal_from(start),
            "2026-02-28T08:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[tokio::test]
    async fn subscribe_creates_active_ledger_row() {
        let user_id = Uuid::new_v4();
        let mut repo = MockBillingRepository::new();
        repo.expect_find_active_or_past_due().returning(|_| Ok(None));
        repo.expect_create_with_premium()
            .withf(move |s| {
                s.user_id == user_id
                    && s.status == SubscriptionStatus::Active
                    && s.provider == "PAYGATE"
                    && s.provider_ref == "ref-123"
            })
            .times(1)
            .returning(|_| Ok(()));

        let svc = Service::new(Arc::new(repo));
        let before = Utc::now();
        let subscription = svc
            .subscribe(
                user_id,
                NewSubscription {
                    plan: Plan::Premium,
                    payment_method: "ref-123".to_string(),
                },
            )
            .await
            .unwrap();

        // renews_at ≈ one month out from "now"
        let expected = renewal_from(before);
        let drift = (subscription.renews_at - expected).num_seconds().abs();
        assert!(drift <= 5, "renews_at drifted {drift}s from now+1 month");
        assert_eq!(subscription.plan, Plan::Premium);
    }

    #[tokio::test]
    async fn second_subscription_rejected_while_one_is_live() {
        let mut repo = MockBillingRepository::new();
        repo.expect_find_active_or_past_due()
            .returning(|_| Ok(Some(sample_subscription("ref-live"))));

        let svc = Service::new(Arc::new(repo));
        let err = svc
            .subscribe(
                Uuid::new_v4(),
                NewSubscription {
                    plan: Plan::Standard,
                    payment_method: "ref-456".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateSubscription));
    }

    #[tokio::test]
    async fn empty_payment_method_rejected() {
        let repo = MockBillingRepository::new();
        let svc = Service::new(Arc::new(repo));
        let err = svc
            .subscribe(
                Uuid::new_v4(),
                NewSubscription {
                    plan: Plan::Standard,
                    payment_method: "  ".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn payment_succeeded_renews_ledger_and_premium_together() {
        let subscription = sample_subscription("ref-123");
        let sub_id = subscription.id;
        let user_id = subscription.user_id;

        let mut repo = MockBillingRepository::new();
        repo.expect_record_event().returning(|_| Ok(true));
        repo.expect_find_by_provider_ref()
            .returning(move |_| Ok(Some(subscription.clone())));
        let before = Utc::now();
        repo.expect_mark_renewed()
            .withf(move |id, uid, renews_at| {
                let drift = (*renews_at - renewal_from(before)).num_seconds().abs();
                *id == sub_id && *uid == user_id && drift <= 5
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let svc = Service::new(Arc::new(repo));
        let outcome = svc
            .handle_event(event(Some("evt-1"), EVENT_PAYMENT_SUCCEEDED, "ref-123"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Applied);
    }

    #[tokio::test]
    async fn payment_failed_only_touches_the_ledger() {
        let subscription = sample_subscription("ref-123");
        let sub_id = subscription.id;

        let mut repo = MockBillingRepository::new();
        repo.expect_record_event().returning(|_| Ok(true));
        repo.expect_find_by_provider_ref()
            .returning(move |_| Ok(Some(subscription.clone())));
        repo.expect_mark_past_due()
            .withf(move |id| *id == sub_id)
            .times(1)
            .returning(|_| Ok(()));
        // No mark_renewed / mark_canceled expectations: calling either panics.

        let svc = Service::new(Arc::new(repo));
        let outcome = svc
            .handle_event(event(Some("evt-2"), EVENT_PAYMENT_FAILED, "ref-123"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Applied);
    }

    #[tokio::test]
    async fn cancellation_clears_premium() {
        let subscription = sample_subscription("ref-123");
        let sub_id = subscription.id;
        let user_id = subscription.user_id;

        let mut repo = MockBillingRepository::new();
        repo.expect_record_event().returning(|_| Ok(true));
        repo.expect_find_by_provider_ref()
            .returning(move |_| Ok(Some(subscription.clone())));
        repo.expect_mark_canceled()
            .withf(move |id, uid| *id == sub_id && *uid == user_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = Service::new(Arc::new(repo));
        let outcome = svc
            .handle_event(event(Some("evt-3"), EVENT_SUBSCRIPTION_CANCELED, "ref-123"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Applied);
    }

    #[tokio::test]
    async fn replayed_event_id_does_not_extend_twice() {
        let subscription = sample_subscription("ref-123");

        let mut repo = MockBillingRepository::new();
        let mut fresh = true;
        repo.expect_record_event().returning(move |_| {
            let was_fresh = fresh;
            fresh = false;
            Ok(was_fresh)
        });
        repo.expect_find_by_provider_ref()
            .returning(move |_| Ok(Some(subscription.clone())));
        repo.expect_mark_renewed()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let svc = Service::new(Arc::new(repo));
        let first = svc
            .handle_event(event(Some("evt-9"), EVENT_PAYMENT_SUCCEEDED, "ref-123"))
            .await
            .unwrap();
        let second = svc
            .handle_event(event(Some("evt-9"), EVENT_PAYMENT_SUCCEEDED, "ref-123"))
            .await
            .unwrap();

        assert_eq!(first, WebhookOutcome::Applied);
        assert_eq!(second, WebhookOutcome::Duplicate);
    }

    #[tokio::test]
    async fn id_less_deliveries_still_reapply() {
        // Without a delivery id there is nothing to dedup on; this pins the
        // residual gap: the same success event applied twice extends twice.
        let subscription = sample_subscription("ref-123");

        let mut repo = MockBillingRepository::new();
        repo.expect_find_by_provider_ref()
            .returning(move |_| Ok(Some(subscription.clone())));
        repo.expect_mark_renewed()
            .times(2)
            .returning(|_, _, _| Ok(()));

        let svc = Service::new(Arc::new(repo));
        for _ in 0..2 {
            let outcome = svc
                .handle_event(event(None, EVENT_PAYMENT_SUCCEEDED, "ref-123"))
                .await
                .unwrap();
            assert_eq!(outcome, WebhookOutcome::Applied);
        }
    }

    #[tokio::test]
    async fn unknown_reference_is_dropped_quietly() {
        let mut repo = MockBillingRepository::new();
        repo.expect_record_event().returning(|_| Ok(true));
        repo.expect_find_by_provider_ref().returning(|_| Ok(None));

        let svc = Service::new(Arc::new(repo));
        let outcome = svc
            .handle_event(event(Some("evt-4"), EVENT_PAYMENT_FAILED, "ref-void"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::UnknownReference);
    }

    #[tokio::test]
    async fn unknown_event_kind_is_flagged_before_any_io() {
        // No expectations at all: any repo call would panic the test.
        let repo = MockBillingRepository::new();
        let svc = Service::new(Arc::new(repo));
        let outcome = svc
            .handle_event(event(Some("evt-5"), "payment.refunded", "ref-123"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::UnknownEvent);
    }
}
