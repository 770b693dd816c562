use crate::api::rest::handlers;
use crate::config::BillingConfig;
use crate::domain::service::Service;
use axum::{routing::post, Extension, Router};
use std::sync::Arc;

pub fn router(service: Arc<Service>, config: Arc<BillingConfig>) -> Router {
    Router::new()
        .route("/api/payments/subscribe", post(handlers::subscribe))
        .route("/api/webhooks/paygate", post(handlers::paygate_webhook))
        .layer(Extension(service))
        .layer(Extension(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest::signature::sign_payload;
    use crate::contract::{Plan, Subscription, SubscriptionStatus, PROVIDER};
    use crate::domain::repo::MockBillingRepository;
    use crate::domain::service::renewal_from;
    use api_core::SessionKeys;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const WEBHOOK_SECRET: &str = "whsec-test";

    fn keys() -> Arc<SessionKeys> {
        Arc::new(SessionKeys::new("route-test-secret", 1))
    }

    fn app(repo: MockBillingRepository, session_keys: Arc<SessionKeys>) -> Router {
        let svc = Arc::new(Service::new(Arc::new(repo)));
        let config = Arc::new(BillingConfig {
            webhook_secret: WEBHOOK_SECRET.to_string(),
            tolerance_secs: 300,
        });
        router(svc, config).layer(Extension(session_keys))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn signed_webhook(payload: &str) -> Request<Body> {
        let header_value = sign_payload(
            payload.as_bytes(),
            WEBHOOK_SECRET,
            Utc::now().timestamp(),
        );
        Request::post("/api/webhooks/paygate")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-paygate-signature", header_value)
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    fn live_subscription(user_id: Uuid, provider_ref: &str) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan: Plan::Premium,
            status: SubscriptionStatus::Active,
            renews_at: renewal_from(now),
            provider: PROVIDER.to_string(),
            provider_ref: provider_ref.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn subscribe_requires_auth() {
        let repo = MockBillingRepository::new();
        let resp = app(repo, keys())
            .oneshot(
                Request::post("/api/payments/subscribe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"plan":"PREMIUM","paymentMethod":"ref-123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn subscribe_returns_active_subscription() {
        let session_keys = keys();
        let user_id = Uuid::new_v4();
        let token = session_keys.issue(user_id, "USER", "ACTIVE").unwrap();

        let mut repo = MockBillingRepository::new();
        repo.expect_find_active_or_past_due().returning(|_| Ok(None));
        repo.expect_create_with_premium().returning(|_| Ok(()));

        let resp = app(repo, session_keys)
            .oneshot(
                Request::post("/api/payments/subscribe")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"plan":"PREMIUM","paymentMethod":"ref-123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Subscription created successfully");
        assert_eq!(json["subscription"]["status"], "ACTIVE");
        assert_eq!(json["subscription"]["plan"], "PREMIUM");
        assert_eq!(json["subscription"]["providerRef"], "ref-123");
    }

    #[tokio::test]
    async fn duplicate_subscription_is_400() {
        let session_keys = keys();
        let user_id = Uuid::new_v4();
        let token = session_keys.issue(user_id, "USER", "ACTIVE").unwrap();

        let mut repo = MockBillingRepository::new();
        repo.expect_find_active_or_past_due()
            .returning(move |uid| Ok(Some(live_subscription(uid, "ref-live"))));

        let resp = app(repo, session_keys)
            .oneshot(
                Request::post("/api/payments/subscribe")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"plan":"STANDARD","paymentMethod":"ref-456"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "BILLING_DUPLICATE_SUBSCRIPTION");
    }

    #[tokio::test]
    async fn webhook_without_signature_is_401_and_untouched() {
        // No repo expectations: any call would panic.
        let repo = MockBillingRepository::new();
        let resp = app(repo, keys())
            .oneshot(
                Request::post("/api/webhooks/paygate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"event":"payment.succeeded","data":{"subscriptionId":"ref-123"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn webhook_with_forged_signature_is_401() {
        let repo = MockBillingRepository::new();
        let payload = r#"{"event":"payment.succeeded","data":{"subscriptionId":"ref-123"}}"#;
        let forged = sign_payload(payload.as_bytes(), "wrong-secret", Utc::now().timestamp());

        let resp = app(repo, keys())
            .oneshot(
                Request::post("/api/webhooks/paygate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-paygate-signature", forged)
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_event_is_400_with_error_body() {
        let repo = MockBillingRepository::new();
        let resp = app(repo, keys())
            .oneshot(signed_webhook(
                r#"{"event":"payment.refunded","data":{"subscriptionId":"ref-123"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Unknown event");
    }

    #[tokio::test]
    async fn unknown_reference_still_acknowledged() {
        let mut repo = MockBillingRepository::new();
        repo.expect_find_by_provider_ref().returning(|_| Ok(None));

        let resp = app(repo, keys())
            .oneshot(signed_webhook(
                r#"{"event":"payment.failed","data":{"subscriptionId":"ref-void"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["received"], true);
    }

    #[tokio::test]
    async fn end_to_end_subscribe_then_cancel() {
        // Subscribe, then a subscription.canceled webhook flips the ledger
        // row and clears premium.
        let session_keys = keys();
        let user_id = Uuid::new_v4();
        let token = session_keys.issue(user_id, "USER", "ACTIVE").unwrap();

        let mut repo = MockBillingRepository::new();
        repo.expect_find_active_or_past_due().returning(|_| Ok(None));
        repo.expect_record_event().returning(|_| Ok(true));

        let created: Arc<std::sync::Mutex<Option<Subscription>>> =
            Arc::new(std::sync::Mutex::new(None));
        let created_w = created.clone();
        repo.expect_create_with_premium().returning(move |s| {
            *created_w.lock().unwrap() = Some(s);
            Ok(())
        });
        let created_r = created.clone();
        repo.expect_find_by_provider_ref().returning(move |r| {
            Ok(created_r
                .lock()
                .unwrap()
                .clone()
                .filter(|s| s.provider_ref == r))
        });
        repo.expect_mark_canceled()
            .withf(move |_, uid| *uid == user_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let app = app(repo, session_keys);

        let resp = app
            .clone()
            .oneshot(
                Request::post("/api/payments/subscribe")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"plan":"PREMIUM","paymentMethod":"ref-123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(signed_webhook(
                r#"{"id":"evt-cancel","event":"subscription.canceled","data":{"subscriptionId":"ref-123"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["received"], true);
    }
}
