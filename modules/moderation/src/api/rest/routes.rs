use crate::api::rest::handlers;
use crate::domain::service::Service;
use axum::{routing::post, Extension, Router};
use std::sync::Arc;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .layer(Extension(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repo::MockModerationRepository;
    use api_core::SessionKeys;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn keys() -> Arc<SessionKeys> {
        Arc::new(SessionKeys::new("route-test-secret", 1))
    }

    fn app(repo: MockModerationRepository, session_keys: Arc<SessionKeys>) -> Router {
        let svc = Arc::new(Service::new(Arc::new(repo)));
        router(svc).layer(Extension(session_keys))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn report_listing_requires_moderator_role() {
        let session_keys = keys();
        let token = session_keys
            .issue(Uuid::new_v4(), "USER", "ACTIVE")
            .unwrap();
        let repo = MockModerationRepository::new();

        let resp = app(repo, session_keys)
            .oneshot(
                Request::get("/api/reports")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn moderator_sees_queue() {
        let session_keys = keys();
        let token = session_keys
            .issue(Uuid::new_v4(), "MOD", "ACTIVE")
            .unwrap();
        let mut repo = MockModerationRepository::new();
        repo.expect_list_page().returning(|_, _, _| Ok((vec![], 0)));

        let resp = app(repo, session_keys)
            .oneshot(
                Request::get("/api/reports?status=OPEN")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["pagination"]["limit"], 20);
    }

    #[tokio::test]
    async fn unknown_status_is_400() {
        let session_keys = keys();
        let token = session_keys
            .issue(Uuid::new_v4(), "ADMIN", "ACTIVE")
            .unwrap();
        let repo = MockModerationRepository::new();

        let resp = app(repo, session_keys)
            .oneshot(
                Request::get("/api/reports?status=BOGUS")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_report_is_400() {
        let session_keys = keys();
        let token = session_keys
            .issue(Uuid::new_v4(), "USER", "ACTIVE")
            .unwrap();
        let mut repo = MockModerationRepository::new();
        repo.expect_open_report_exists()
            .returning(|_, _, _| Ok(true));

        let resp = app(repo, session_keys)
            .oneshot(
                Request::post("/api/reports")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"targetType":"MESSAGE","targetId":"msg-1","reason":"spam spam spam spam"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "MODERATION_DUPLICATE_REPORT");
    }
}
