use crate::api::rest::handlers;
use crate::domain::service::Service;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/api/profiles",
            post(handlers::create_profile).get(handlers::browse_profiles),
        )
        .route("/api/profiles/{id}", get(handlers::get_profile))
        .layer(Extension(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Profile, ProfileCard};
    use crate::domain::repo::MockProfilesRepository;
    use api_core::SessionKeys;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn keys() -> Arc<SessionKeys> {
        Arc::new(SessionKeys::new("route-test-secret", 1))
    }

    fn bearer(keys: &SessionKeys) -> String {
        let token = keys.issue(Uuid::new_v4(), "USER", "ACTIVE").unwrap();
        format!("Bearer {token}")
    }

    fn app(repo: MockProfilesRepository, session_keys: Arc<SessionKeys>) -> Router {
        let svc = Arc::new(Service::new(Arc::new(repo)));
        router(svc).layer(Extension(session_keys))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_card() -> ProfileCard {
        ProfileCard {
            profile: Profile {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                nickname: "stargazer".into(),
                bio: Some("hi".into()),
                gender: Some("F".into()),
                interests: None,
                city: Some("Gaborone".into()),
                visibility: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            birth_year: 1992,
            premium_until: None,
        }
    }

    #[tokio::test]
    async fn browse_requires_auth() {
        let repo = MockProfilesRepository::new();
        let resp = app(repo, keys())
            .oneshot(
                Request::get("/api/profiles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn browse_returns_envelope() {
        let session_keys = keys();
        let mut repo = MockProfilesRepository::new();
        repo.expect_list_page()
            .returning(|_, _, _| Ok((vec![sample_card()], 1)));

        let resp = app(repo, session_keys.clone())
            .oneshot(
                Request::get("/api/profiles?page=1&limit=20&gender=F")
                    .header(header::AUTHORIZATION, bearer(&session_keys))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["pagination"]["total"], 1);
        assert_eq!(json["pagination"]["pages"], 1);
        assert_eq!(json["profiles"][0]["nickname"], "stargazer");
        assert_eq!(json["profiles"][0]["user"]["birthYear"], 1992);
    }

    #[tokio::test]
    async fn inverted_age_filter_is_400() {
        let session_keys = keys();
        let repo = MockProfilesRepository::new();

        let resp = app(repo, session_keys.clone())
            .oneshot(
                Request::get("/api/profiles?minAge=40&maxAge=20")
                    .header(header::AUTHORIZATION, bearer(&session_keys))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_profile_404_when_absent() {
        let session_keys = keys();
        let mut repo = MockProfilesRepository::new();
        repo.expect_find_card_by_id().returning(|_| Ok(None));

        let resp = app(repo, session_keys.clone())
            .oneshot(
                Request::get(format!("/api/profiles/{}", Uuid::new_v4()))
                    .header(header::AUTHORIZATION, bearer(&session_keys))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_profile_rejects_taken_nickname() {
        let session_keys = keys();
        let mut repo = MockProfilesRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));
        repo.expect_nickname_exists().returning(|_| Ok(true));

        let resp = app(repo, session_keys.clone())
            .oneshot(
                Request::post("/api/profiles")
                    .header(header::AUTHORIZATION, bearer(&session_keys))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"nickname":"stargazer"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "PROFILES_NICKNAME_TAKEN");
    }
}
