use crate::api::rest::handlers;
use crate::domain::service::Service;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/me", get(handlers::me))
        .layer(Extension(service))
}
