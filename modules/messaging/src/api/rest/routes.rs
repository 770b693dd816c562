use crate::api::rest::handlers;
use crate::domain::service::Service;
use axum::{
    routing::get,
    routing::post,
    Extension, Router,
};
use std::sync::Arc;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/api/conversations", get(handlers::list_conversations))
        .route(
            "/api/messages",
            post(handlers::send_message).get(handlers::list_messages),
        )
        .layer(Extension(service))
}
