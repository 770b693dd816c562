use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use api_core::problem::Problem;
use api_core::{problem, CurrentUser, ProblemResponse};

use crate::api::rest::dto::{
    SubscribeReq, SubscribeResponse, SubscriptionDto, WebhookAck, WebhookEnvelope,
};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::signature::{verify_signature, SIGNATURE_HEADER};
use crate::config::BillingConfig;
use crate::domain::service::{Service, WebhookOutcome};

/// Start a subscription for the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/payments/subscribe",
    tag = "billing",
    request_body = SubscribeReq,
    responses(
        (status = 200, description = "Subscription created", body = SubscribeResponse),
        (status = 400, description = "Validation error or duplicate subscription", body = Problem),
        (status = 401, description = "Missing or invalid token", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn subscribe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    Json(req_body): Json<SubscribeReq>,
) -> Result<Json<SubscribeResponse>, ProblemResponse> {
    info!("User {} subscribing", current.id);

    match svc.subscribe(current.id, req_body.into()).await {
        Ok(subscription) => Ok(Json(SubscribeResponse {
            subscription: SubscriptionDto::from(subscription),
            message: "Subscription created successfully".to_string(),
        })),
        Err(e) => {
            error!("Failed to create subscription: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// PayGate webhook sink.
///
/// Consumes the raw body so the HMAC covers exactly the bytes that were
/// signed, then parses the `{id?, event, data}` envelope.
#[utoipa::path(
    post,
    path = "/api/webhooks/paygate",
    tag = "billing",
    request_body = WebhookEnvelope,
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 400, description = "Unknown event or malformed payload"),
        (status = 401, description = "Missing or invalid signature", body = Problem)
    )
)]
pub async fn paygate_webhook(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Extension(config): Extension<Arc<BillingConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = match headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(value) => value,
        None => {
            warn!("Webhook delivery without signature header");
            return problem::unauthorized("Missing webhook signature").into_response();
        }
    };

    match verify_signature(
        &body,
        signature,
        &config.webhook_secret,
        config.tolerance_secs,
    ) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Webhook signature mismatch");
            return problem::unauthorized("Invalid webhook signature").into_response();
        }
        Err(reason) => {
            warn!("Webhook signature rejected: {}", reason);
            return problem::unauthorized("Invalid webhook signature").into_response();
        }
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Malformed webhook payload: {}", e);
            return problem::bad_request("Invalid webhook payload").into_response();
        }
    };

    info!("PayGate webhook received: {}", envelope.event);

    match svc.handle_event(envelope.into()).await {
        Ok(WebhookOutcome::UnknownEvent) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": "Unknown event" }))).into_response()
        }
        // Applied, duplicate and unknown-reference deliveries are all
        // acknowledged; the gateway does not retry either way.
        Ok(_) => Json(WebhookAck { received: true }).into_response(),
        Err(e) => {
            error!("Webhook processing error: {}", e);
            map_domain_error(&e, uri.path()).into_response()
        }
    }
}
