use utoipa::OpenApi;

/// Aggregated OpenAPI document for every module's REST surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Amora API",
        description = "Dating platform backend: accounts, profiles, messaging, moderation and billing",
        version = "0.1.0"
    ),
    paths(
        accounts::api::rest::handlers::register,
        accounts::api::rest::handlers::login,
        accounts::api::rest::handlers::me,
        profiles::api::rest::handlers::create_profile,
        profiles::api::rest::handlers::browse_profiles,
        profiles::api::rest::handlers::get_profile,
        messaging::api::rest::handlers::list_conversations,
        messaging::api::rest::handlers::send_message,
        messaging::api::rest::handlers::list_messages,
        moderation::api::rest::handlers::create_report,
        moderation::api::rest::handlers::list_reports,
        billing::api::rest::handlers::subscribe,
        billing::api::rest::handlers::paygate_webhook,
    ),
    components(schemas(
        api_core::problem::Problem,
        api_core::problem::ValidationError,
        api_core::pagination::PageMeta,
    )),
    tags(
        (name = "accounts", description = "Registration and credential sessions"),
        (name = "profiles", description = "Dating profiles and browsing"),
        (name = "messaging", description = "Conversations and messages"),
        (name = "moderation", description = "Reports and the moderation queue"),
        (name = "billing", description = "Subscriptions and the PayGate webhook")
    )
)]
pub struct ApiDoc;
