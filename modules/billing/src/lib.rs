//! Subscription lifecycle: the subscribe endpoint and the PayGate webhook.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use config::BillingConfig;
pub use domain::service::Service;
