//! Content moderation: user reports and the moderation queue.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use domain::service::Service;
