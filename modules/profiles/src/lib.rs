//! Dating profiles: creation, authenticated browsing with filters, lookup.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use domain::service::Service;
