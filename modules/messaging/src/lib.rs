//! Direct messaging between users: conversations and message history.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use domain::service::Service;
