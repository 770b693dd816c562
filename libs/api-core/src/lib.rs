pub mod auth;
pub mod pagination;
pub mod problem;

pub use auth::{Claims, CurrentUser, SessionKeys};
pub use pagination::{PageMeta, PageParams, ResolvedPage};
pub use problem::{Problem, ProblemResponse, ValidationError};
