pub mod model;

pub use model::{AccountStatus, KycStatus, LoginCredentials, NewUser, Role, User};
