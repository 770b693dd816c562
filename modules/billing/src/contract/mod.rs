pub mod model;

pub use model::{GatewayEvent, NewSubscription, Plan, Subscription, SubscriptionStatus, PROVIDER};
