/// Settings the webhook endpoint needs, lifted from the application config.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Shared secret for PayGate webhook signatures.
    pub webhook_secret: String,
    /// Accepted clock skew for signed timestamps, in seconds.
    pub tolerance_secs: i64,
}
