use crate::contract::User;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Load a user by email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Load a user by phone number.
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Check uniqueness by phone number.
    async fn phone_exists(&self, phone: &str) -> anyhow::Result<bool>;
    /// Insert a fully-formed user.
    ///
    /// Service computes id/timestamps/hash; repo persists.
    async fn insert(&self, user: User) -> anyhow::Result<()>;
}
