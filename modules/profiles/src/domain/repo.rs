use crate::contract::{BrowseCriteria, Profile, ProfileCard};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    /// Load a profile with its owner attributes.
    async fn find_card_by_id(&self, id: Uuid) -> anyhow::Result<Option<ProfileCard>>;
    /// Load the profile owned by a user, if any.
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    /// Check uniqueness by nickname.
    async fn nickname_exists(&self, nickname: &str) -> anyhow::Result<bool>;
    /// Insert a fully-formed profile.
    async fn insert(&self, profile: Profile) -> anyhow::Result<()>;
    /// One page of browsable profiles (ACTIVE + KYC-verified owners only),
    /// newest first, plus the total match count.
    async fn list_page(
        &self,
        criteria: &BrowseCriteria,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<ProfileCard>, u64)>;
}
