use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::{BrowseCriteria, NewProfile, Profile, ProfileCard};
use crate::domain::error::DomainError;
use crate::domain::repo::ProfilesRepository;
use api_core::{PageMeta, ResolvedPage};

const MIN_NICKNAME_LEN: usize = 3;
const MAX_NICKNAME_LEN: usize = 50;
const MAX_BIO_LEN: usize = 500;

/// Domain service with business rules for profile management.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ProfilesRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn ProfilesRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "profiles.service.create_profile", skip(self, new_profile), fields(user_id = %user_id, nickname = %new_profile.nickname))]
    pub async fn create_profile(
        &self,
        user_id: Uuid,
        new_profile: NewProfile,
    ) -> Result<Profile, DomainError> {
        info!("Creating profile");

        self.validate_new_profile(&new_profile)?;

        if self
            .repo
            .find_by_user(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .is_some()
        {
            return Err(DomainError::ProfileAlreadyExists);
        }

        if self
            .repo
            .nickname_exists(&new_profile.nickname)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::nickname_taken(new_profile.nickname));
        }

        let interests = new_profile
            .interests
            .map(|list| serde_json::to_string(&list))
            .transpose()
            .map_err(|e| DomainError::database(format!("interests encoding failed: {e}")))?;
        let visibility = new_profile
            .visibility
            .map(|prefs| serde_json::to_string(&prefs))
            .transpose()
            .map_err(|e| DomainError::database(format!("visibility encoding failed: {e}")))?;

        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id,
            nickname: new_profile.nickname,
            bio: new_profile.bio,
            gender: new_profile.gender,
            interests,
            city: new_profile.city,
            visibility,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(profile.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created profile with id={}", profile.id);
        Ok(profile)
    }

    /// One page of browsable profiles plus its pagination envelope.
    #[instrument(name = "profiles.service.browse", skip(self, criteria))]
    pub async fn browse(
        &self,
        criteria: BrowseCriteria,
        page: ResolvedPage,
    ) -> Result<(Vec<ProfileCard>, PageMeta), DomainError> {
        debug!("Browsing profiles");

        let (cards, total) = self
            .repo
            .list_page(&criteria, page.limit, page.offset())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Found {} profiles of {} total", cards.len(), total);
        Ok((cards, PageMeta::new(page, total)))
    }

    #[instrument(name = "profiles.service.get_profile", skip(self), fields(profile_id = %id))]
    pub async fn get_profile(&self, id: Uuid) -> Result<ProfileCard, DomainError> {
        self.repo
            .find_card_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::profile_not_found(id))
    }

    fn validate_new_profile(&self, new_profile: &NewProfile) -> Result<(), DomainError> {
        let len = new_profile.nickname.chars().count();
        if !(MIN_NICKNAME_LEN..=MAX_NICKNAME_LEN).contains(&len) {
            return Err(DomainError::validation(
                "nickname",
                format!("nickname must be {MIN_NICKNAME_LEN}-{MAX_NICKNAME_LEN} characters"),
            ));
        }
        if let Some(ref bio) = new_profile.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(DomainError::validation(
                    "bio",
                    format!("bio must be at most {MAX_BIO_LEN} characters"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repo::MockProfilesRepository;
    use api_core::PageParams;

    fn new_profile(nickname: &str) -> NewProfile {
        NewProfile {
            nickname: nickname.to_string(),
            bio: Some("hello".to_string()),
            gender: Some("F".to_string()),
            interests: Some(vec!["hiking".to_string(), "jazz".to_string()]),
            city: Some("Gaborone".to_string()),
            visibility: None,
        }
    }

    #[tokio::test]
    async fn create_profile_serializes_interests() {
        let mut repo = MockProfilesRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));
        repo.expect_nickname_exists().returning(|_| Ok(false));
        repo.expect_insert().returning(|_| Ok(()));

        let svc = Service::new(Arc::new(repo));
        let profile = svc
            .create_profile(Uuid::new_v4(), new_profile("stargazer"))
            .await
            .unwrap();

        assert_eq!(profile.interests.as_deref(), Some(r#"["hiking","jazz"]"#));
    }

    #[tokio::test]
    async fn second_profile_for_user_rejected() {
        let mut repo = MockProfilesRepository::new();
        repo.expect_find_by_user().returning(|user_id| {
            Ok(Some(Profile {
                id: Uuid::new_v4(),
                user_id,
                nickname: "existing".to_string(),
                bio: None,
                gender: None,
                interests: None,
                city: None,
                visibility: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let svc = Service::new(Arc::new(repo));
        let err = svc
            .create_profile(Uuid::new_v4(), new_profile("stargazer"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProfileAlreadyExists));
    }

    #[tokio::test]
    async fn taken_nickname_rejected() {
        let mut repo = MockProfilesRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));
        repo.expect_nickname_exists().returning(|_| Ok(true));

        let svc = Service::new(Arc::new(repo));
        let err = svc
            .create_profile(Uuid::new_v4(), new_profile("stargazer"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NicknameTaken { .. }));
    }

    #[tokio::test]
    async fn nickname_length_bounds() {
        let repo = MockProfilesRepository::new();
        let svc = Service::new(Arc::new(repo));

        let err = svc
            .create_profile(Uuid::new_v4(), new_profile("ab"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let long = "x".repeat(51);
        let err = svc
            .create_profile(Uuid::new_v4(), new_profile(&long))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn browse_builds_page_meta() {
        let mut repo = MockProfilesRepository::new();
        repo.expect_list_page()
            .withf(|_, limit, offset| *limit == 20 && *offset == 20)
            .returning(|_, _, _| Ok((vec![], 41)));

        let svc = Service::new(Arc::new(repo));
        let page = PageParams {
            page: Some(2),
            limit: Some(20),
        }
        .resolve(20, 100);

        let (cards, meta) = svc
            .browse(BrowseCriteria::default(), page)
            .await
            .unwrap();
        assert!(cards.is_empty());
        assert_eq!(meta.total, 41);
        assert_eq!(meta.pages, 3);
        assert_eq!(meta.page, 2);
    }
}
