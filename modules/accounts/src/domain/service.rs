use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::{AccountStatus, KycStatus, LoginCredentials, NewUser, Role, User};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use api_core::SessionKeys;

const BCRYPT_COST: u32 = 12;
const MIN_PASSWORD_LEN: usize = 8;
const MIN_BIRTH_YEAR: i32 = 1900;
const MIN_AGE_YEARS: i32 = 18;

/// Domain service with business rules for account management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    keys: Arc<SessionKeys>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, keys: Arc<SessionKeys>) -> Self {
        Self { repo, keys }
    }

    #[instrument(name = "accounts.service.register", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Registering new user");

        self.validate_new_user(&new_user)?;

        if self
            .repo
            .email_exists(&new_user.email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::EmailAlreadyExists);
        }
        if let Some(ref phone) = new_user.phone {
            if self
                .repo
                .phone_exists(phone)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
            {
                return Err(DomainError::PhoneAlreadyExists);
            }
        }

        let password_hash = bcrypt::hash(&new_user.password, BCRYPT_COST)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            phone: new_user.phone,
            password_hash,
            role: Role::User,
            status: AccountStatus::Active,
            kyc_status: KycStatus::Pending,
            birth_year: new_user.birth_year,
            city: new_user.city,
            premium_until: None,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(user.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully registered user with id={}", user.id);
        Ok(user)
    }

    /// Verify credentials and issue a session token.
    #[instrument(name = "accounts.service.login", skip(self, credentials))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<(String, User), DomainError> {
        debug!("Attempting credential login");

        let user = match (&credentials.email, &credentials.phone) {
            (Some(email), None) => self.repo.find_by_email(email).await,
            (None, Some(phone)) => self.repo.find_by_phone(phone).await,
            _ => {
                return Err(DomainError::validation(
                    "identifier",
                    "provide exactly one of email or phone",
                ))
            }
        }
        .map_err(|e| DomainError::database(e.to_string()))?
        .ok_or(DomainError::InvalidCredentials)?;

        let valid = bcrypt::verify(&credentials.password, &user.password_hash)
            .map_err(|e| DomainError::internal(format!("password verification failed: {e}")))?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(user.id, user.role.as_str(), user.status.as_str())
            .map_err(|e| DomainError::internal(format!("token issuance failed: {e}")))?;

        info!("User {} logged in", user.id);
        Ok((token, user))
    }

    #[instrument(name = "accounts.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    // --- validation helpers ---

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        if new_user.email.is_empty()
            || !new_user.email.contains('@')
            || !new_user.email.contains('.')
        {
            return Err(DomainError::validation("email", "invalid email address"));
        }
        if new_user.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        let max_birth_year = Utc::now().year() - MIN_AGE_YEARS;
        if new_user.birth_year < MIN_BIRTH_YEAR || new_user.birth_year > max_birth_year {
            return Err(DomainError::validation(
                "birthYear",
                format!("birth year must be between {MIN_BIRTH_YEAR} and {max_birth_year}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repo::MockUsersRepository;

    fn keys() -> Arc<SessionKeys> {
        Arc::new(SessionKeys::new("test-secret", 1))
    }

    fn valid_new_user() -> NewUser {
        NewUser {
            email: "ana@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
            phone: Some("+26771234567".to_string()),
            birth_year: 1990,
            city: Some("Gaborone".to_string()),
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_defaults_role() {
        let mut repo = MockUsersRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_phone_exists().returning(|_| Ok(false));
        repo.expect_insert().returning(|_| Ok(()));

        let svc = Service::new(Arc::new(repo), keys());
        let user = svc.register(valid_new_user()).await.unwrap();

        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, AccountStatus::Active);
        assert_eq!(user.kyc_status, KycStatus::Pending);
        assert!(user.premium_until.is_none());
        assert_ne!(user.password_hash, "hunter2hunter2");
        assert!(bcrypt::verify("hunter2hunter2", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut repo = MockUsersRepository::new();
        repo.expect_email_exists().returning(|_| Ok(true));

        let svc = Service::new(Arc::new(repo), keys());
        let err = svc.register(valid_new_user()).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn register_rejects_short_password_and_underage() {
        let repo = MockUsersRepository::new();
        let svc = Service::new(Arc::new(repo), keys());

        let mut short = valid_new_user();
        short.password = "short".to_string();
        assert!(matches!(
            svc.register(short).await.unwrap_err(),
            DomainError::Validation { .. }
        ));

        let mut underage = valid_new_user();
        underage.birth_year = Utc::now().year() - 10;
        assert!(matches!(
            svc.register(underage).await.unwrap_err(),
            DomainError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let hash = bcrypt::hash("correct-horse", 4).unwrap();
        let stored = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            phone: None,
            password_hash: hash,
            role: Role::User,
            status: AccountStatus::Active,
            kyc_status: KycStatus::Verified,
            birth_year: 1990,
            city: None,
            premium_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let expected_id = stored.id;

        let mut repo = MockUsersRepository::new();
        let returned = stored.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(returned.clone())));

        let session_keys = keys();
        let svc = Service::new(Arc::new(repo), session_keys.clone());

        let (token, user) = svc
            .login(LoginCredentials {
                email: Some("ana@example.com".to_string()),
                phone: None,
                password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, expected_id);
        let claims = session_keys.verify(&token).unwrap();
        assert_eq!(claims.sub, expected_id);
        assert_eq!(claims.role, "USER");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_user() {
        let hash = bcrypt::hash("correct-horse", 4).unwrap();
        let stored = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            phone: None,
            password_hash: hash,
            role: Role::User,
            status: AccountStatus::Active,
            kyc_status: KycStatus::Verified,
            birth_year: 1990,
            city: None,
            premium_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut repo = MockUsersRepository::new();
        let returned = stored.clone();
        repo.expect_find_by_email()
            .returning(move |email| {
                if email == "ana@example.com" {
                    Ok(Some(returned.clone()))
                } else {
                    Ok(None)
                }
            });

        let svc = Service::new(Arc::new(repo), keys());

        let err = svc
            .login(LoginCredentials {
                email: Some("ana@example.com".to_string()),
                phone: None,
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));

        let err = svc
            .login(LoginCredentials {
                email: Some("nobody@example.com".to_string()),
                phone: None,
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_requires_exactly_one_identifier() {
        let repo = MockUsersRepository::new();
        let svc = Service::new(Arc::new(repo), keys());

        let err = svc
            .login(LoginCredentials {
                email: Some("a@b.c".to_string()),
                phone: Some("+123".to_string()),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
