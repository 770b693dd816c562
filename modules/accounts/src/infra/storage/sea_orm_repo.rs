//! SeaORM-backed repository implementation for the accounts domain port.

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::contract::User;
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{Column, Entity as Users};
use crate::infra::storage::mapper::{entity_to_user, user_to_active_model};

pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = Users::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id failed")?;
        found.map(entity_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let found = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find_by_email failed")?;
        found.map(entity_to_user).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        let found = Users::find()
            .filter(Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find_by_phone failed")?;
        found.map(entity_to_user).transpose()
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = Users::find()
            .filter(Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn phone_exists(&self, phone: &str) -> anyhow::Result<bool> {
        let count = Users::find()
            .filter(Column::Phone.eq(phone))
            .count(&self.db)
            .await
            .context("phone_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, user: User) -> anyhow::Result<()> {
        let _ = user_to_active_model(user)
            .insert(&self.db)
            .await
            .context("insert failed")?;
        Ok(())
    }
}
