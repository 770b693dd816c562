//! SeaORM-backed repository implementation for the profiles domain port.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use accounts::infra::storage::entity as users;

use crate::contract::{BrowseCriteria, Profile, ProfileCard};
use crate::domain::repo::ProfilesRepository;
use crate::infra::storage::entity::{ActiveModel, Column, Entity as Profiles, Model, Relation};

pub struct SeaOrmProfilesRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfilesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_profile(m: Model) -> Profile {
    Profile {
        id: m.id,
        user_id: m.user_id,
        nickname: m.nickname,
        bio: m.bio,
        gender: m.gender,
        interests: m.interests,
        city: m.city,
        visibility: m.visibility,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_card(profile: Model, owner: users::Model) -> ProfileCard {
    ProfileCard {
        profile: model_to_profile(profile),
        birth_year: owner.birth_year,
        premium_until: owner.premium_until,
    }
}

/// Only ACTIVE + KYC-verified owners are browsable; the criteria bounds
/// were validated by the builder before they got here.
fn browse_filters<S>(mut select: S, criteria: &BrowseCriteria) -> S
where
    S: QueryFilter,
{
    select = select
        .filter(users::Column::Status.eq("ACTIVE"))
        .filter(users::Column::KycStatus.eq("VERIFIED"));
    if let Some(ref gender) = criteria.gender {
        select = select.filter(Column::Gender.eq(gender.as_str()));
    }
    if let Some(ref city) = criteria.city {
        select = select.filter(Column::City.eq(city.as_str()));
    }
    if let Some(max) = criteria.birth_year_max {
        select = select.filter(users::Column::BirthYear.lte(max));
    }
    if let Some(min) = criteria.birth_year_min {
        select = select.filter(users::Column::BirthYear.gte(min));
    }
    select
}

fn count_query(criteria: &BrowseCriteria) -> Select<Profiles> {
    browse_filters(
        Profiles::find().join(JoinType::InnerJoin, Relation::User.def()),
        criteria,
    )
}

#[async_trait::async_trait]
impl ProfilesRepository for SeaOrmProfilesRepository {
    async fn find_card_by_id(&self, id: Uuid) -> anyhow::Result<Option<ProfileCard>> {
        let found = Profiles::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find_card_by_id failed")?;
        Ok(found.and_then(|(profile, owner)| owner.map(|o| to_card(profile, o))))
    }

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let found = Profiles::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find_by_user failed")?;
        Ok(found.map(model_to_profile))
    }

    async fn nickname_exists(&self, nickname: &str) -> anyhow::Result<bool> {
        let count = Profiles::find()
            .filter(Column::Nickname.eq(nickname))
            .count(&self.db)
            .await
            .context("nickname_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, profile: Profile) -> anyhow::Result<()> {
        let m = ActiveModel {
            id: Set(profile.id),
            user_id: Set(profile.user_id),
            nickname: Set(profile.nickname),
            bio: Set(profile.bio),
            gender: Set(profile.gender),
            interests: Set(profile.interests),
            city: Set(profile.city),
            visibility: Set(profile.visibility),
            created_at: Set(profile.created_at),
            updated_at: Set(profile.updated_at),
        };
        let _ = m.insert(&self.db).await.context("insert failed")?;
        Ok(())
    }

    async fn list_page(
        &self,
        criteria: &BrowseCriteria,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<ProfileCard>, u64)> {
        let total = count_query(criteria)
            .count(&self.db)
            .await
            .context("browse count failed")?;

        let rows = browse_filters(
            Profiles::find().find_also_related(users::Entity),
            criteria,
        )
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(&self.db)
        .await
        .context("browse page failed")?;

        let cards = rows
            .into_iter()
            .filter_map(|(profile, owner)| owner.map(|o| to_card(profile, o)))
            .collect();
        Ok((cards, total))
    }
}
