//! SeaORM-backed repository implementation for the billing domain port.
//!
//! Ledger transitions and their user-row cascades run inside one database
//! transaction each; the users table is reached through the accounts
//! module's entity so both writes share the connection.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use accounts::infra::storage::entity as users;

use crate::contract::{Subscription, SubscriptionStatus};
use crate::domain::repo::BillingRepository;
use crate::infra::storage::entity::{subscriptions, webhook_events};

pub struct SeaOrmBillingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBillingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_subscription(m: subscriptions::Model) -> anyhow::Result<Subscription> {
    Ok(Subscription {
        id: m.id,
        user_id: m.user_id,
        plan: m.plan.parse().map_err(anyhow::Error::msg).context("plan")?,
        status: m
            .status
            .parse()
            .map_err(anyhow::Error::msg)
            .context("status")?,
        renews_at: m.renews_at,
        provider: m.provider,
        provider_ref: m.provider_ref,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

#[async_trait::async_trait]
impl BillingRepository for SeaOrmBillingRepository {
    async fn find_active_or_past_due(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Subscription>> {
        let found = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::Status.is_in([
                SubscriptionStatus::Active.as_str(),
                SubscriptionStatus::PastDue.as_str(),
            ]))
            .one(&self.db)
            .await
            .context("find_active_or_past_due failed")?;
        found.map(model_to_subscription).transpose()
    }

    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> anyhow::Result<Option<Subscription>> {
        let found = subscriptions::Entity::find()
            .filter(subscriptions::Column::ProviderRef.eq(provider_ref))
            .one(&self.db)
            .await
            .context("find_by_provider_ref failed")?;
        found.map(model_to_subscription).transpose()
    }

    async fn create_with_premium(&self, subscription: Subscription) -> anyhow::Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .context("create_with_premium: begin failed")?;

        let renews_at = subscription.renews_at;
        let user_id = subscription.user_id;

        let row = subscriptions::ActiveModel {
            id: Set(subscription.id),
            user_id: Set(subscription.user_id),
            plan: Set(subscription.plan.as_str().to_string()),
            status: Set(subscription.status.as_str().to_string()),
            renews_at: Set(subscription.renews_at),
            provider: Set(subscription.provider),
            provider_ref: Set(subscription.provider_ref),
            created_at: Set(subscription.created_at),
            updated_at: Set(subscription.updated_at),
        };
        let _ = row
            .insert(&txn)
            .await
            .context("create_with_premium: ledger insert failed")?;

        let premium = users::ActiveModel {
            id: Set(user_id),
            premium_until: Set(Some(renews_at)),
            ..Default::default()
        };
        let _ = premium
            .update(&txn)
            .await
            .context("create_with_premium: premium update failed")?;

        txn.commit()
            .await
            .context("create_with_premium: commit failed")?;
        Ok(())
    }

    async fn mark_renewed(
        &self,
        id: Uuid,
        user_id: Uuid,
        renews_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let txn = self.db.begin().await.context("mark_renewed: begin failed")?;

        let ledger = subscriptions::ActiveModel {
            id: Set(id),
            status: Set(SubscriptionStatus::Active.as_str().to_string()),
            renews_at: Set(renews_at),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        let _ = ledger
            .update(&txn)
            .await
            .context("mark_renewed: ledger update failed")?;

        let premium = users::ActiveModel {
            id: Set(user_id),
            premium_until: Set(Some(renews_at)),
            ..Default::default()
        };
        let _ = premium
            .update(&txn)
            .await
            .context("mark_renewed: premium update failed")?;

        txn.commit().await.context("mark_renewed: commit failed")?;
        Ok(())
    }

    async fn mark_past_due(&self, id: Uuid) -> anyhow::Result<()> {
        let ledger = subscriptions::ActiveModel {
            id: Set(id),
            status: Set(SubscriptionStatus::PastDue.as_str().to_string()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        let _ = ledger
            .update(&self.db)
            .await
            .context("mark_past_due failed")?;
        Ok(())
    }

    async fn mark_canceled(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .context("mark_canceled: begin failed")?;

        let ledger = subscriptions::ActiveModel {
            id: Set(id),
            status: Set(SubscriptionStatus::Canceled.as_str().to_string()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        let _ = ledger
            .update(&txn)
            .await
            .context("mark_canceled: ledger update failed")?;

        let premium = users::ActiveModel {
            id: Set(user_id),
            premium_until: Set(None),
            ..Default::default()
        };
        let _ = premium
            .update(&txn)
            .await
            .context("mark_canceled: premium clear failed")?;

        txn.commit().await.context("mark_canceled: commit failed")?;
        Ok(())
    }

    async fn record_event(&self, event_id: &str) -> anyhow::Result<bool> {
        let row = webhook_events::ActiveModel {
            event_id: Set(event_id.to_string()),
            received_at: Set(Utc::now()),
        };
        let insert = webhook_events::Entity::insert(row)
            .on_conflict(
                OnConflict::column(webhook_events::Column::EventId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;
        match insert {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e).context("record_event failed"),
        }
    }
}
