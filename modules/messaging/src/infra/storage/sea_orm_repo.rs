//! SeaORM-backed repository implementation for the messaging domain port.

use std::collections::HashMap;

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use profiles::infra::storage::entity as profile_rows;

use crate::contract::{Conversation, ConversationSummary, LastMessage, Message, MessageWithSender};
use crate::domain::repo::MessagingRepository;
use crate::infra::storage::entity::{conversations, messages};

pub struct SeaOrmMessagingRepository {
    db: DatabaseConnection,
}

impl SeaOrmMessagingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn nickname_of<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> anyhow::Result<Option<String>> {
        let profile = profile_rows::Entity::find()
            .filter(profile_rows::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .context("nickname lookup failed")?;
        Ok(profile.map(|p| p.nickname))
    }
}

fn to_conversation(m: conversations::Model) -> Conversation {
    Conversation {
        id: m.id,
        user_a: m.user_a,
        user_b: m.user_b,
        last_message_at: m.last_message_at,
        created_at: m.created_at,
    }
}

fn to_message(m: messages::Model) -> Message {
    Message {
        id: m.id,
        conversation_id: m.conversation_id,
        sender_id: m.sender_id,
        content: m.content,
        media_url: m.media_url,
        created_at: m.created_at,
    }
}

fn pair_condition(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(conversations::Column::UserA.eq(a))
                .add(conversations::Column::UserB.eq(b)),
        )
        .add(
            Condition::all()
                .add(conversations::Column::UserA.eq(b))
                .add(conversations::Column::UserB.eq(a)),
        )
}

#[async_trait::async_trait]
impl MessagingRepository for SeaOrmMessagingRepository {
    async fn list_conversations(&self, user_id: Uuid) -> anyhow::Result<Vec<ConversationSummary>> {
        let rows = conversations::Entity::find()
            .filter(
                Condition::any()
                    .add(conversations::Column::UserA.eq(user_id))
                    .add(conversations::Column::UserB.eq(user_id)),
            )
            .order_by_desc(conversations::Column::LastMessageAt)
            .all(&self.db)
            .await
            .context("list_conversations failed")?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let conversation = to_conversation(row);
            let other_user_id = conversation.other_participant(user_id);
            let other_nickname = Self::nickname_of(&self.db, other_user_id).await?;

            let latest = messages::Entity::find()
                .filter(messages::Column::ConversationId.eq(conversation.id))
                .order_by_desc(messages::Column::CreatedAt)
                .one(&self.db)
                .await
                .context("latest message lookup failed")?;

            let last_message = match latest {
                Some(m) => Some(LastMessage {
                    sender_nickname: Self::nickname_of(&self.db, m.sender_id).await?,
                    content: m.content,
                    created_at: m.created_at,
                }),
                None => None,
            };

            summaries.push(ConversationSummary {
                id: conversation.id,
                other_user_id,
                other_nickname,
                last_message,
                last_message_at: conversation.last_message_at,
            });
        }
        Ok(summaries)
    }

    async fn find_conversation(&self, id: Uuid) -> anyhow::Result<Option<Conversation>> {
        let found = conversations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_conversation failed")?;
        Ok(found.map(to_conversation))
    }

    async fn find_conversation_for_pair(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> anyhow::Result<Option<Conversation>> {
        let found = conversations::Entity::find()
            .filter(pair_condition(a, b))
            .one(&self.db)
            .await
            .context("find_conversation_for_pair failed")?;
        Ok(found.map(to_conversation))
    }

    async fn create_conversation(&self, conversation: Conversation) -> anyhow::Result<()> {
        let m = conversations::ActiveModel {
            id: Set(conversation.id),
            user_a: Set(conversation.user_a),
            user_b: Set(conversation.user_b),
            last_message_at: Set(conversation.last_message_at),
            created_at: Set(conversation.created_at),
        };
        let _ = m
            .insert(&self.db)
            .await
            .context("create_conversation failed")?;
        Ok(())
    }

    async fn insert_message(&self, message: Message) -> anyhow::Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .context("insert_message: begin failed")?;

        let row = messages::ActiveModel {
            id: Set(message.id),
            conversation_id: Set(message.conversation_id),
            sender_id: Set(message.sender_id),
            content: Set(message.content),
            media_url: Set(message.media_url),
            created_at: Set(message.created_at),
        };
        let _ = row
            .insert(&txn)
            .await
            .context("insert_message: insert failed")?;

        let bump = conversations::ActiveModel {
            id: Set(message.conversation_id),
            last_message_at: Set(Some(message.created_at)),
            ..Default::default()
        };
        let _ = bump
            .update(&txn)
            .await
            .context("insert_message: conversation bump failed")?;

        txn.commit().await.context("insert_message: commit failed")?;
        Ok(())
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
    ) -> anyhow::Result<Vec<MessageWithSender>> {
        let rows = messages::Entity::find()
            .filter(messages::Column::ConversationId.eq(conversation_id))
            .order_by_asc(messages::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list_messages failed")?;

        let mut nicknames: HashMap<Uuid, Option<String>> = HashMap::new();
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let sender_nickname = match nicknames.get(&row.sender_id) {
                Some(hit) => hit.clone(),
                None => {
                    let looked_up = Self::nickname_of(&self.db, row.sender_id).await?;
                    nicknames.insert(row.sender_id, looked_up.clone());
                    looked_up
                }
            };
            out.push(MessageWithSender {
                message: to_message(row),
                sender_nickname,
            });
        }
        Ok(out)
    }
}
