use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, JoinType, PaginatorTrait, QueryOrder, QuerySelect, Select,
    entity::prelude::*,
};
use serde::{Deserialize, Serialize};

use super::{conversations, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "conversation_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub conversation_id: i64,
    pub sender_id: i64,

    pub content: String,

    /// Set once a party other than the sender has fetched the thread.
    pub read: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::conversations::Entity",
        from = "Column::ConversationId",
        to = "super::conversations::Column::Id",
        on_delete = "Cascade"
    )]
    Conversation,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id"
    )]
    Sender,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversation.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Whose unread messages are being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreadScope {
    /// A customer reading their own conversations: staff replies count.
    Customer(i64),
    /// Support staff: customer-sent messages count, optionally for one customer only.
    Staff { owner_id: Option<i64> },
}

impl Model {
    pub async fn create(
        db: &DbConn,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            conversation_id: Set(conversation_id),
            sender_id: Set(sender_id),
            content: Set(content.to_owned()),
            read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Every message in the thread with its sender, oldest first.
    pub async fn find_all_with_sender(
        db: &DbConn,
        conversation_id: i64,
    ) -> Result<Vec<(Model, Option<user::Model>)>, DbErr> {
        Entity::find()
            .find_also_related(user::Entity)
            .filter(Column::ConversationId.eq(conversation_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Latest message of each listed conversation, keyed by conversation id.
    ///
    /// Ids grow with insertion order, so the highest id in a thread is its newest message.
    pub async fn find_latest_for_conversations(
        db: &DbConn,
        conversation_ids: &[i64],
    ) -> Result<HashMap<i64, (Model, Option<user::Model>)>, DbErr> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let latest_ids: Vec<i64> = Entity::find()
            .select_only()
            .column_as(Expr::col((Entity, Column::Id)).max(), "latest_id")
            .filter(Column::ConversationId.is_in(conversation_ids.iter().copied()))
            .group_by(Column::ConversationId)
            .into_tuple()
            .all(db)
            .await?;

        let rows = Entity::find()
            .find_also_related(user::Entity)
            .filter(Column::Id.is_in(latest_ids))
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(message, sender)| (message.conversation_id, (message, sender)))
            .collect())
    }

    /// Flags as read every unread message in the thread that `reader_id` did not
    /// send, up to and including message `up_to`.
    ///
    /// `up_to` is the newest message the reader was actually handed, so a reply
    /// landing after the fetch stays unread. Safe to race: two readers flipping
    /// the same rows both end with `read = true`.
    pub async fn mark_read_for_reader(
        db: &DbConn,
        conversation_id: i64,
        reader_id: i64,
        up_to: i64,
    ) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::Read, Expr::value(true))
            .filter(Column::ConversationId.eq(conversation_id))
            .filter(Column::SenderId.ne(reader_id))
            .filter(Column::Id.lte(up_to))
            .filter(Column::Read.eq(false))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    /// Counts unread messages for `scope`, across all visible conversations or a single one.
    pub async fn count_unread(
        db: &DbConn,
        scope: UnreadScope,
        conversation_id: Option<i64>,
    ) -> Result<u64, DbErr> {
        let mut query = unread_query(scope);

        if let Some(conversation_id) = conversation_id {
            query = query.filter(Column::ConversationId.eq(conversation_id));
        }

        query.count(db).await
    }

    /// Unread counts for `scope` grouped by conversation. Conversations with
    /// nothing unread are absent from the map.
    pub async fn count_unread_by_conversation(
        db: &DbConn,
        scope: UnreadScope,
        conversation_ids: &[i64],
    ) -> Result<HashMap<i64, u64>, DbErr> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = unread_query(scope)
            .filter(Column::ConversationId.is_in(conversation_ids.iter().copied()))
            .select_only()
            .column(Column::ConversationId)
            .column_as(Expr::col((Entity, Column::Id)).count(), "unread")
            .group_by(Column::ConversationId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(conversation_id, unread)| (conversation_id, unread as u64))
            .collect())
    }
}

fn unread_query(scope: UnreadScope) -> Select<Entity> {
    let sender = Expr::col((Entity, Column::SenderId));
    let owner = (conversations::Entity, conversations::Column::UserId);

    let query = Entity::find()
        .join(JoinType::InnerJoin, Relation::Conversation.def())
        .filter(Column::Read.eq(false));

    match scope {
        UnreadScope::Customer(user_id) => query
            .filter(conversations::Column::UserId.eq(user_id))
            .filter(sender.not_equals(owner)),
        UnreadScope::Staff { owner_id } => {
            let query = query.filter(sender.equals(owner));
            match owner_id {
                Some(owner_id) => query.filter(conversations::Column::UserId.eq(owner_id)),
                None => query,
            }
        }
    }
}
