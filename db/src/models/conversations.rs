use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A support thread between one customer and the support staff.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning customer.
    pub user_id: i64,

    pub title: String,

    pub status: ConversationStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "conversation_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConversationStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::conversation_messages::Entity")]
    Messages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::conversation_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, user_id: i64, title: &str) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_owned()),
            status: Set(ConversationStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn get_by_id(db: &DbConn, conversation_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(conversation_id).one(db).await
    }

    /// Conversations newest-activity first with their owner, optionally narrowed to
    /// one owner and/or status.
    pub async fn find_filtered(
        db: &DbConn,
        owner_id: Option<i64>,
        status: Option<ConversationStatus>,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr> {
        let mut query = Entity::find().find_also_related(super::user::Entity);

        if let Some(owner_id) = owner_id {
            query = query.filter(Column::UserId.eq(owner_id));
        }
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn set_status(
        db: &DbConn,
        conversation_id: i64,
        status: ConversationStatus,
    ) -> Result<Model, DbErr> {
        let model = match Entity::find_by_id(conversation_id).one(db).await? {
            Some(m) => m,
            None => {
                return Err(DbErr::RecordNotFound(
                    "Conversation not found".to_string(),
                ));
            }
        };

        let mut active_model: ActiveModel = model.into();

        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        active_model.update(db).await
    }

    /// Bumps `updated_at` so the conversation sorts to the top of inbox lists.
    pub async fn touch(db: &DbConn, conversation_id: i64) -> Result<Model, DbErr> {
        let model = match Entity::find_by_id(conversation_id).one(db).await? {
            Some(m) => m,
            None => {
                return Err(DbErr::RecordNotFound(
                    "Conversation not found".to_string(),
                ));
            }
        };

        let mut active_model: ActiveModel = model.into();
        active_model.updated_at = Set(Utc::now());
        active_model.update(db).await
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    pub fn is_open(&self) -> bool {
        self.status == ConversationStatus::Open
    }
}
