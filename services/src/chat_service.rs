use std::str::FromStr;

use chrono::{DateTime, Utc};
use db::models::{
    conversation_messages::Model as MessageModel,
    conversations::{ConversationStatus, Model as ConversationModel},
    user::{Model as UserModel, UserRole},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::chat_policy::{self, Actor};
use crate::error::ServiceError;

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_CONTENT_LENGTH: usize = 5000;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationFilter {
    /// Narrow to one customer. Ignored for customers, who only ever see their own.
    pub user_id: Option<i64>,
    pub status: Option<ConversationStatus>,
}

/// Display identity of a chat participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub role: UserRole,
}

impl From<UserModel> for UserView {
    fn from(user: UserModel) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            name: user.name,
            image: user.image,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub conversation_id: i64,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: Option<UserView>,
    pub sender_id: i64,
}

impl MessageView {
    fn new(message: MessageModel, sender: Option<UserModel>) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            content: message.content,
            read: message.read,
            created_at: message.created_at,
            sender: sender.map(UserView::from),
            sender_id: message.sender_id,
        }
    }
}

/// One row of the inbox.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: ConversationModel,
    pub owner: Option<UserView>,
    pub last_message: Option<MessageView>,
    pub unread_count: u64,
    pub has_unread: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationThread {
    pub conversation: ConversationModel,
    pub messages: Vec<MessageView>,
    /// The reader's total unread count after this fetch marked the thread read.
    pub unread: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentMessage {
    pub message: MessageView,
    pub unread: u64,
}

pub struct ChatService;

impl ChatService {
    pub async fn list_conversations(
        db: &DatabaseConnection,
        actor: Actor,
        filter: ConversationFilter,
    ) -> Result<Vec<ConversationSummary>, ServiceError> {
        let (actor, _) = resolve_actor(db, actor).await?;

        let owner_id = chat_policy::visible_owner(actor, filter.user_id);
        let conversations = ConversationModel::find_filtered(db, owner_id, filter.status).await?;
        let ids: Vec<i64> = conversations.iter().map(|(c, _)| c.id).collect();

        let scope = chat_policy::unread_scope(actor, None);
        let mut latest = MessageModel::find_latest_for_conversations(db, &ids).await?;
        let unread = MessageModel::count_unread_by_conversation(db, scope, &ids).await?;

        Ok(conversations
            .into_iter()
            .map(|(conversation, owner)| {
                let last_message = latest
                    .remove(&conversation.id)
                    .map(|(message, sender)| MessageView::new(message, sender));
                let unread_count = unread.get(&conversation.id).copied().unwrap_or(0);

                ConversationSummary {
                    conversation,
                    owner: owner.map(UserView::from),
                    last_message,
                    unread_count,
                    has_unread: unread_count > 0,
                }
            })
            .collect())
    }

    pub async fn create_conversation(
        db: &DatabaseConnection,
        actor: Actor,
        title: &str,
    ) -> Result<ConversationModel, ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation("Title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }

        let (actor, _) = resolve_actor(db, actor).await?;

        let conversation = ConversationModel::create(db, actor.id, title).await?;
        tracing::info!(
            conversation_id = conversation.id,
            user_id = actor.id,
            "conversation opened"
        );

        Ok(conversation)
    }

    /// Returns the thread as it was, then marks read everything in it the actor
    /// did not send. Messages arriving after the fetch stay unread.
    pub async fn list_messages(
        db: &DatabaseConnection,
        conversation_id: i64,
        actor: Actor,
    ) -> Result<ConversationThread, ServiceError> {
        let (actor, _) = resolve_actor(db, actor).await?;
        let conversation = find_conversation(db, conversation_id).await?;

        if !chat_policy::permissions(actor, &conversation).can_read {
            tracing::warn!(conversation_id, user_id = actor.id, "read denied");
            return Err(ServiceError::AccessDenied(
                "You do not have access to this conversation".into(),
            ));
        }

        let messages: Vec<MessageView> = MessageModel::find_all_with_sender(db, conversation_id)
            .await?
            .into_iter()
            .map(|(message, sender)| MessageView::new(message, sender))
            .collect();

        if let Some(up_to) = messages.iter().map(|m| m.id).max() {
            let flipped =
                MessageModel::mark_read_for_reader(db, conversation_id, actor.id, up_to).await?;
            if flipped > 0 {
                tracing::debug!(conversation_id, user_id = actor.id, flipped, "messages marked read");
            }
        }

        let unread =
            MessageModel::count_unread(db, chat_policy::unread_scope(actor, None), None).await?;

        Ok(ConversationThread {
            conversation,
            messages,
            unread,
        })
    }

    pub async fn send_message(
        db: &DatabaseConnection,
        conversation_id: i64,
        actor: Actor,
        content: &str,
    ) -> Result<SentMessage, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::Validation("Message content is required".into()));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Message must be at most {MAX_CONTENT_LENGTH} characters"
            )));
        }

        let (actor, sender) = resolve_actor(db, actor).await?;
        let conversation = find_conversation(db, conversation_id).await?;

        if !chat_policy::permissions(actor, &conversation).can_write {
            tracing::warn!(
                conversation_id,
                user_id = actor.id,
                status = %conversation.status,
                "write denied"
            );
            return Err(ServiceError::AccessDenied(if conversation.is_owner(actor.id) {
                "This conversation is closed".into()
            } else {
                "You do not have access to this conversation".into()
            }));
        }

        let message = MessageModel::create(db, conversation_id, actor.id, content).await?;
        ConversationModel::touch(db, conversation_id).await?;

        tracing::info!(
            conversation_id,
            message_id = message.id,
            user_id = actor.id,
            "message posted"
        );

        let unread =
            MessageModel::count_unread(db, chat_policy::unread_scope(actor, None), None).await?;

        Ok(SentMessage {
            message: MessageView::new(message, Some(sender)),
            unread,
        })
    }

    pub async fn update_status(
        db: &DatabaseConnection,
        conversation_id: i64,
        actor: Actor,
        status: &str,
    ) -> Result<ConversationModel, ServiceError> {
        let status = ConversationStatus::from_str(status.trim())
            .map_err(|_| ServiceError::Validation(format!("Invalid status '{status}'")))?;

        let (actor, _) = resolve_actor(db, actor).await?;
        let conversation = find_conversation(db, conversation_id).await?;

        if !chat_policy::permissions(actor, &conversation).can_change_status {
            tracing::warn!(conversation_id, user_id = actor.id, %status, "status change denied");
            return Err(ServiceError::AccessDenied(
                "Only support staff can change a conversation's status".into(),
            ));
        }

        if conversation.status == status {
            return Ok(conversation);
        }

        let updated = ConversationModel::set_status(db, conversation_id, status).await?;
        tracing::info!(conversation_id, user_id = actor.id, %status, "conversation status changed");

        Ok(updated)
    }

    /// Total unread messages for `actor`. `user_id` narrows the staff view to one customer.
    pub async fn unread_count(
        db: &DatabaseConnection,
        actor: Actor,
        user_id: Option<i64>,
    ) -> Result<u64, ServiceError> {
        let (actor, _) = resolve_actor(db, actor).await?;
        let scope = chat_policy::unread_scope(actor, user_id);
        Ok(MessageModel::count_unread(db, scope, None).await?)
    }
}

async fn find_conversation(
    db: &DatabaseConnection,
    conversation_id: i64,
) -> Result<ConversationModel, ServiceError> {
    ConversationModel::get_by_id(db, conversation_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Conversation not found".into()))
}

/// Looks the caller up in `users`. A token naming no user is Unauthorized, and
/// the stored `admin` flag decides the role whatever the token claims.
async fn resolve_actor(
    db: &DatabaseConnection,
    claimed: Actor,
) -> Result<(Actor, UserModel), ServiceError> {
    let user = UserModel::get_by_id(db, claimed.id)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Unknown user".into()))?;

    if user.admin != claimed.admin {
        tracing::warn!(
            user_id = user.id,
            claimed_admin = claimed.admin,
            "token role disagrees with stored role"
        );
    }

    let actor = Actor {
        id: user.id,
        admin: user.admin,
    };
    Ok((actor, user))
}
