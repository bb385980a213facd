//! Wire shapes of the `/api/chat` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Closed,
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConversationStatus::Open => "open",
            ConversationStatus::Closed => "closed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
}

/// Server error category carried in failed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorKind {
    Unauthorized,
    AccessDenied,
    NotFound,
    ValidationError,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub sender: Option<Participant>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub owner: Option<Participant>,
    pub last_message: Option<Message>,
    pub unread_count: u64,
    pub has_unread: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
    pub unread: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentMessage {
    pub message: Message,
    pub unread: u64,
}

/// Query for the conversation list. Owner narrowing only applies to staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    pub user_id: Option<i64>,
    pub status: Option<ConversationStatus>,
}

impl ConversationFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.user_id.is_none() && self.status.is_none()
    }

    /// Whether a list fetched with this filter would include `conversation`.
    pub fn admits(&self, conversation: &Conversation) -> bool {
        self.status.is_none_or(|s| conversation.status == s)
            && self.user_id.is_none_or(|id| conversation.user_id == id)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id", user_id.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[allow(dead_code)]
    pub success: bool,
    pub data: T,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorData {
    pub kind: ErrorKind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnreadData {
    pub unread: u64,
}
