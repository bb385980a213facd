//! Presentation logic for the staff chat dashboard.

use crate::types::{Conversation, ConversationFilter, ConversationStatus, ConversationSummary, Participant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    fn as_status(self) -> Option<ConversationStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Open => Some(ConversationStatus::Open),
            StatusFilter::Closed => Some(ConversationStatus::Closed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub status: StatusFilter,
    pub customer: Option<i64>,
}

impl DashboardFilter {
    pub fn matches(&self, summary: &ConversationSummary) -> bool {
        let status_ok = self
            .status
            .as_status()
            .is_none_or(|s| summary.conversation.status == s);
        let customer_ok = self
            .customer
            .is_none_or(|id| summary.conversation.user_id == id);
        status_ok && customer_ok
    }

    /// Filters an already-loaded list, keeping its order.
    pub fn apply<'a>(&self, conversations: &'a [ConversationSummary]) -> Vec<&'a ConversationSummary> {
        conversations.iter().filter(|c| self.matches(c)).collect()
    }

    /// The same filter expressed as a server-side query.
    pub fn to_query(&self) -> ConversationFilter {
        ConversationFilter {
            user_id: self.customer,
            status: self.status.as_status(),
        }
    }
}

/// Whether the row gets the unread marker.
pub fn needs_attention(summary: &ConversationSummary) -> bool {
    summary.has_unread
}

/// Whether the message input should be enabled for this viewer.
pub fn composer_enabled(conversation: &Conversation, viewer_is_admin: bool) -> bool {
    viewer_is_admin || conversation.status == ConversationStatus::Open
}

/// Distinct conversation owners for the customer dropdown, sorted by name.
pub fn customer_options(conversations: &[ConversationSummary]) -> Vec<Participant> {
    let mut owners: Vec<Participant> = Vec::new();
    for owner in conversations.iter().filter_map(|c| c.owner.as_ref()) {
        if !owners.iter().any(|o| o.id == owner.id) {
            owners.push(owner.clone());
        }
    }
    owners.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
    owners
}
