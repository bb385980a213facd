//! Who may do what with a support conversation.
//!
//! Every chat operation asks [`permissions`] instead of branching on roles
//! itself. Status changes are staff-only in both directions, and a closed
//! conversation no longer accepts customer messages.

use db::models::conversation_messages::UnreadScope;
use db::models::conversations::Model as ConversationModel;

/// The identity performing an operation, as asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub admin: bool,
}

impl Actor {
    pub fn customer(id: i64) -> Self {
        Self { id, admin: false }
    }

    pub fn admin(id: i64) -> Self {
        Self { id, admin: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub can_read: bool,
    pub can_write: bool,
    pub can_change_status: bool,
}

impl Permissions {
    pub const NONE: Permissions = Permissions {
        can_read: false,
        can_write: false,
        can_change_status: false,
    };

    pub const ALL: Permissions = Permissions {
        can_read: true,
        can_write: true,
        can_change_status: true,
    };
}

pub fn permissions(actor: Actor, conversation: &ConversationModel) -> Permissions {
    if actor.admin {
        return Permissions::ALL;
    }

    if !conversation.is_owner(actor.id) {
        return Permissions::NONE;
    }

    Permissions {
        can_read: true,
        can_write: conversation.is_open(),
        can_change_status: false,
    }
}

/// Which messages count as unread for `actor`.
///
/// Customers are always scoped to their own conversations; `owner_filter` only
/// narrows the staff view.
pub fn unread_scope(actor: Actor, owner_filter: Option<i64>) -> UnreadScope {
    if actor.admin {
        UnreadScope::Staff {
            owner_id: owner_filter,
        }
    } else {
        UnreadScope::Customer(actor.id)
    }
}

/// Owner restriction applied when listing conversations.
pub fn visible_owner(actor: Actor, owner_filter: Option<i64>) -> Option<i64> {
    if actor.admin {
        owner_filter
    } else {
        Some(actor.id)
    }
}
