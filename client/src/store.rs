//! Client-side chat state.
//!
//! Fetches may complete in any order. Each one takes a ticket from a
//! per-resource sequence (the conversation list, or one conversation's
//! messages) and its response is applied only if no later ticket for the same
//! resource has been applied already. Message responses are additionally
//! dropped once the user has moved to another conversation.
//!
//! The state mutex is never held across a network call.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ChatApi;
use crate::error::ClientError;
use crate::types::{Conversation, ConversationFilter, ConversationStatus, ConversationSummary, Message};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadSummary {
    pub total: u64,
    pub conversations_with_unread: usize,
}

/// Point-in-time copy of the store, for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub conversations: Vec<ConversationSummary>,
    pub messages: Vec<Message>,
    pub active_conversation: Option<i64>,
    pub loading: bool,
    pub unread: UnreadSummary,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Resource {
    ConversationList,
    Messages(i64),
}

#[derive(Debug, Default)]
struct State {
    view: ChatSnapshot,
    filter: ConversationFilter,
    in_flight: usize,
    next_ticket: u64,
    applied: HashMap<Resource, u64>,
}

impl State {
    fn issue(&mut self) -> u64 {
        self.next_ticket += 1;
        self.in_flight += 1;
        self.view.loading = true;
        self.next_ticket
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.view.loading = self.in_flight > 0;
    }

    /// Claims `resource` for `ticket` unless a newer response already landed.
    fn accept(&mut self, resource: Resource, ticket: u64) -> bool {
        let applied = self.applied.entry(resource).or_insert(0);
        if ticket > *applied {
            *applied = ticket;
            true
        } else {
            false
        }
    }

    fn fail(&mut self, err: &ClientError) {
        tracing::warn!(error = %err, "chat request failed");
        self.view.last_error = Some(err.to_string());
    }

    fn resort(&mut self) {
        sort_conversations(&mut self.view.conversations);
        self.view.unread.conversations_with_unread = self
            .view
            .conversations
            .iter()
            .filter(|c| c.has_unread)
            .count();
    }
}

/// Newest activity first; ties broken by id, newest first.
pub fn sort_conversations(conversations: &mut [ConversationSummary]) {
    conversations.sort_by(|a, b| {
        b.conversation
            .updated_at
            .cmp(&a.conversation.updated_at)
            .then(b.conversation.id.cmp(&a.conversation.id))
    });
}

/// Oldest first; ties broken by id.
pub fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

pub struct ChatStore {
    api: Arc<dyn ChatApi>,
    state: Mutex<State>,
}

impl ChatStore {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            api,
            state: Mutex::new(State::default()),
        }
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        self.state.lock().await.view.clone()
    }

    /// Loads the conversation list and remembers `filter` for later refreshes.
    ///
    /// The unread total is recomputed with it. An unfiltered list covers every
    /// conversation the user can see, so the per-row counts add up to the total;
    /// a filtered one does not, and the total is fetched separately.
    pub async fn fetch_conversations(&self, filter: ConversationFilter) -> Result<(), ClientError> {
        let ticket = {
            let mut state = self.state.lock().await;
            state.filter = filter;
            state.issue()
        };

        let result = self.api.list_conversations(filter).await;

        let needs_total = {
            let mut state = self.state.lock().await;
            state.settle();
            match result {
                Ok(conversations) => {
                    if state.accept(Resource::ConversationList, ticket) {
                        state.view.conversations = conversations;
                        state.view.last_error = None;
                        if filter.is_unfiltered() {
                            state.view.unread.total =
                                state.view.conversations.iter().map(|c| c.unread_count).sum();
                        }
                        state.resort();
                        !filter.is_unfiltered()
                    } else {
                        tracing::debug!(ticket, "dropping stale conversation list");
                        false
                    }
                }
                Err(err) => {
                    state.fail(&err);
                    return Err(err);
                }
            }
        };

        if needs_total {
            self.fetch_unread().await?;
        }
        Ok(())
    }

    /// Creates a conversation and shows it if the current list filter admits it.
    pub async fn create_conversation(&self, title: &str) -> Result<Conversation, ClientError> {
        self.state.lock().await.issue();

        let result = self.api.create_conversation(title).await;

        let mut state = self.state.lock().await;
        state.settle();
        match result {
            Ok(conversation) => {
                if state.filter.admits(&conversation) {
                    state.view.conversations.push(ConversationSummary {
                        conversation: conversation.clone(),
                        owner: None,
                        last_message: None,
                        unread_count: 0,
                        has_unread: false,
                    });
                    state.resort();
                }
                Ok(conversation)
            }
            Err(err) => {
                state.fail(&err);
                Err(err)
            }
        }
    }

    /// Opens a conversation: points the store at it right away, loads the thread,
    /// then refreshes the list with the last-used filter.
    pub async fn fetch_messages(&self, conversation_id: i64) -> Result<(), ClientError> {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.view.active_conversation != Some(conversation_id) {
                state.view.active_conversation = Some(conversation_id);
                state.view.messages.clear();
            }
            state.issue()
        };

        let result = self.api.list_messages(conversation_id).await;

        let filter = {
            let mut state = self.state.lock().await;
            state.settle();
            match result {
                Ok(thread) => {
                    let still_active = state.view.active_conversation == Some(conversation_id);
                    if still_active && state.accept(Resource::Messages(conversation_id), ticket) {
                        let mut messages = thread.messages;
                        sort_messages(&mut messages);
                        state.view.messages = messages;
                        state.view.unread.total = thread.unread;
                        state.view.last_error = None;

                        if let Some(summary) = state
                            .view
                            .conversations
                            .iter_mut()
                            .find(|c| c.conversation.id == conversation_id)
                        {
                            summary.unread_count = 0;
                            summary.has_unread = false;
                        }
                        state.resort();
                    } else {
                        tracing::debug!(conversation_id, ticket, "dropping stale thread");
                    }
                }
                Err(err) => {
                    state.fail(&err);
                    return Err(err);
                }
            }
            state.filter
        };

        self.fetch_conversations(filter).await
    }

    /// Posts a message. On failure nothing in the store changes, so the caller
    /// can keep the draft and retry.
    pub async fn send_message(&self, conversation_id: i64, text: &str) -> Result<Message, ClientError> {
        self.state.lock().await.issue();

        let result = self.api.send_message(conversation_id, text).await;

        let mut state = self.state.lock().await;
        state.settle();
        let sent = result?;

        if state.view.active_conversation == Some(conversation_id)
            && !state.view.messages.iter().any(|m| m.id == sent.message.id)
        {
            state.view.messages.push(sent.message.clone());
            sort_messages(&mut state.view.messages);
        }

        if let Some(summary) = state
            .view
            .conversations
            .iter_mut()
            .find(|c| c.conversation.id == conversation_id)
        {
            summary.conversation.updated_at = sent.message.created_at;
            summary.last_message = Some(sent.message.clone());
        }

        state.view.unread.total = sent.unread;
        state.resort();

        Ok(sent.message)
    }

    pub async fn update_conversation_status(
        &self,
        conversation_id: i64,
        status: ConversationStatus,
    ) -> Result<Conversation, ClientError> {
        self.state.lock().await.issue();

        let result = self.api.update_status(conversation_id, status).await;

        let mut state = self.state.lock().await;
        state.settle();
        match result {
            Ok(conversation) => {
                if state.filter.admits(&conversation) {
                    if let Some(summary) = state
                        .view
                        .conversations
                        .iter_mut()
                        .find(|c| c.conversation.id == conversation_id)
                    {
                        summary.conversation = conversation.clone();
                    }
                } else {
                    state
                        .view
                        .conversations
                        .retain(|c| c.conversation.id != conversation_id);
                }
                state.resort();
                Ok(conversation)
            }
            Err(err) => {
                state.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn fetch_unread(&self) -> Result<u64, ClientError> {
        self.state.lock().await.issue();

        let result = self.api.unread_count().await;

        let mut state = self.state.lock().await;
        state.settle();
        match result {
            Ok(total) => {
                state.view.unread.total = total;
                Ok(total)
            }
            Err(err) => {
                state.fail(&err);
                Err(err)
            }
        }
    }
}
