//! Client-side state for the storefront support chat.
//!
//! [`store::ChatStore`] keeps the conversation list, the active thread and the
//! unread summary consistent while fetches race each other. It talks to the
//! server through the [`api::ChatApi`] trait; [`api::HttpChatApi`] is the
//! reqwest-backed implementation.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod store;
pub mod types;

pub use api::{ChatApi, HttpChatApi};
pub use error::ClientError;
pub use store::{ChatSnapshot, ChatStore, UnreadSummary};
