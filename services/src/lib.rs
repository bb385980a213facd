pub mod catalog_service;
pub mod chat_policy;
pub mod chat_service;
pub mod error;
