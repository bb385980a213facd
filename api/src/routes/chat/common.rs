use db::models::conversations::ConversationStatus;
use serde::{Deserialize, Serialize};
use services::chat_service::{MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH};
use std::borrow::Cow;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::response::ApiError;
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(custom(function = "validate_title_length"))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(custom(function = "validate_content_length"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversationQuery {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnreadQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub unread: u64,
}

/// Length limits count the text as stored, so surrounding whitespace is free.
fn trimmed_max(value: &str, max: usize, what: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::new("length")
            .with_message(Cow::Owned(format!("{what} must be at most {max} characters"))));
    }
    Ok(())
}

fn validate_title_length(title: &str) -> Result<(), ValidationError> {
    trimmed_max(title, MAX_TITLE_LENGTH, "Title")
}

fn validate_content_length(content: &str) -> Result<(), ValidationError> {
    trimmed_max(content, MAX_CONTENT_LENGTH, "Message")
}

pub fn validate_request(req: &impl Validate) -> Result<(), ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(format_validation_errors(&e)))
}

/// Parses an optional `status` query value; empty means no filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ConversationStatus>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => ConversationStatus::from_str(value)
            .map(Some)
            .map_err(|_| ApiError::validation(format!("Invalid status '{value}'"))),
    }
}
