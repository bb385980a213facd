use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ClientError;
use crate::types::{
    Conversation, ConversationFilter, ConversationStatus, ConversationSummary,
    ConversationThread, Envelope, ErrorData, SentMessage, UnreadData,
};

/// The chat operations the client store depends on.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_conversations(
        &self,
        filter: ConversationFilter,
    ) -> Result<Vec<ConversationSummary>, ClientError>;

    async fn create_conversation(&self, title: &str) -> Result<Conversation, ClientError>;

    async fn list_messages(&self, conversation_id: i64) -> Result<ConversationThread, ClientError>;

    async fn send_message(
        &self,
        conversation_id: i64,
        content: &str,
    ) -> Result<SentMessage, ClientError>;

    async fn update_status(
        &self,
        conversation_id: i64,
        status: ConversationStatus,
    ) -> Result<Conversation, ClientError>;

    async fn unread_count(&self) -> Result<u64, ClientError>;
}

/// [`ChatApi`] over HTTP with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpChatApi {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/chat{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_envelope(status, &body)
    }
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ClientError> {
    if status.is_success() {
        let envelope: Envelope<T> =
            serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        return Ok(envelope.data);
    }

    match serde_json::from_slice::<Envelope<ErrorData>>(body) {
        Ok(envelope) => Err(ClientError::Api {
            kind: envelope.data.kind,
            message: envelope.message,
        }),
        Err(_) => Err(ClientError::Decode(format!(
            "HTTP {} with unrecognised body",
            status.as_u16()
        ))),
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn list_conversations(
        &self,
        filter: ConversationFilter,
    ) -> Result<Vec<ConversationSummary>, ClientError> {
        let request = self
            .client
            .get(self.url("/conversations"))
            .query(&filter.query_pairs());
        self.call(request).await
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, ClientError> {
        let request = self
            .client
            .post(self.url("/conversations"))
            .json(&json!({ "title": title }));
        self.call(request).await
    }

    async fn list_messages(&self, conversation_id: i64) -> Result<ConversationThread, ClientError> {
        let request = self
            .client
            .get(self.url(&format!("/conversations/{conversation_id}/messages")));
        self.call(request).await
    }

    async fn send_message(
        &self,
        conversation_id: i64,
        content: &str,
    ) -> Result<SentMessage, ClientError> {
        let request = self
            .client
            .post(self.url(&format!("/conversations/{conversation_id}/messages")))
            .json(&json!({ "content": content }));
        self.call(request).await
    }

    async fn update_status(
        &self,
        conversation_id: i64,
        status: ConversationStatus,
    ) -> Result<Conversation, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/conversations/{conversation_id}/status")))
            .json(&json!({ "status": status.to_string() }));
        self.call(request).await
    }

    async fn unread_count(&self) -> Result<u64, ClientError> {
        let data: UnreadData = self.call(self.client.get(self.url("/unread"))).await?;
        Ok(data.unread)
    }
}
