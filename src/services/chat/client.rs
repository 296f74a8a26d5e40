use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::{MimicError, Result};

use super::types::{ChatReply, ChatRequest, Conversation};

/// Client for the backend's chat + expression classification endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends `message` with the conversation so far and the labels the
    /// classifier may choose from. History is not updated here.
    pub async fn send(
        &self,
        conversation: &Conversation,
        message: &str,
        expression_labels: &[String],
    ) -> Result<ChatReply> {
        if message.trim().is_empty() {
            return Err(MimicError::BadRequest("Message is required".into()));
        }

        let body = ChatRequest::new(conversation, message, expression_labels);

        debug!("Chat request for conversation {}", conversation.id);
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MimicError::ChatServer {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ChatReply>().await?)
    }
}
