use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt: u64,
    #[serde(default)]
    pub completion: u64,
    #[serde(default)]
    pub total: u64,
}

/// Running token count for a conversation.
pub type TokenTally = TokenUsage;

impl TokenUsage {
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt += other.prompt;
        self.completion += other.completion;
        self.total += other.total;
    }
}

/// `POST /api/chat` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub label: Option<String>,
    pub response: String,
    #[serde(default)]
    pub tokens: TokenUsage,
}

impl ChatReply {
    /// Classified label, or `rest_label` when the server sent none.
    pub fn label_or<'a>(&'a self, rest_label: &'a str) -> &'a str {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => rest_label,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub conversation_history: &'a [ChatTurn],
    pub expression_labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_description: Option<&'a str>,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(conversation: &'a Conversation, message: &'a str, expression_labels: &'a [String]) -> Self {
        Self {
            message,
            conversation_history: &conversation.history,
            expression_labels,
            avatar_description: conversation.avatar_description.as_deref(),
        }
    }
}

/// One chat session with the avatar.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub history: Vec<ChatTurn>,
    pub tokens: TokenTally,
    pub avatar_description: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            history: Vec::new(),
            tokens: TokenTally::default(),
            avatar_description: None,
        }
    }

    pub fn with_avatar(mut self, description: &str) -> Self {
        self.avatar_description = Some(description.to_string());
        self
    }

    /// Appends the exchange and accumulates token usage.
    pub fn record(&mut self, message: &str, reply: &ChatReply) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            content: message.to_string(),
        });
        self.history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: reply.response.clone(),
        });
        self.tokens.add(&reply.tokens);
    }
}
