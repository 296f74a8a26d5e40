pub mod client;
pub mod types;

pub use client::ChatClient;
pub use types::{ChatReply, ChatRole, ChatTurn, Conversation, TokenTally, TokenUsage};
