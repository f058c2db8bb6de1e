// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// The wire encodes the role as a bare string: the literal `"user"`,
    /// anything else counts as the assistant.
    pub fn from_wire(role: &str) -> Self {
        if role == "user" {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
}

/// One entry of the sidebar listing. The title stays empty until the first
/// exchange in the chat sets it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
    pub chat_id: &'a str,
}

#[derive(Deserialize)]
pub struct SendMessageResponse {
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct NewChatResponse {
    pub chat_id: String,
}

#[derive(Deserialize)]
pub struct ChatHistoryResponse {
    pub chats: Vec<ChatSummary>,
}

/// `/get_messages/{id}` ships messages as `[role, text]` tuples.
#[derive(Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<(String, String)>,
}

#[derive(Serialize)]
pub struct UpdateTitleRequest<'a> {
    pub title: &'a str,
}
