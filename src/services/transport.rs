// src/services/transport.rs
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ClientError;
use crate::message::{
    ChatHistoryResponse, ChatSummary, Message, MessageRole, MessagesResponse, NewChatResponse,
    SendMessageRequest, SendMessageResponse, UpdateTitleRequest,
};

/// Thin wrappers over the backend's six JSON endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Delivers a user message and returns the assistant reply. An `error`
    /// field in the body is surfaced verbatim as `ClientError::Api`.
    pub async fn send_message(&self, chat_id: &str, message: &str) -> Result<String, ClientError> {
        debug!(chat_id, "POST /send_message");
        let body = SendMessageRequest { message, chat_id };
        let resp: SendMessageResponse = self
            .http
            .post(self.url("/send_message"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if let Some(error) = resp.error {
            return Err(ClientError::Api(error));
        }
        resp.response
            .ok_or_else(|| ClientError::Api("empty response from server".to_string()))
    }

    /// Allocates a fresh chat server-side and returns its id.
    pub async fn new_chat(&self) -> Result<String, ClientError> {
        debug!("POST /new_chat");
        let resp: NewChatResponse = self
            .http
            .post(self.url("/new_chat"))
            .send()
            .await?
            .json()
            .await?;
        Ok(resp.chat_id)
    }

    pub async fn get_chat_history(&self) -> Result<Vec<ChatSummary>, ClientError> {
        let resp: ChatHistoryResponse = self
            .http
            .get(self.url("/get_chat_history"))
            .send()
            .await?
            .json()
            .await?;
        Ok(resp.chats)
    }

    pub async fn get_messages(&self, chat_id: &str) -> Result<Vec<Message>, ClientError> {
        let resp: MessagesResponse = self
            .http
            .get(self.url(&format!("/get_messages/{chat_id}")))
            .send()
            .await?
            .json()
            .await?;
        Ok(resp
            .messages
            .into_iter()
            .map(|(role, text)| Message {
                role: MessageRole::from_wire(&role),
                text,
            })
            .collect())
    }

    pub async fn update_chat_title(&self, chat_id: &str, title: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url(&format!("/update_chat_title/{chat_id}")))
            .json(&UpdateTitleRequest { title })
            .send()
            .await?;
        Self::expect_ack(resp)
    }

    pub async fn clear_history(&self) -> Result<(), ClientError> {
        let resp = self.http.post(self.url("/clear_history")).send().await?;
        Self::expect_ack(resp)
    }

    // The two bare-ack endpoints answer with an empty 2xx body.
    fn expect_ack(resp: reqwest::Response) -> Result<(), ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!(%status, "backend rejected request");
            Err(ClientError::Status(status.as_u16()))
        }
    }
}
