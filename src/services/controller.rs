// src/services/controller.rs
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::message::MessageRole;
use crate::render::ChatView;
use crate::services::formatter;
use crate::services::markdown::{MarkdownOptions, MarkdownRenderer};
use crate::services::transport::ApiClient;
use crate::state::Session;

const TITLE_MAX_WORDS: usize = 6;
const TITLE_MAX_CHARS: usize = 30;

/// Drives the chat session: owns the active-chat state, orchestrates
/// backend calls and pushes the results through the view. All operations
/// run sequentially on the caller's task; in-flight requests are never
/// cancelled.
pub struct ChatController<V, M> {
    api: ApiClient,
    view: V,
    markdown: M,
    options: MarkdownOptions,
    session: Session,
    last_send: Option<String>,
    // Set while the active chat has had no exchange yet; cleared once the
    // first reply lands and the title is derived.
    pending_title: bool,
}

impl<V: ChatView, M: MarkdownRenderer> ChatController<V, M> {
    pub fn new(api: ApiClient, view: V, markdown: M) -> Self {
        Self {
            api,
            view,
            markdown,
            options: MarkdownOptions::default(),
            session: Session::new(),
            last_send: None,
            pending_title: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn current_chat(&self) -> Option<&str> {
        self.session.current_chat()
    }

    /// Sends a user message, creating a chat first if none is active.
    /// Empty input is a silent no-op.
    pub async fn send_message(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let chat_id = match self.ensure_chat().await {
            Ok(id) => id,
            Err(err) => {
                self.view.show_error(&format!("Error: {err}"));
                return;
            }
        };

        self.view.append_user(trimmed);
        self.last_send = Some(trimmed.to_string());

        self.view.show_loading();
        let result = self.api.send_message(&chat_id, trimmed).await;
        self.view.hide_loading();

        match result {
            Ok(reply) => {
                let nodes = formatter::format(&reply, &self.markdown, &self.options);
                self.view.append_assistant(&nodes);
                if self.pending_title {
                    self.pending_title = false;
                    self.apply_title(&chat_id, trimmed).await;
                    self.refresh_sidebar().await;
                }
            }
            Err(err) => {
                warn!(chat_id, error = %err, "send failed");
                self.view.show_error(&format!("Error: {err}"));
            }
        }
    }

    /// Re-attempts the most recent send. Wired to the retry affordance of
    /// the error node; does nothing when no send has happened yet.
    pub async fn retry_last(&mut self) {
        if let Some(text) = self.last_send.clone() {
            self.send_message(&text).await;
        }
    }

    /// Explicit new-chat request. Does not allocate when the active chat
    /// still has zero messages, so repeated triggers cannot pile up empty
    /// chats.
    pub async fn new_chat(&mut self) {
        if let Some(id) = self.session.current_chat() {
            match self.api.get_messages(id).await {
                Ok(messages) if messages.is_empty() => {
                    debug!(chat_id = id, "active chat is empty, reusing it");
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    self.view.show_error(&format!("Error: {err}"));
                    return;
                }
            }
        }
        match self.api.new_chat().await {
            Ok(id) => {
                info!(chat_id = %id, "chat created");
                self.session.activate(id);
                self.pending_title = true;
                self.last_send = None;
                self.view.clear_messages();
                self.view.show_welcome();
                self.refresh_sidebar().await;
            }
            Err(err) => self.view.show_error(&format!("Error: {err}")),
        }
    }

    /// Replaces the displayed messages with another chat's history and
    /// makes it the active chat.
    pub async fn load_chat(&mut self, chat_id: &str) {
        match self.api.get_messages(chat_id).await {
            Ok(messages) => {
                self.view.clear_messages();
                self.pending_title = messages.is_empty();
                for message in &messages {
                    match message.role {
                        MessageRole::User => self.view.append_user(&message.text),
                        MessageRole::Assistant => {
                            let nodes =
                                formatter::format(&message.text, &self.markdown, &self.options);
                            self.view.append_assistant(&nodes);
                        }
                    }
                }
                self.session.activate(chat_id);
                self.last_send = None;
                self.refresh_sidebar().await;
            }
            Err(err) => self.view.show_error(&format!("Error: {err}")),
        }
    }

    /// Wipes every chat on the backend and returns to the welcome view.
    pub async fn clear_history(&mut self) {
        match self.api.clear_history().await {
            Ok(()) => {
                info!("history cleared");
                self.session.deactivate();
                self.pending_title = false;
                self.last_send = None;
                self.view.clear_messages();
                self.view.show_welcome();
                self.refresh_sidebar().await;
            }
            Err(err) => self.view.show_error(&format!("Error: {err}")),
        }
    }

    /// Re-fetches the sidebar listing; the entry matching the active chat
    /// carries the highlight.
    pub async fn refresh_sidebar(&mut self) {
        match self.api.get_chat_history().await {
            Ok(chats) => self.view.set_sidebar(&chats, self.session.current_chat()),
            Err(err) => warn!(error = %err, "sidebar refresh failed"),
        }
    }

    async fn ensure_chat(&mut self) -> Result<String, ClientError> {
        if let Some(id) = self.session.current_chat() {
            return Ok(id.to_string());
        }
        let id = self.api.new_chat().await?;
        info!(chat_id = %id, "chat created");
        self.session.activate(id.clone());
        self.pending_title = true;
        self.refresh_sidebar().await;
        Ok(id)
    }

    async fn apply_title(&mut self, chat_id: &str, first_message: &str) {
        let title = derive_title(first_message);
        if title.is_empty() {
            return;
        }
        match self.api.update_chat_title(chat_id, &title).await {
            Ok(()) => debug!(chat_id, title = %title, "title persisted"),
            Err(err) => warn!(chat_id, error = %err, "title update failed"),
        }
    }
}

/// Title from the first user message: first six whitespace-separated
/// tokens, non-word characters stripped, capped at 30 chars with an
/// ellipsis when truncated.
pub fn derive_title(first_message: &str) -> String {
    let head = first_message
        .split_whitespace()
        .take(TITLE_MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned: String = head
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.chars().count() > TITLE_MAX_CHARS {
        let mut capped: String = cleaned.chars().take(TITLE_MAX_CHARS).collect();
        capped.push_str("...");
        capped
    } else {
        cleaned.to_string()
    }
}
