// src/render.rs
use std::io::Write;

use crate::message::ChatSummary;

/// Renderable piece of an assistant message, produced by the formatter and
/// consumed once by a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderNode {
    /// Safe fragment produced by the markdown collaborator.
    Markup(String),
    /// Fenced code block, body verbatim; escaping happens at insertion time.
    Code {
        language: Option<String>,
        content: String,
    },
}

/// Side-effect surface of the chat window. Implementations must keep the
/// loading indicator balanced: `hide_loading` is called on success and
/// failure alike. User text is inserted literally and never interpreted as
/// markup.
pub trait ChatView {
    fn append_user(&mut self, text: &str);
    fn append_assistant(&mut self, nodes: &[RenderNode]);
    fn show_welcome(&mut self);
    fn clear_messages(&mut self);
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Failure node carrying the error text and a retry affordance; the
    /// retry action itself is the controller's `retry_last`.
    fn show_error(&mut self, text: &str);
    /// Replaces the sidebar listing. Exactly the entry matching `active`
    /// carries the active marker.
    fn set_sidebar(&mut self, chats: &[ChatSummary], active: Option<&str>);
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the same html fragments the browser front-end renders: message
/// divs, code blocks with a language header and copy button, one `active`
/// sidebar entry. Appending always implies scrolling to the newest message,
/// so the view only keeps the fragment list.
#[derive(Debug, Default)]
pub struct HtmlView {
    messages: Vec<String>,
    sidebar: Vec<String>,
    welcome: bool,
    loading: bool,
}

impl HtmlView {
    pub fn new() -> Self {
        Self {
            welcome: true,
            ..Self::default()
        }
    }

    pub fn messages_html(&self) -> String {
        self.messages.join("\n")
    }

    pub fn sidebar_html(&self) -> String {
        self.sidebar.join("\n")
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn showing_welcome(&self) -> bool {
        self.welcome
    }

    // First append removes the one-time welcome placeholder.
    fn push(&mut self, fragment: String) {
        self.welcome = false;
        self.messages.push(fragment);
    }
}

impl ChatView for HtmlView {
    fn append_user(&mut self, text: &str) {
        self.push(format!(
            "<div class=\"message user-message\">{}</div>",
            escape_html(text)
        ));
    }

    fn append_assistant(&mut self, nodes: &[RenderNode]) {
        let mut html = String::from("<div class=\"message bot-message\">");
        for node in nodes {
            match node {
                RenderNode::Markup(fragment) => html.push_str(fragment),
                RenderNode::Code { language, content } => {
                    html.push_str(&format!(
                        "<div class=\"code-block\"><div class=\"code-header\">\
                         <span class=\"code-language\">{}</span>\
                         <button class=\"copy-button\">Copy</button></div>\
                         <pre><code>{}</code></pre></div>",
                        escape_html(language.as_deref().unwrap_or("code")),
                        escape_html(content)
                    ));
                }
            }
        }
        html.push_str("</div>");
        self.push(html);
    }

    fn show_welcome(&mut self) {
        self.welcome = true;
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
    }

    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn show_error(&mut self, text: &str) {
        self.push(format!(
            "<div class=\"message error-message\">{}\
             <button class=\"retry-button\">Retry</button></div>",
            escape_html(text)
        ));
    }

    fn set_sidebar(&mut self, chats: &[ChatSummary], active: Option<&str>) {
        self.sidebar = chats
            .iter()
            .map(|chat| {
                let class = if active == Some(chat.id.as_str()) {
                    "chat-item active"
                } else {
                    "chat-item"
                };
                let title = if chat.title.is_empty() {
                    "New chat"
                } else {
                    chat.title.as_str()
                };
                format!(
                    "<div class=\"{}\" data-id=\"{}\">{}</div>",
                    class,
                    escape_html(&chat.id),
                    escape_html(title)
                )
            })
            .collect();
    }
}

/// ANSI terminal rendition used by the binary. Expects markup nodes coming
/// from a plain-text markdown collaborator.
#[derive(Debug, Default)]
pub struct TermView {
    loading: bool,
}

const LOADING_TEXT: &str = "Nova is thinking...";

impl TermView {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush() {
        let _ = std::io::stdout().flush();
    }
}

impl ChatView for TermView {
    fn append_user(&mut self, text: &str) {
        println!("\x1b[1mYou:\x1b[0m {text}");
    }

    fn append_assistant(&mut self, nodes: &[RenderNode]) {
        println!("\x1b[36mNova:\x1b[0m");
        for node in nodes {
            match node {
                RenderNode::Markup(text) => println!("{text}"),
                RenderNode::Code { language, content } => {
                    let label = language.as_deref().unwrap_or("");
                    println!("\x1b[90m--- {label}\x1b[0m");
                    println!("{content}");
                    println!("\x1b[90m---\x1b[0m");
                }
            }
        }
    }

    fn show_welcome(&mut self) {
        println!("Nova AI Assistant");
        println!("How can I help you today?");
        println!();
    }

    fn clear_messages(&mut self) {
        print!("\x1b[2J\x1b[H");
        Self::flush();
    }

    fn show_loading(&mut self) {
        self.loading = true;
        print!("{LOADING_TEXT}");
        Self::flush();
    }

    fn hide_loading(&mut self) {
        if self.loading {
            print!("\r{:width$}\r", "", width = LOADING_TEXT.len());
            Self::flush();
            self.loading = false;
        }
    }

    fn show_error(&mut self, text: &str) {
        println!("\x1b[31m{text}\x1b[0m (use /retry to try again)");
    }

    fn set_sidebar(&mut self, chats: &[ChatSummary], active: Option<&str>) {
        if chats.is_empty() {
            println!("(no chats yet)");
            return;
        }
        for chat in chats {
            let marker = if active == Some(chat.id.as_str()) {
                "*"
            } else {
                " "
            };
            let title = if chat.title.is_empty() {
                "New chat"
            } else {
                chat.title.as_str()
            };
            println!("{marker} [{}] {title}", chat.id);
        }
    }
}
