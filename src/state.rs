// src/state.rs

/// Which chat the client is currently displaying. `None` means no chat has
/// been opened yet and the welcome view is showing. At most one chat is
/// active at a time; sidebar highlighting is always derived from this.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_chat(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn activate(&mut self, chat_id: impl Into<String>) {
        self.current = Some(chat_id.into());
    }

    pub fn deactivate(&mut self) {
        self.current = None;
    }

    pub fn is_active(&self, chat_id: &str) -> bool {
        self.current.as_deref() == Some(chat_id)
    }
}
