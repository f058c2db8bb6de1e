//! Client for the Nova chat backend: wire types and transport for its JSON
//! endpoints, a fenced-code-aware message formatter, and the chat-session
//! controller driving a pluggable view.

pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod services;
pub mod state;
