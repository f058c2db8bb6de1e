// src/services/mod.rs
pub mod controller;
pub mod debounce;
pub mod formatter;
pub mod markdown;
pub mod transport;
