// src/error.rs
use thiserror::Error;

/// Failure taxonomy for backend calls. Guard violations (empty input,
/// no-op new-chat) are not errors; callers return silently instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable JSON body: connection refused,
    /// timeout, or a malformed payload.
    #[error("Could not connect to the server")]
    Connect(#[from] reqwest::Error),

    /// The backend answered but carried an application-level `error` field.
    #[error("{0}")]
    Api(String),

    /// Non-2xx status on an endpoint that only acks.
    #[error("unexpected status {0} from server")]
    Status(u16),
}
