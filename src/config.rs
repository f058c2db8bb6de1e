// src/config.rs
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Nova backend, no trailing slash required.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Quiet window applied to the new-chat trigger.
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl Config {
    /// Reads `NOVA_BASE_URL`, `NOVA_REQUEST_TIMEOUT_SECS` and
    /// `NOVA_DEBOUNCE_MS`, falling back to defaults for anything unset
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("NOVA_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: env_u64("NOVA_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            debounce: env_u64("NOVA_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse().ok()
}
