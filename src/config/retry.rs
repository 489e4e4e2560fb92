use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry settings for transient (timeout / network) failures.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; a request is sent at most `max_retries + 1` times.
    /// TOML: `retry.max_retries`. Default: `2`.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay before retry `n` is `base_delay_ms * n`.
    /// TOML: `retry.base_delay_ms`. Default: `500`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_retries() -> usize {
    2
}

fn default_base_delay_ms() -> u64 {
    500
}
