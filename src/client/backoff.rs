use backon::BackoffBuilder;
use std::time::Duration;

use crate::config::RetryConfig;

/// Linear backoff: retry `n` waits `base * n`, for at most `max_times` retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBuilder {
    base: Duration,
    max_times: usize,
}

impl LinearBuilder {
    pub fn new(base: Duration, max_times: usize) -> Self {
        Self { base, max_times }
    }
}

impl From<&RetryConfig> for LinearBuilder {
    fn from(cfg: &RetryConfig) -> Self {
        Self::new(cfg.base_delay(), cfg.max_retries)
    }
}

impl BackoffBuilder for LinearBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            base: self.base,
            max_times: self.max_times,
            attempt: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_times: usize,
    attempt: usize,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_times {
            return None;
        }
        self.attempt += 1;
        let factor = u32::try_from(self.attempt).unwrap_or(u32::MAX);
        Some(self.base.saturating_mul(factor))
    }
}
