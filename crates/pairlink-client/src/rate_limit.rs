//! Sliding-window request counter
//!
//! Advisory only: the limiter reports whether the caller is over its budget
//! and never blocks or rejects anything itself.

use crate::config::RateLimitConfig;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Counts requests made within the trailing window
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    requests: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window`
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            requests: VecDeque::new(),
        }
    }

    /// Create a limiter from configuration
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.limit, config.window())
    }

    /// Record a request made at `now` and report whether the caller is now
    /// over the limit.
    ///
    /// Timestamps older than the window are pruned before the new one is
    /// recorded, so the new request counts toward its own check. Calls must
    /// pass non-decreasing instants.
    pub fn add_request_and_check(&mut self, now: Instant) -> bool {
        while let Some(oldest) = self.requests.front() {
            // A window reaching past the clock's range never expires.
            let expired = oldest
                .checked_add(self.window)
                .is_some_and(|end| end <= now);
            if !expired {
                break;
            }
            self.requests.pop_front();
        }
        self.requests.push_back(now);
        self.requests.len() > self.limit
    }

    /// Requests currently inside the window, as of the last check
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Allowed requests per window
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }
}
