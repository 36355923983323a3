//! Client configuration

use pairlink_core::{PairlinkError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest accepted rate limit window (one day)
pub const MAX_WINDOW_SECS: u64 = 86_400;

/// Largest accepted event or inbound error queue
pub const MAX_QUEUE_CAPACITY: usize = 4_096;

/// Sliding-window rate limit settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// How many requests may be made within one window
    pub limit: usize,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 2,
            window_secs: 5,
        }
    }
}

impl RateLimitConfig {
    /// Window length
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Settings for a [`Client`](crate::Client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the app, shown to the counterpart
    pub name: String,

    /// Advisory request rate limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Buffered events per subscriber before the slowest one lags
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Inbound failures held for the owner before new ones are dropped
    #[serde(default = "default_inbound_error_capacity")]
    pub inbound_error_capacity: usize,
}

fn default_event_capacity() -> usize {
    64
}

fn default_inbound_error_capacity() -> usize {
    256
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "pairlink".to_string(),
            rate_limit: RateLimitConfig::default(),
            event_capacity: default_event_capacity(),
            inbound_error_capacity: default_inbound_error_capacity(),
        }
    }
}

impl ClientConfig {
    /// Create a config with default limits
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            name: "test-client".to_string(),
            event_capacity: 16,
            inbound_error_capacity: 8,
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| PairlinkError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PairlinkError::config("name must not be empty"));
        }
        if self.rate_limit.limit == 0 {
            return Err(PairlinkError::config("rate_limit.limit must be greater than 0"));
        }
        if self.rate_limit.window_secs == 0 || self.rate_limit.window_secs > MAX_WINDOW_SECS {
            return Err(PairlinkError::config(format!(
                "rate_limit.window_secs must be between 1 and {MAX_WINDOW_SECS}"
            )));
        }
        if self.event_capacity == 0 || self.event_capacity > MAX_QUEUE_CAPACITY {
            return Err(PairlinkError::config(format!(
                "event_capacity must be between 1 and {MAX_QUEUE_CAPACITY}"
            )));
        }
        if self.inbound_error_capacity == 0 || self.inbound_error_capacity > MAX_QUEUE_CAPACITY {
            return Err(PairlinkError::config(format!(
                "inbound_error_capacity must be between 1 and {MAX_QUEUE_CAPACITY}"
            )));
        }
        Ok(())
    }
}
