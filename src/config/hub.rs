//! Broadcast hub configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Broadcast hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Outbound frames buffered per client before it counts as slow
    #[serde(default = "default_session_queue_capacity")]
    pub session_queue_capacity: usize,

    /// Pending register/unregister/broadcast commands
    #[serde(default = "default_command_queue_capacity")]
    pub command_queue_capacity: usize,

    /// How long a released session may spend draining and closing, in milliseconds
    #[serde(default = "default_close_timeout_ms")]
    pub close_timeout_ms: u64,
}

impl HubConfig {
    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    /// Validate hub configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_queue_capacity == 0 || self.command_queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.close_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            session_queue_capacity: default_session_queue_capacity(),
            command_queue_capacity: default_command_queue_capacity(),
            close_timeout_ms: default_close_timeout_ms(),
        }
    }
}

fn default_session_queue_capacity() -> usize {
    64
}

fn default_command_queue_capacity() -> usize {
    1024
}

fn default_close_timeout_ms() -> u64 {
    5_000
}
