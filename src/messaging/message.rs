//! # Message Structure
//!
//! One received transport message: logical channel, raw payload, and receipt
//! timestamp. Ephemeral - constructed per delivery, consumed by exactly one
//! dispatch pass, then discarded.

use serde::{Deserialize, Serialize};

/// A message received from the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Logical channel name (namespace prefix already stripped)
    pub channel: String,
    /// Raw payload as delivered by the transport
    pub payload: String,
    /// When the message was received
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
            received_at: chrono::Utc::now(),
        }
    }
}
