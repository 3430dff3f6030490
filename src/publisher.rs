//! # Publisher
//!
//! One-shot publish wrapper: serializes a payload to JSON and delegates to
//! the transport's publish primitive. At-most-once, no retry.

use crate::error::DispatchResult;
use crate::messaging::Transport;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Thin publish wrapper over a transport
#[derive(Clone)]
pub struct Publisher {
    transport: Arc<dyn Transport>,
}

impl Publisher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Serialize the payload to JSON and publish it on the channel.
    ///
    /// Fails with `Serialization` when the payload cannot be serialized, or
    /// `Transport` when the underlying publish call fails.
    pub async fn publish<P: Serialize + Sync>(
        &self,
        channel: &str,
        payload: &P,
    ) -> DispatchResult<()> {
        let message = serde_json::to_string(payload)?;
        self.transport.publish(channel, &message).await?;
        debug!("📤 Published to channel: {}", channel);
        Ok(())
    }
}
