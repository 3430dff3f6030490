//! # Transport Boundary
//!
//! Trait seam for the external pub/sub client. The router and publisher take
//! a transport as an explicit dependency rather than reaching for an ambient
//! client, which keeps the dispatch engine testable against in-memory
//! implementations.

use crate::error::DispatchResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Receiver side of a subscription: the transport delivers each raw message
/// to the sink and must not pull the next message until `deliver` returns.
/// Back-pressure is implicit in this single-consumer callback model.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Handle one delivered message. Channel names may still carry the
    /// transport's namespace prefix.
    async fn deliver(&self, channel: &str, payload: &str);
}

/// External pub/sub capability consumed by the dispatcher
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribe to the given channels and deliver every received message to
    /// the sink, sequentially. Blocks for the lifetime of the subscription;
    /// only returns on a fatal transport error.
    async fn subscribe(
        &self,
        channels: &[String],
        sink: Arc<dyn MessageSink>,
    ) -> DispatchResult<()>;

    /// Publish a raw payload to a channel. At-most-once, no retry.
    async fn publish(&self, channel: &str, payload: &str) -> DispatchResult<()>;
}
