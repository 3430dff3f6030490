//! # Redis Transport
//!
//! Redis-backed implementation of the transport boundary. Subscriptions use a
//! dedicated pub/sub connection; publishes go through a shared
//! `ConnectionManager`, which transparently reconnects between commands.

use crate::error::{DispatchError, DispatchResult};
use crate::messaging::transport::{MessageSink, Transport};
use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Redis pub/sub transport
#[derive(Clone)]
pub struct RedisTransport {
    client: redis::Client,
    manager: ConnectionManager,
}

impl RedisTransport {
    /// Connect to Redis using a connection URL
    pub async fn connect(url: &str) -> DispatchResult<Self> {
        info!("🚀 Connecting to Redis at {}", url);

        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client.clone()).await?;

        info!("✅ Connected to Redis");
        Ok(Self { client, manager })
    }
}

#[async_trait]
impl Transport for RedisTransport {
    async fn subscribe(
        &self,
        channels: &[String],
        sink: Arc<dyn MessageSink>,
    ) -> DispatchResult<()> {
        let connection = self.client.get_async_connection().await?;
        let mut pubsub = connection.into_pubsub();

        for channel in channels {
            pubsub.subscribe(channel).await?;
            debug!("📋 Subscribed to channel: {}", channel);
        }

        let mut stream = pubsub.on_message();
        while let Some(msg) = stream.next().await {
            let channel = msg.get_channel_name().to_string();
            let payload: String = match msg.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(
                        channel = %channel,
                        error = %e,
                        "⚠️ Discarding message with non-UTF8 payload"
                    );
                    continue;
                }
            };

            // Sequential delivery: the next message is not pulled until the
            // sink has finished with the current one.
            sink.deliver(&channel, &payload).await;
        }

        Err(DispatchError::transport(
            "Redis subscription stream ended unexpectedly",
        ))
    }

    async fn publish(&self, channel: &str, payload: &str) -> DispatchResult<()> {
        let mut connection = self.manager.clone();
        let receivers: i64 = connection.publish(channel, payload).await?;
        debug!(
            channel = %channel,
            receivers = receivers,
            "📤 Published message"
        );
        Ok(())
    }
}
