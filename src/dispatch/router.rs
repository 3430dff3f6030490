//! # Channel Router
//!
//! Core orchestrator of the dispatch path. Receives raw messages from the
//! transport, strips the configured namespace prefix, looks up the channel's
//! handler list, and classifies and invokes each handler in configured order.
//!
//! `dispatch` never returns an error: every handler-scoped failure is caught,
//! logged as a structured error record, and dispatch continues with the next
//! handler. One broken handler never halts the subscription loop.
//!
//! No timeout is imposed on individual invocations - a hanging callable or
//! event listener stalls the subscription loop. Jobs escape this synchrony
//! through the work queue.

use crate::config::DispatcherConfig;
use crate::dispatch::classifier::classify;
use crate::dispatch::invoker::HandlerInvoker;
use crate::error::DispatchResult;
use crate::logging::log_dispatch_error;
use crate::messaging::{Message, MessageSink};
use crate::registry::{HandlerPayload, HandlerRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

/// Routes received messages to their channel's handlers
pub struct ChannelRouter {
    /// Channel name to ordered handler identifiers; immutable after construction
    channels: HashMap<String, Vec<String>>,
    registry: Arc<HandlerRegistry>,
    invoker: HandlerInvoker,
    channel_prefix: String,
    decode_json_payload: bool,
}

impl ChannelRouter {
    pub fn new(
        config: &DispatcherConfig,
        registry: Arc<HandlerRegistry>,
        invoker: HandlerInvoker,
    ) -> Self {
        let channels = config
            .channels
            .iter()
            .map(|binding| (binding.channel.clone(), binding.handlers.clone()))
            .collect();

        Self {
            channels,
            registry,
            invoker,
            channel_prefix: config.channel_prefix.clone(),
            decode_json_payload: config.decode_json_payload,
        }
    }

    /// Dispatch one raw message. Catches and reports all per-handler
    /// failures; never errors outward.
    pub async fn dispatch(&self, raw_channel: &str, raw_payload: &str) {
        let channel = self.strip_prefix(raw_channel);
        let message = Message::new(channel.clone(), raw_payload);

        warn!(
            channel = %channel,
            received_at = %message.received_at.format("%Y-%m-%d %H:%M:%S"),
            "⚡ Received message on channel: {}",
            channel
        );

        let handler_ids = match self.channels.get(&channel) {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                warn!("⚠️ No handlers defined for channel: {}", channel);
                return;
            }
        };

        let payload = self.decode_payload(raw_payload);

        for handler_id in handler_ids {
            if let Err(e) = self
                .dispatch_handler(handler_id, &message, payload.clone())
                .await
            {
                error!(
                    handler = %handler_id,
                    channel = %channel,
                    "❌ Failed to process handler {}: {}",
                    handler_id,
                    e
                );
                log_dispatch_error(
                    "ChannelRouter",
                    "dispatch_handler",
                    &e,
                    Some(&serde_json::json!({
                        "handler": handler_id,
                        "channel": channel,
                    })),
                );
            }
        }
    }

    /// Classify and invoke a single handler
    async fn dispatch_handler(
        &self,
        handler_id: &str,
        message: &Message,
        payload: HandlerPayload,
    ) -> DispatchResult<()> {
        let registration = self.registry.resolve(handler_id)?;
        let category = classify(&registration)?;
        self.invoker
            .invoke(&registration, category, message, payload)
            .await
    }

    /// Reverse the transport's silent keyspace prefixing before lookup
    fn strip_prefix(&self, raw_channel: &str) -> String {
        if self.channel_prefix.is_empty() {
            return raw_channel.to_string();
        }
        raw_channel
            .strip_prefix(&self.channel_prefix)
            .unwrap_or(raw_channel)
            .to_string()
    }

    /// Decode the raw payload per configuration. Handlers own their payload
    /// format; undecodable payloads pass through as raw strings.
    fn decode_payload(&self, raw_payload: &str) -> HandlerPayload {
        if self.decode_json_payload {
            serde_json::from_str(raw_payload)
                .unwrap_or_else(|_| HandlerPayload::String(raw_payload.to_string()))
        } else {
            HandlerPayload::String(raw_payload.to_string())
        }
    }
}

#[async_trait]
impl MessageSink for ChannelRouter {
    async fn deliver(&self, channel: &str, payload: &str) {
        self.dispatch(channel, payload).await;
    }
}
