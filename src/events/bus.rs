//! # Event Bus
//!
//! Synchronous in-process broadcast to registered listeners.
//!
//! ## Overview
//!
//! The EventBus holds listeners keyed by event name. `broadcast` runs every
//! listener registered for the event, sequentially, and returns once all of
//! them have run. A failing listener never prevents later listeners from
//! running; failures are logged individually and reported back as one
//! aggregate error so the caller records the broadcast as failed.

use crate::error::{DispatchError, DispatchResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// An event constructed from a message payload, broadcast to listeners
#[derive(Debug, Clone)]
pub struct BroadcastEvent {
    /// Event name; listeners subscribe by this name
    pub name: String,
    /// Message payload carried by the event
    pub payload: Value,
    /// Channel the originating message arrived on, when broadcast from dispatch
    pub channel: Option<String>,
    /// When the event was constructed
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl BroadcastEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            channel: None,
            published_at: chrono::Utc::now(),
        }
    }

    /// Attach the originating channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// Trait for event listeners
#[async_trait::async_trait]
pub trait EventListener: Send + Sync {
    /// Handle a broadcast event
    async fn on_event(&self, event: &BroadcastEvent) -> anyhow::Result<()>;

    /// Listener name for identification
    fn listener_name(&self) -> &str {
        "unnamed_listener"
    }
}

/// In-process event bus with per-event-name listener registration
pub struct EventBus {
    /// Map of event name to registered listeners, in registration order
    listeners: RwLock<HashMap<String, Vec<Arc<dyn EventListener>>>>,
    events_broadcast: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            events_broadcast: AtomicU64::new(0),
        }
    }

    /// Register a listener for an event name
    pub async fn register_listener(
        &self,
        event_name: impl Into<String>,
        listener: Arc<dyn EventListener>,
    ) {
        let event_name = event_name.into();
        let mut listeners = self.listeners.write().await;
        listeners
            .entry(event_name.clone())
            .or_insert_with(Vec::new)
            .push(listener);
        info!("📚 Registered listener for event '{}'", event_name);
    }

    /// Broadcast an event to all listeners registered for its name.
    ///
    /// Returns once every listener has run. Fails with an aggregate error when
    /// any listener failed, after all of them have been given the chance to
    /// run.
    pub async fn broadcast(&self, event: BroadcastEvent) -> DispatchResult<()> {
        let matching = {
            let listeners = self.listeners.read().await;
            listeners.get(&event.name).cloned().unwrap_or_default()
        };

        self.events_broadcast.fetch_add(1, Ordering::Relaxed);

        if matching.is_empty() {
            debug!("No listeners registered for event '{}'", event.name);
            return Ok(());
        }

        let total = matching.len();
        let mut failures = Vec::new();
        for listener in matching {
            if let Err(e) = listener.on_event(&event).await {
                error!(
                    event = %event.name,
                    listener = %listener.listener_name(),
                    error = %e,
                    "❌ Event listener failed"
                );
                failures.push(format!("{}: {e}", listener.listener_name()));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::handler_execution(
                &event.name,
                format!(
                    "{} of {} listeners failed: {}",
                    failures.len(),
                    total,
                    failures.join("; ")
                ),
            ))
        }
    }

    /// Number of listeners registered for an event name
    pub async fn listener_count(&self, event_name: &str) -> usize {
        let listeners = self.listeners.read().await;
        listeners.get(event_name).map_or(0, Vec::len)
    }

    /// Total number of events broadcast since startup
    pub fn events_broadcast(&self) -> u64 {
        self.events_broadcast.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
