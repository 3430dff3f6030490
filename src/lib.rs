#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Channel Dispatch
//!
//! Channel-based message dispatcher: subscribes to a Redis pub/sub backend,
//! receives messages on named channels, and routes each message to registered
//! handlers based on statically declared configuration.
//!
//! ## Overview
//!
//! The core is the subscription-and-dispatch engine: a long-lived
//! subscription feeds the [`dispatch::ChannelRouter`], which classifies each
//! configured handler as a queued job, a broadcast event, or a directly
//! invokable callable, and executes it per that category's contract. Every
//! per-handler failure is isolated - one broken handler never halts the
//! subscription loop.
//!
//! Handler identifiers resolve through an explicit registry of factory
//! functions populated at startup, and the transport is an injected trait
//! boundary, so the dispatch path is a pure function of configuration and
//! fully testable against in-memory collaborators.
//!
//! ## Module Organization
//!
//! - [`config`] - Channel-to-handler mapping and dispatcher settings
//! - [`dispatch`] - Classifier, invoker, and channel router
//! - [`error`] - Structured error handling
//! - [`events`] - In-process event bus for event-dispatchable handlers
//! - [`jobs`] - Asynchronous work queue for queue-dispatchable handlers
//! - [`logging`] - Structured logging setup
//! - [`messaging`] - Transport boundary and Redis implementation
//! - [`publisher`] - One-shot publish wrapper
//! - [`registry`] - Handler registration and resolution
//! - [`subscriber`] - Subscription lifecycle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use channel_dispatch::config::{ChannelBinding, DispatcherConfig};
//! use channel_dispatch::events::EventBus;
//! use channel_dispatch::jobs::JobQueue;
//! use channel_dispatch::messaging::RedisTransport;
//! use channel_dispatch::publisher::Publisher;
//! use channel_dispatch::registry::{HandlerRegistration, MessageHandler, HandlerRegistry};
//! use channel_dispatch::subscriber::SubscriberService;
//! use std::sync::Arc;
//!
//! struct LogOrder;
//!
//! #[async_trait::async_trait]
//! impl MessageHandler for LogOrder {
//!     async fn handle(&self, payload: serde_json::Value) -> anyhow::Result<()> {
//!         tracing::info!("order received: {payload}");
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), channel_dispatch::DispatchError> {
//! channel_dispatch::logging::init_structured_logging();
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(HandlerRegistration::callable("orders.log_order", || {
//!     Arc::new(LogOrder)
//! }))?;
//!
//! let config = DispatcherConfig::from_env()?
//!     .with_channel(ChannelBinding::single("orders", "orders.log_order"));
//!
//! let transport = Arc::new(RedisTransport::connect(&config.connection_url).await?);
//! let (job_queue, worker) = JobQueue::new();
//! tokio::spawn(worker.run());
//!
//! // Publish from anywhere in the process
//! let publisher = Publisher::new(transport.clone());
//! publisher.publish("orders", &serde_json::json!({"id": 1})).await?;
//!
//! // Run the subscription; returns only on fatal error
//! let service = SubscriberService::new(
//!     config,
//!     Arc::new(registry),
//!     transport,
//!     Arc::new(job_queue),
//!     Arc::new(EventBus::new()),
//! )?;
//! service.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod jobs;
pub mod logging;
pub mod messaging;
pub mod publisher;
pub mod registry;
pub mod subscriber;

pub use config::{ChannelBinding, DispatcherConfig};
pub use dispatch::{classify, ChannelRouter, HandlerCategory, HandlerInvoker};
pub use error::{DispatchError, DispatchResult};
pub use events::{BroadcastEvent, EventBus, EventListener};
pub use jobs::{JobQueue, JobQueueStats, JobQueueWorker, QueuedJob};
pub use messaging::{Message, MessageSink, RedisTransport, Transport};
pub use publisher::Publisher;
pub use registry::{
    CallableFactory, EventFactory, HandlerPayload, HandlerRegistration, HandlerRegistry,
    JobFactory, MessageHandler,
};
pub use subscriber::{SubscriberService, SubscriptionState};
