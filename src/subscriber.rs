//! # Subscriber Service
//!
//! The subscription lifecycle: validates configuration, announces the
//! channels and handlers being listened to, establishes the long-lived
//! subscription, and surfaces transport failure to the embedding process.
//!
//! The service moves `Idle -> Subscribed` once at startup. `Subscribed` is
//! terminal until process exit or a fatal transport error, which moves the
//! service to `Failed`; recovery is external supervision and restart, never
//! in-process retry.

use crate::config::DispatcherConfig;
use crate::dispatch::{classify, ChannelRouter, HandlerInvoker};
use crate::error::{DispatchError, DispatchResult};
use crate::events::EventBus;
use crate::jobs::JobQueue;
use crate::logging::log_dispatch_error;
use crate::messaging::Transport;
use crate::registry::HandlerRegistry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Lifecycle state of the subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Before the subscription is established
    Idle,
    /// Actively receiving messages
    Subscribed,
    /// Terminated by a fatal transport error
    Failed,
}

/// Long-running subscription binding the transport to the channel router
pub struct SubscriberService {
    config: DispatcherConfig,
    registry: Arc<HandlerRegistry>,
    transport: Arc<dyn Transport>,
    router: Arc<ChannelRouter>,
    state: RwLock<SubscriptionState>,
}

impl SubscriberService {
    /// Assemble the service. Validates channel-map invariants and wires the
    /// router to the job queue and event bus.
    pub fn new(
        config: DispatcherConfig,
        registry: Arc<HandlerRegistry>,
        transport: Arc<dyn Transport>,
        job_queue: Arc<JobQueue>,
        event_bus: Arc<EventBus>,
    ) -> DispatchResult<Self> {
        config.validate()?;

        let invoker = HandlerInvoker::new(job_queue, event_bus);
        let router = Arc::new(ChannelRouter::new(&config, registry.clone(), invoker));

        Ok(Self {
            config,
            registry,
            transport,
            router,
            state: RwLock::new(SubscriptionState::Idle),
        })
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SubscriptionState {
        *self.state.read().await
    }

    /// Run the subscription until process shutdown or a fatal transport
    /// error. Fails fast with a `Configuration` error when no channels are
    /// configured, before the transport is touched.
    pub async fn run(&self) -> DispatchResult<()> {
        if self.config.channels.is_empty() {
            let err = DispatchError::configuration("No channels configured");
            error!("Failed to start subscription: {}", err);
            log_dispatch_error("SubscriberService", "run", &err, None);
            return Err(err);
        }

        self.announce()?;

        {
            let mut state = self.state.write().await;
            *state = SubscriptionState::Subscribed;
        }

        let channels = self.config.channel_names();
        let result = self.transport.subscribe(&channels, self.router.clone()).await;

        {
            let mut state = self.state.write().await;
            *state = SubscriptionState::Failed;
        }

        let err = match result {
            Ok(()) => DispatchError::transport("subscription loop ended unexpectedly"),
            Err(e) => e,
        };
        error!("Subscription terminated: {}", err);
        log_dispatch_error("SubscriberService", "subscribe", &err, None);
        Err(err)
    }

    /// Startup banner: the channels being listened to and each handler with
    /// its resolved category. An unresolvable or unclassifiable handler in
    /// the configuration is a startup failure.
    fn announce(&self) -> DispatchResult<()> {
        info!("🚀 Starting subscription service...");

        for binding in &self.config.channels {
            info!("📡 Listening on channel: {}", binding.channel);
            for handler_id in &binding.handlers {
                let registration = self.registry.resolve(handler_id)?;
                let category = classify(&registration)?;
                info!("   └─ 🔧 Handler: {} ({})", handler_id, category);
            }
        }

        Ok(())
    }
}
