//! # Handler Registry
//!
//! Registry mapping handler identifiers to instantiable handler registrations.
//!
//! ## Overview
//!
//! The HandlerRegistry is the configuration-time answer to "what does this
//! handler identifier resolve to". Each [`HandlerRegistration`] carries up to
//! three capability factories - queued job, broadcast event, callable - and
//! the classifier derives the handler's category from which capabilities are
//! declared. Registrations are populated explicitly at startup and the
//! registry is immutable for the lifetime of the subscription.
//!
//! ## Usage
//!
//! ```rust
//! use channel_dispatch::registry::{HandlerRegistration, HandlerRegistry};
//! use channel_dispatch::registry::MessageHandler;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct LogOrder;
//!
//! #[async_trait]
//! impl MessageHandler for LogOrder {
//!     async fn handle(&self, _payload: serde_json::Value) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn handler_name(&self) -> &str {
//!         "log_order"
//!     }
//! }
//!
//! # fn main() -> Result<(), channel_dispatch::DispatchError> {
//! let mut registry = HandlerRegistry::new();
//! registry.register(HandlerRegistration::callable("orders.log_order", || {
//!     Arc::new(LogOrder)
//! }))?;
//!
//! let registration = registry.resolve("orders.log_order")?;
//! assert!(registration.has_callable());
//! # Ok(())
//! # }
//! ```

use crate::error::{DispatchError, DispatchResult};
use crate::events::BroadcastEvent;
use crate::jobs::QueuedJob;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Payload handed to handlers: decoded JSON when payload decoding is enabled
/// and the payload parses, otherwise the raw string wrapped in a JSON string
pub type HandlerPayload = serde_json::Value;

/// A callable handler: invoked synchronously inline with the message payload
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one message payload
    async fn handle(&self, payload: HandlerPayload) -> anyhow::Result<()>;

    /// Handler name for identification
    fn handler_name(&self) -> &str {
        "unnamed_handler"
    }
}

/// Factory constructing a callable handler instance
pub type CallableFactory = Arc<dyn Fn() -> Arc<dyn MessageHandler> + Send + Sync>;

/// Factory building a queued job from a message payload
pub type JobFactory = Arc<dyn Fn(HandlerPayload) -> Box<dyn QueuedJob> + Send + Sync>;

/// Factory building a broadcast event from a message payload
pub type EventFactory = Arc<dyn Fn(HandlerPayload) -> BroadcastEvent + Send + Sync>;

/// A registered handler: an identifier plus the capabilities it declares.
///
/// Capabilities are not mutually exclusive; classification picks the first
/// declared one in the order job, event, callable.
#[derive(Clone)]
pub struct HandlerRegistration {
    handler_id: String,
    job_factory: Option<JobFactory>,
    event_factory: Option<EventFactory>,
    callable_factory: Option<CallableFactory>,
}

impl std::fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("handler_id", &self.handler_id)
            .field("queueable", &self.job_factory.is_some())
            .field("event_dispatchable", &self.event_factory.is_some())
            .field("callable", &self.callable_factory.is_some())
            .finish()
    }
}

impl HandlerRegistration {
    /// Create an empty registration with no declared capabilities
    pub fn new(handler_id: impl Into<String>) -> Self {
        Self {
            handler_id: handler_id.into(),
            job_factory: None,
            event_factory: None,
            callable_factory: None,
        }
    }

    /// Create a queue-dispatchable registration
    pub fn job(
        handler_id: impl Into<String>,
        factory: impl Fn(HandlerPayload) -> Box<dyn QueuedJob> + Send + Sync + 'static,
    ) -> Self {
        Self::new(handler_id).with_job_factory(factory)
    }

    /// Create an event-dispatchable registration
    pub fn event(
        handler_id: impl Into<String>,
        factory: impl Fn(HandlerPayload) -> BroadcastEvent + Send + Sync + 'static,
    ) -> Self {
        Self::new(handler_id).with_event_factory(factory)
    }

    /// Create a callable registration
    pub fn callable(
        handler_id: impl Into<String>,
        factory: impl Fn() -> Arc<dyn MessageHandler> + Send + Sync + 'static,
    ) -> Self {
        Self::new(handler_id).with_callable_factory(factory)
    }

    /// Declare the queue-dispatchable capability
    pub fn with_job_factory(
        mut self,
        factory: impl Fn(HandlerPayload) -> Box<dyn QueuedJob> + Send + Sync + 'static,
    ) -> Self {
        self.job_factory = Some(Arc::new(factory));
        self
    }

    /// Declare the event-dispatchable capability
    pub fn with_event_factory(
        mut self,
        factory: impl Fn(HandlerPayload) -> BroadcastEvent + Send + Sync + 'static,
    ) -> Self {
        self.event_factory = Some(Arc::new(factory));
        self
    }

    /// Declare the callable capability
    pub fn with_callable_factory(
        mut self,
        factory: impl Fn() -> Arc<dyn MessageHandler> + Send + Sync + 'static,
    ) -> Self {
        self.callable_factory = Some(Arc::new(factory));
        self
    }

    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    /// Whether the handler declares itself queue-dispatchable
    pub fn is_queueable(&self) -> bool {
        self.job_factory.is_some()
    }

    /// Whether the handler declares itself event-dispatchable
    pub fn is_event_dispatchable(&self) -> bool {
        self.event_factory.is_some()
    }

    /// Whether the handler declares a callable constructor
    pub fn has_callable(&self) -> bool {
        self.callable_factory.is_some()
    }

    /// Build a queued job from a message payload
    pub fn build_job(&self, payload: HandlerPayload) -> DispatchResult<Box<dyn QueuedJob>> {
        let factory = self.job_factory.as_ref().ok_or_else(|| {
            DispatchError::handler_misconfigured(&self.handler_id, "no job factory declared")
        })?;
        Ok(factory(payload))
    }

    /// Build a broadcast event from a message payload
    pub fn build_event(&self, payload: HandlerPayload) -> DispatchResult<BroadcastEvent> {
        let factory = self.event_factory.as_ref().ok_or_else(|| {
            DispatchError::handler_misconfigured(&self.handler_id, "no event factory declared")
        })?;
        Ok(factory(payload))
    }

    /// Construct a callable handler instance. Constructor side effects are the
    /// registrant's responsibility; construction may happen on every dispatch.
    pub fn construct(&self) -> DispatchResult<Arc<dyn MessageHandler>> {
        let factory = self.callable_factory.as_ref().ok_or_else(|| {
            DispatchError::handler_misconfigured(&self.handler_id, "no callable factory declared")
        })?;
        Ok(factory())
    }
}

/// Registry of handler registrations, keyed by identifier.
///
/// Populated at startup, then shared immutably with the router - there is
/// exactly one reader per dispatch and no mutation after construction, so no
/// locking is needed on the dispatch path.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<HandlerRegistration>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Fails if the identifier is already taken.
    pub fn register(&mut self, registration: HandlerRegistration) -> DispatchResult<()> {
        let handler_id = registration.handler_id().to_string();
        if self.handlers.contains_key(&handler_id) {
            return Err(DispatchError::configuration(format!(
                "Handler [{handler_id}] is already registered"
            )));
        }

        debug!("📚 Registered handler: {}", handler_id);
        self.handlers.insert(handler_id, Arc::new(registration));
        Ok(())
    }

    /// Resolve a handler identifier to its registration
    pub fn resolve(&self, handler_id: &str) -> DispatchResult<Arc<HandlerRegistration>> {
        self.handlers
            .get(handler_id)
            .cloned()
            .ok_or_else(|| DispatchError::unknown_handler(handler_id))
    }

    /// All registered handler identifiers
    pub fn handler_ids(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    #[async_trait]
    impl MessageHandler for NoopHandler {
        async fn handle(&self, _payload: HandlerPayload) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(HandlerRegistration::callable("orders.noop", || {
                Arc::new(NoopHandler)
            }))
            .unwrap();

        let registration = registry.resolve("orders.noop").unwrap();
        assert_eq!(registration.handler_id(), "orders.noop");
        assert!(registration.has_callable());
        assert!(!registration.is_queueable());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(HandlerRegistration::new("orders.noop"))
            .unwrap();

        let err = registry
            .register(HandlerRegistration::new("orders.noop"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Configuration { .. }));
    }

    #[test]
    fn test_unknown_handler() {
        let registry = HandlerRegistry::new();
        let err = registry.resolve("orders.missing").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownHandler { .. }));
    }

    #[test]
    fn test_misconfigured_capability_access() {
        let registration = HandlerRegistration::new("orders.empty");

        let err = registration.construct().err().unwrap();
        assert!(matches!(err, DispatchError::HandlerMisconfigured { .. }));

        let err = registration
            .build_job(serde_json::json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, DispatchError::HandlerMisconfigured { .. }));
    }
}
