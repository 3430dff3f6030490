//! # Handler Classifier
//!
//! Derives a handler's invocation category from the capabilities its
//! registration declares. Classification is ordered and first-match-wins
//! because capabilities are not mutually exclusive: a registration may
//! declare several, and the queue-dispatchable capability takes precedence
//! over event dispatch, which takes precedence over direct invocation.

use crate::error::{DispatchError, DispatchResult};
use crate::registry::HandlerRegistration;
use std::fmt;

/// Invocation category of a handler, derived at dispatch time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerCategory {
    /// Deferred, queued asynchronous work
    Job,
    /// In-process broadcast to registered listeners
    Event,
    /// Directly invoked inline
    Callable,
}

impl fmt::Display for HandlerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerCategory::Job => write!(f, "job"),
            HandlerCategory::Event => write!(f, "event"),
            HandlerCategory::Callable => write!(f, "callable"),
        }
    }
}

/// Classify a handler registration.
///
/// Ordered rule: queue-dispatchable wins, then event-dispatchable, then
/// callable. For the callable case the handler is constructed once to verify
/// it is invokable - constructor side effects are tolerated as an inherent
/// cost of classification. Fails with `UnclassifiableHandler` when the
/// registration declares no capability at all.
pub fn classify(registration: &HandlerRegistration) -> DispatchResult<HandlerCategory> {
    if registration.is_queueable() {
        return Ok(HandlerCategory::Job);
    }

    if registration.is_event_dispatchable() {
        return Ok(HandlerCategory::Event);
    }

    if registration.has_callable() {
        let _instance = registration.construct()?;
        return Ok(HandlerCategory::Callable);
    }

    Err(DispatchError::unclassifiable_handler(
        registration.handler_id(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BroadcastEvent;
    use crate::jobs::QueuedJob;
    use crate::registry::MessageHandler;
    use std::sync::Arc;

    struct NoopHandler;

    #[async_trait::async_trait]
    impl MessageHandler for NoopHandler {
        async fn handle(&self, _payload: serde_json::Value) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoopJob;

    #[async_trait::async_trait]
    impl QueuedJob for NoopJob {
        async fn execute(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_job_classification() {
        let registration = HandlerRegistration::job("jobs.noop", |_payload| Box::new(NoopJob));
        assert_eq!(classify(&registration).unwrap(), HandlerCategory::Job);
    }

    #[test]
    fn test_event_classification() {
        let registration = HandlerRegistration::event("events.noop", |payload| {
            BroadcastEvent::new("noop", payload)
        });
        assert_eq!(classify(&registration).unwrap(), HandlerCategory::Event);
    }

    #[test]
    fn test_callable_classification() {
        let registration =
            HandlerRegistration::callable("callables.noop", || Arc::new(NoopHandler));
        assert_eq!(classify(&registration).unwrap(), HandlerCategory::Callable);
    }

    #[test]
    fn test_job_takes_precedence_over_callable() {
        let registration = HandlerRegistration::callable("mixed", || Arc::new(NoopHandler))
            .with_job_factory(|_payload| Box::new(NoopJob));
        assert_eq!(classify(&registration).unwrap(), HandlerCategory::Job);
    }

    #[test]
    fn test_event_takes_precedence_over_callable() {
        let registration = HandlerRegistration::callable("mixed", || Arc::new(NoopHandler))
            .with_event_factory(|payload| BroadcastEvent::new("mixed", payload));
        assert_eq!(classify(&registration).unwrap(), HandlerCategory::Event);
    }

    #[test]
    fn test_no_capability_is_unclassifiable() {
        let registration = HandlerRegistration::new("mystery");
        let err = classify(&registration).unwrap_err();
        assert!(matches!(err, DispatchError::UnclassifiableHandler { .. }));
        assert!(format!("{err}").contains("mystery"));
    }
}
