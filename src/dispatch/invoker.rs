//! # Handler Invoker
//!
//! Executes a classified handler against one message according to its
//! category's invocation contract:
//!
//! - `Job`: build a job from the payload and submit it to the work queue,
//!   fire-and-forget
//! - `Event`: build an event from the payload and broadcast it synchronously;
//!   returns once all in-process listeners have run
//! - `Callable`: construct the handler and await `handle(payload)` inline
//!
//! Any underlying failure surfaces as `HandlerExecution` scoped to the
//! handler identifier. A category/capability mismatch (possible only when
//! invoked with a category that was not derived from the same registration)
//! fails with `HandlerMisconfigured`.

use crate::dispatch::classifier::HandlerCategory;
use crate::error::{DispatchError, DispatchResult};
use crate::events::EventBus;
use crate::jobs::JobQueue;
use crate::messaging::Message;
use crate::registry::{HandlerPayload, HandlerRegistration};
use std::sync::Arc;
use tracing::info;

/// Invokes handlers per their category's contract
pub struct HandlerInvoker {
    job_queue: Arc<JobQueue>,
    event_bus: Arc<EventBus>,
}

impl HandlerInvoker {
    pub fn new(job_queue: Arc<JobQueue>, event_bus: Arc<EventBus>) -> Self {
        Self {
            job_queue,
            event_bus,
        }
    }

    /// Invoke one handler for one message
    pub async fn invoke(
        &self,
        registration: &HandlerRegistration,
        category: HandlerCategory,
        message: &Message,
        payload: HandlerPayload,
    ) -> DispatchResult<()> {
        let handler_id = registration.handler_id();

        match category {
            HandlerCategory::Job => {
                let job = registration.build_job(payload)?;
                self.job_queue.submit(job).map_err(|e| {
                    DispatchError::handler_execution(handler_id, e.to_string())
                })?;
                info!("✅ Dispatched job: {}", handler_id);
            }
            HandlerCategory::Event => {
                let event = registration
                    .build_event(payload)?
                    .with_channel(message.channel.clone());
                self.event_bus.broadcast(event).await.map_err(|e| {
                    DispatchError::handler_execution(handler_id, e.to_string())
                })?;
                info!("✅ Dispatched event: {}", handler_id);
            }
            HandlerCategory::Callable => {
                let instance = registration.construct()?;
                instance.handle(payload).await.map_err(|e| {
                    DispatchError::handler_execution(handler_id, e.to_string())
                })?;
                info!("✅ Invoked handler: {}", handler_id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BroadcastEvent, EventListener};
    use crate::jobs::QueuedJob;
    use crate::registry::MessageHandler;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct CountingHandler {
        calls: Arc<AtomicU64>,
    }

    #[async_trait::async_trait]
    impl MessageHandler for CountingHandler {
        async fn handle(&self, _payload: HandlerPayload) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    struct CountingJob {
        runs: Arc<AtomicU64>,
    }

    #[async_trait::async_trait]
    impl QueuedJob for CountingJob {
        async fn execute(&self) -> anyhow::Result<()> {
            self.runs.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    struct CountingListener {
        events: Arc<AtomicU64>,
    }

    #[async_trait::async_trait]
    impl EventListener for CountingListener {
        async fn on_event(&self, _event: &BroadcastEvent) -> anyhow::Result<()> {
            self.events.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn invoker_with_worker() -> (HandlerInvoker, Arc<JobQueue>, Arc<EventBus>) {
        let (queue, worker) = JobQueue::new();
        tokio::spawn(worker.run());
        let queue = Arc::new(queue);
        let bus = Arc::new(EventBus::new());
        (HandlerInvoker::new(queue.clone(), bus.clone()), queue, bus)
    }

    #[tokio::test]
    async fn test_callable_invocation() {
        let (invoker, _queue, _bus) = invoker_with_worker();
        let calls = Arc::new(AtomicU64::new(0));
        let calls_clone = calls.clone();

        let registration = HandlerRegistration::callable("orders.count", move || {
            Arc::new(CountingHandler {
                calls: calls_clone.clone(),
            })
        });
        let message = Message::new("orders", "{}");

        invoker
            .invoke(
                &registration,
                HandlerCategory::Callable,
                &message,
                serde_json::json!({}),
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_job_invocation_is_fire_and_forget() {
        let (invoker, queue, _bus) = invoker_with_worker();
        let runs = Arc::new(AtomicU64::new(0));
        let runs_clone = runs.clone();

        let registration = HandlerRegistration::job("orders.process", move |_payload| {
            Box::new(CountingJob {
                runs: runs_clone.clone(),
            })
        });
        let message = Message::new("orders", "{}");

        invoker
            .invoke(
                &registration,
                HandlerCategory::Job,
                &message,
                serde_json::json!({}),
            )
            .await
            .unwrap();

        // Submission returns before execution; wait for the worker.
        for _ in 0..100 {
            if queue.stats().completed == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(runs.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_event_invocation_carries_channel() {
        let (invoker, _queue, bus) = invoker_with_worker();
        let events = Arc::new(AtomicU64::new(0));
        bus.register_listener(
            "order.received",
            Arc::new(CountingListener {
                events: events.clone(),
            }),
        )
        .await;

        let registration = HandlerRegistration::event("orders.announce", |payload| {
            BroadcastEvent::new("order.received", payload)
        });
        let message = Message::new("orders", "{}");

        invoker
            .invoke(
                &registration,
                HandlerCategory::Event,
                &message,
                serde_json::json!({"id": 1}),
            )
            .await
            .unwrap();

        assert_eq!(events.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_category_capability_mismatch() {
        let (invoker, _queue, _bus) = invoker_with_worker();

        // Callable-only registration invoked as a job must fail with a
        // misconfiguration error.
        let registration = HandlerRegistration::callable("orders.count", || {
            Arc::new(CountingHandler {
                calls: Arc::new(AtomicU64::new(0)),
            })
        });
        let message = Message::new("orders", "{}");

        let err = invoker
            .invoke(
                &registration,
                HandlerCategory::Job,
                &message,
                serde_json::json!({}),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::HandlerMisconfigured { .. }));
    }
}
