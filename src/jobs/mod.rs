//! # Jobs Module
//!
//! Asynchronous work queue: jobs built from message payloads are submitted
//! fire-and-forget and executed by a worker task outside the subscription
//! loop.

pub mod queue;

pub use queue::*;
