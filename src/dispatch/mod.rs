//! # Dispatch Module
//!
//! The subscription-and-dispatch engine core: handler classification, the
//! per-category invocation contract, and the channel router that ties them
//! together with per-handler failure isolation.

pub mod classifier;
pub mod invoker;
pub mod router;

pub use classifier::*;
pub use invoker::*;
pub use router::*;
