//! # Messaging Module
//!
//! Transport boundary for the dispatcher: the `Transport` trait consumed by
//! the subscriber service and publisher, the Redis-backed implementation, and
//! the per-delivery message structure.

pub mod message;
pub mod redis_transport;
pub mod transport;

pub use message::*;
pub use redis_transport::*;
pub use transport::*;
