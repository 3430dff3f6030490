//! # Events Module
//!
//! In-process event bus: broadcast events constructed from message payloads
//! and delivered synchronously to registered listeners.

pub mod bus;

pub use bus::*;
