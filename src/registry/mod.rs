//! # Registry Module
//!
//! Handler registration and resolution: string identifiers map to explicit
//! factory functions populated at startup, replacing reflective instantiation
//! by bare type name.

pub mod handler_registry;

pub use handler_registry::*;
