//! # Dispatch Error Types
//!
//! Structured error handling for the subscription-and-dispatch engine using
//! thiserror instead of `Box<dyn Error>` patterns.
//!
//! The taxonomy splits along the propagation boundary: handler-scoped errors
//! are caught at the router and never terminate the subscription loop, while
//! configuration and transport errors are fatal and surface to the embedding
//! process.

use thiserror::Error;

/// Comprehensive error types for subscription and dispatch operations
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown handler: [{handler_id}] is not registered")]
    UnknownHandler { handler_id: String },

    #[error("Cannot determine handler type for [{handler_id}]")]
    UnclassifiableHandler { handler_id: String },

    #[error("Handler [{handler_id}] is not properly configured: {reason}")]
    HandlerMisconfigured { handler_id: String, reason: String },

    #[error("Handler [{handler_id}] failed: {message}")]
    HandlerExecution { handler_id: String, message: String },

    #[error("Payload serialization error: {message}")]
    Serialization { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl DispatchError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown handler error
    pub fn unknown_handler(handler_id: impl Into<String>) -> Self {
        Self::UnknownHandler {
            handler_id: handler_id.into(),
        }
    }

    /// Create an unclassifiable handler error
    pub fn unclassifiable_handler(handler_id: impl Into<String>) -> Self {
        Self::UnclassifiableHandler {
            handler_id: handler_id.into(),
        }
    }

    /// Create a handler misconfiguration error
    pub fn handler_misconfigured(
        handler_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::HandlerMisconfigured {
            handler_id: handler_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a handler execution error
    pub fn handler_execution(handler_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerExecution {
            handler_id: handler_id.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether this error is scoped to a single handler invocation.
    ///
    /// Handler-scoped errors are caught at the router, logged, and dispatch
    /// continues with the next handler. Everything else propagates to the
    /// process boundary and translates to a non-zero exit status.
    pub fn is_handler_scoped(&self) -> bool {
        matches!(
            self,
            Self::UnknownHandler { .. }
                | Self::UnclassifiableHandler { .. }
                | Self::HandlerMisconfigured { .. }
                | Self::HandlerExecution { .. }
        )
    }
}

/// Conversion from serde_json::Error to DispatchError
impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::serialization(err.to_string())
    }
}

/// Conversion from redis::RedisError to DispatchError
impl From<redis::RedisError> for DispatchError {
    fn from(err: redis::RedisError) -> Self {
        DispatchError::transport(err.to_string())
    }
}

/// Result type alias for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;
