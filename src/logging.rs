//! # Structured Logging Module
//!
//! Environment-aware structured logging for the subscription loop and handler
//! dispatch. Every failure produces both an interactive status line and a
//! structured error record.

use crate::error::DispatchError;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let subscriber = tracing_subscriber::fmt()
            .with_target(true)
            .with_level(true)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
            );

        // Use try_init to avoid panic if a global subscriber already exists
        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("DISPATCH_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log a dispatch failure with full `{error, context}` record
pub fn log_dispatch_error(
    component: &str,
    operation: &str,
    error: &DispatchError,
    context: Option<&serde_json::Value>,
) {
    let context = context.map(std::string::ToString::to_string);
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        handler_scoped = error.is_handler_scoped(),
        context = context.as_deref(),
        timestamp = %Utc::now().to_rfc3339(),
        "❌ DISPATCH_ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_detection() {
        std::env::set_var("DISPATCH_ENV", "test_override");
        let env = get_environment();
        assert_eq!(env, "test_override");
        std::env::remove_var("DISPATCH_ENV");
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("test"), "debug");
    }
}
