//! # Dispatcher Configuration
//!
//! Static configuration for the subscription-and-dispatch engine: the ordered
//! channel-to-handler mapping, the transport connection URL, the namespace
//! prefix the transport silently adds to channel names, and the payload
//! decoding policy. Loaded once at startup and immutable for the lifetime of
//! the subscription.

use crate::error::{DispatchError, DispatchResult};
use std::collections::HashSet;

/// A single channel binding: one channel name and its ordered handler list.
///
/// The handler list may be empty (a no-op channel) or contain one-to-many
/// handler identifiers resolvable through the handler registry.
#[derive(Debug, Clone)]
pub struct ChannelBinding {
    pub channel: String,
    pub handlers: Vec<String>,
}

impl ChannelBinding {
    /// Create a binding with an ordered list of handlers
    pub fn new(channel: impl Into<String>, handlers: Vec<String>) -> Self {
        Self {
            channel: channel.into(),
            handlers,
        }
    }

    /// Create a binding with a single handler
    pub fn single(channel: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            handlers: vec![handler.into()],
        }
    }
}

/// Configuration for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Ordered channel bindings; channel names must be unique
    pub channels: Vec<ChannelBinding>,
    /// Transport connection URL
    pub connection_url: String,
    /// Namespace prefix the transport prepends to delivered channel names,
    /// stripped before channel lookup
    pub channel_prefix: String,
    /// Whether to JSON-decode the raw payload before handing it to handlers.
    /// When disabled, or when decoding fails, handlers receive the raw string.
    pub decode_json_payload: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            connection_url: "redis://127.0.0.1:6379".to_string(),
            channel_prefix: String::new(),
            decode_json_payload: true,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build configuration from environment variables, falling back to defaults
    pub fn from_env() -> DispatchResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DISPATCH_REDIS_URL") {
            config.connection_url = url;
        }

        if let Ok(prefix) = std::env::var("DISPATCH_CHANNEL_PREFIX") {
            config.channel_prefix = prefix;
        }

        if let Ok(decode) = std::env::var("DISPATCH_DECODE_JSON") {
            config.decode_json_payload = decode.parse().map_err(|e| {
                DispatchError::configuration(format!("Invalid DISPATCH_DECODE_JSON: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Add a channel binding (builder style)
    pub fn with_channel(mut self, binding: ChannelBinding) -> Self {
        self.channels.push(binding);
        self
    }

    /// Set the namespace prefix to strip from delivered channel names
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    /// Set the transport connection URL
    pub fn with_connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = url.into();
        self
    }

    /// Validate invariants: channel names must be unique within the mapping
    pub fn validate(&self) -> DispatchResult<()> {
        let mut seen = HashSet::new();
        for binding in &self.channels {
            if !seen.insert(binding.channel.as_str()) {
                return Err(DispatchError::configuration(format!(
                    "Duplicate channel name in configuration: {}",
                    binding.channel
                )));
            }
        }
        Ok(())
    }

    /// The configured channel names, in configuration order
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|b| b.channel.clone()).collect()
    }
}
