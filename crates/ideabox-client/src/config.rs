//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so a [`DataStore`](crate::DataStore) can be
//! built with zero configuration.

/// Default `tracing` filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "ideabox_client=debug,ideabox_store=info,warn";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Serialize reaction toggles on the same idea inside the store.
    /// Env: `IDEABOX_SERIALIZE_REACTIONS` (true/false)
    /// Default: `true`
    pub serialize_reactions: bool,

    /// Capacity of the change notification channel.  Slow subscribers that
    /// fall further behind than this skip ahead.
    /// Env: `IDEABOX_EVENT_CAPACITY`
    /// Default: `256`
    pub event_capacity: usize,

    /// Log filter applied by [`init_tracing`](crate::init_tracing).
    /// Env: `IDEABOX_LOG`
    /// Default: [`DEFAULT_LOG_FILTER`]
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            serialize_reactions: true,
            event_capacity: 256,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("IDEABOX_SERIALIZE_REACTIONS") {
            config.serialize_reactions = val != "false" && val != "0";
        }

        if let Some(val) = lookup("IDEABOX_EVENT_CAPACITY") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.event_capacity = n,
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid IDEABOX_EVENT_CAPACITY, using default"
                    );
                }
            }
        }

        if let Some(filter) = lookup("IDEABOX_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }
}
