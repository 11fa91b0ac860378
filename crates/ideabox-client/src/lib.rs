//! # ideabox-client
//!
//! The [`DataStore`] context object: it guards the session, calls the remote
//! [`ApiClient`] for every logical operation, reconciles each response into
//! the normalized cache and publishes what changed.

pub mod api;
pub mod commands;
pub mod config;
pub mod events;
pub mod state;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

use tracing_subscriber::{fmt, EnvFilter};

pub use api::{ApiClient, ApiResult};
pub use commands::UserRef;
pub use config::ClientConfig;
pub use events::{Change, Subscription};
pub use status::{Operation, Status, Statuses};
pub use store::DataStore;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter.  Calling this twice keeps the
/// first subscriber.
pub fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    if installed.is_ok() {
        tracing::info!("ideabox client logging initialised");
    }
}
