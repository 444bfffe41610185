//! Structured logging.
//!
//! # Responsibilities
//! - Install the process-wide tracing subscriber
//! - Apply the configured filter when RUST_LOG is unset
//!
//! # Design Decisions
//! - RUST_LOG always wins over the config file
//! - Pretty stdout format; aggregation concerns belong to the deployment

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
