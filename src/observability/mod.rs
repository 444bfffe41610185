//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and handlers produce:
//!     → tracing events (facade log/logf, extraction rejections)
//!     → per-request spans (TraceLayer on the finalized router)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, filtered by RUST_LOG or config)
//! ```
//!
//! # Design Decisions
//! - Structured logging via the tracing crate
//! - Filter comes from the environment when set, the config file otherwise
//! - No buffering or level logic of our own; the subscriber owns both

pub mod logging;

pub use logging::init_logging;
