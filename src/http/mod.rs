//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → router.rs (facade: route dispatch via Axum)
//!     → middleware/ (path-parameter extraction into request context, or 400)
//!     → handler (reads context values, responds through the facade)
//!     → response (JSON encode, Location/Set-Cookie headers as needed)
//! ```
//!
//! # Design Decisions
//! - Routing, connection handling and TLS stay with Axum/tokio and the
//!   fronting proxy; this layer only adds extraction and response helpers
//! - Per-request state lives in the request's extensions, never on the facade

pub mod middleware;
pub mod router;

pub use router::{DecodeError, ServiceRouter};
