//! HTTP service plumbing: typed path-parameter middleware and a router
//! facade for Axum services.
//!
//! # Architecture Overview
//! ```text
//! Incoming request
//!     → ServiceRouter (route dispatch, delegated to Axum)
//!     → extract_param / require_uuid (parse parameter → request context, or 400)
//!     → handler (param_from_request / uuid_from_request, respond/decode/
//!       set_location/set_cookie through the facade)
//! ```
//!
//! Connection handling, TLS termination and body limits stay with the
//! standard stack and the fronting proxy; this crate only adds the
//! extraction and response plumbing between them.

// Core subsystems
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod observability;

pub use config::{load_config, ServiceConfig};
pub use http::middleware::{
    extract_param, param_from_extensions, param_from_request, require_uuid, uuid_from_extensions,
    uuid_from_request, ParamError,
};
pub use http::{DecodeError, ServiceRouter};
pub use observability::init_logging;
