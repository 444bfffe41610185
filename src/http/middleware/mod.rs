//! Middleware for routes built on the service router.
//!
//! # Data Flow
//! ```text
//! Incoming request (matched route, raw path parameters)
//!     → path_param.rs / uuid.rs (parse, store typed value, or 400)
//!     → handler (reads values back via *_from_request / *_from_extensions)
//! ```
//!
//! # Design Decisions
//! - Extraction failures answer the request here; retrieval failures are
//!   plain values for the handler to map to a response
//! - One store per request, keyed by parameter name

pub mod cors;
pub mod path_param;
pub mod uuid;

pub use self::path_param::{
    extract_param, param_from_extensions, param_from_request, ExtractParam, ExtractParamLayer,
    ParamError,
};
pub use self::uuid::{require_uuid, uuid_from_extensions, uuid_from_request, InvalidUuid, UUID_PARAM};
