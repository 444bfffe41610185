//! CORS policy for the configured client application.
//!
//! # Responsibilities
//! - Allow exactly the configured client origin (no wildcard)
//! - Allow the standard method set and the headers browsers actually send
//!
//! # Design Decisions
//! - An unparseable client URI allows no origin at all, which is safer than
//!   accidentally allowing every origin
//! - No credentials support until something needs it

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// CORS layer allowing the client application's origin.
pub fn layer(client_uri: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]);

    match HeaderValue::from_str(client_uri.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!(client_uri, "client uri is not a valid origin; allowing none");
            cors
        }
    }
}
