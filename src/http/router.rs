//! Router facade.
//!
//! # Responsibilities
//! - Expose routing by delegation to an inner Axum router
//! - Encode responses and decode request bodies (JSON)
//! - Construct redirect Location headers from the request's scheme and host
//! - Set cookies and write log lines
//! - Hand out the configured client application URI
//!
//! # Design Decisions
//! - One capability surface: handlers depend on this type instead of axum,
//!   serde_json, cookie and tracing individually
//! - Holds no per-request state; a single instance serves all requests
//! - Encoding failures stay the encoder's concern (axum answers 500);
//!   decoding failures are returned for the handler to map

use std::convert::Infallible;
use std::fmt;
use std::io;

use axum::body::{to_bytes, Body};
use axum::http::header::{HeaderValue, HOST, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::uri::Scheme;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, Route};
use axum::{Json, Router};
use cookie::Cookie;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{Layer, Service};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::http::middleware::cors;

const LOG_TARGET: &str = "service";

/// Errors surfaced by [`ServiceRouter::decode`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),

    /// The body was read but is not valid JSON for the target type.
    #[error("failed to decode request body: {0}")]
    Json(#[from] serde_json::Error),
}

/// The application router.
///
/// Wraps an [`axum::Router`] and the process configuration relevant to
/// handlers. Build it once at startup, register routes, then call
/// [`ServiceRouter::serve`] (or [`ServiceRouter::into_router`] to embed it).
#[derive(Clone)]
pub struct ServiceRouter {
    router: Router,
    client_uri: String,
}

impl ServiceRouter {
    /// Create a facade around a fresh router.
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            router: Router::new(),
            client_uri: config.client.uri.clone(),
        }
    }

    /// Register a handler for the given path. Returns `self` for chaining.
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Nest a router under a path prefix.
    pub fn nest(mut self, path: &str, router: Router) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    /// Merge the routes of another router.
    pub fn merge(mut self, other: Router) -> Self {
        self.router = self.router.merge(other);
        self
    }

    /// Apply a middleware layer to all routes registered so far.
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.router = self.router.layer(layer);
        self
    }

    /// Apply a middleware layer that only runs on matched routes.
    pub fn route_layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.router = self.router.route_layer(layer);
        self
    }

    /// Serialize `data` into a JSON response with the given status code.
    pub fn respond<T: Serialize>(&self, data: &T, status: StatusCode) -> Response {
        (status, Json(data)).into_response()
    }

    /// Deserialize the request body as JSON.
    ///
    /// The caller decides the HTTP consequence of a failure.
    pub async fn decode<T: DeserializeOwned>(&self, req: Request<Body>) -> Result<T, DecodeError> {
        // Body size is capped upstream by the fronting proxy.
        let bytes = to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(DecodeError::Read)?;
        serde_json::from_slice(&bytes).map_err(DecodeError::Json)
    }

    /// Write an absolute `Location` header for `path` on `res`.
    ///
    /// The scheme follows the inbound connection: `https` when the request
    /// arrived over TLS (absolute https URI, or `x-forwarded-proto: https`
    /// from the terminating proxy), `http` otherwise. `path` is neither
    /// encoded nor validated.
    pub fn set_location(&self, res: &mut Response, parts: &Parts, path: &str) {
        let Some(host) = request_host(parts) else {
            warn!(target: LOG_TARGET, "request has no host; location header not set");
            return;
        };

        let location = format!("{}://{}{}", request_scheme(parts), host, path);
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                res.headers_mut().insert(LOCATION, value);
            }
            Err(_) => {
                warn!(target: LOG_TARGET, location = %location, "location is not a valid header value");
            }
        }
    }

    /// Append a `Set-Cookie` header to `res`. No added validation.
    pub fn set_cookie(&self, res: &mut Response, cookie: &Cookie<'_>) {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(_) => {
                warn!(target: LOG_TARGET, cookie = %cookie.name(), "cookie is not a valid header value");
            }
        }
    }

    /// Write a log line through the process-wide subscriber.
    pub fn log(&self, message: impl AsRef<str>) {
        info!(target: LOG_TARGET, "{}", message.as_ref());
    }

    /// Write a formatted log line, e.g. `router.logf(format_args!("took {n}ms"))`.
    pub fn logf(&self, args: fmt::Arguments<'_>) {
        info!(target: LOG_TARGET, "{}", args);
    }

    /// The configured URI of the client application, for redirects and CORS.
    pub fn client_uri(&self) -> &str {
        &self.client_uri
    }

    /// Finalize into an [`axum::Router`], applying the client-origin CORS
    /// policy and per-request tracing.
    pub fn into_router(self) -> Router {
        self.router
            .layer(cors::layer(&self.client_uri))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let addr = listener.local_addr()?;
        info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.into_router()).await
    }
}

fn request_scheme(parts: &Parts) -> &'static str {
    if parts.uri.scheme() == Some(&Scheme::HTTPS) {
        return "https";
    }

    let forwarded = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok());
    if forwarded.is_some_and(|proto| proto.eq_ignore_ascii_case("https")) {
        "https"
    } else {
        "http"
    }
}

fn request_host(parts: &Parts) -> Option<&str> {
    if let Some(authority) = parts.uri.authority() {
        return Some(authority.as_str());
    }
    parts.headers.get(HOST).and_then(|value| value.to_str().ok())
}
