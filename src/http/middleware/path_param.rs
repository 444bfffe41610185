//! Typed path-parameter extraction middleware.
//!
//! # Responsibilities
//! - Parse a named path parameter once, ahead of the handler
//! - Store the typed result in the request's extensions
//! - Reject unparseable parameters with 400 before the handler runs
//! - Hand stored values back to handlers on request
//!
//! # Design Decisions
//! - Storage is keyed by parameter name, so stacked extractors for
//!   different parameters never shadow each other
//! - Parsers receive the raw matched text, keeping them pure by construction
//! - Retrieval distinguishes "never stored" from "stored as another type"
//! - Extraction failures are terminal (400 written here); retrieval failures
//!   are returned to the handler, which owns the HTTP consequence

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::{Extensions, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tower::{Layer, Service};

/// Errors surfaced when retrieving a previously extracted parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// No value was stored under the requested name.
    #[error("path parameter {0:?} not found")]
    NotFound(String),

    /// A value exists under the name but was stored as a different type.
    #[error("path parameter {0:?} stored with a different type")]
    WrongType(String),
}

/// Per-request store for parsed path parameters, keyed by parameter name.
#[derive(Clone, Default)]
struct PathParamValues {
    values: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl PathParamValues {
    fn insert<T: Send + Sync + 'static>(&mut self, key: &'static str, value: T) {
        self.values.insert(key, Arc::new(value));
    }

    fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Result<T, ParamError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ParamError::NotFound(key.to_owned()))?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ParamError::WrongType(key.to_owned()))
    }
}

/// Build middleware that parses the path parameter `key` with `parse` and
/// stores the result for the layers and handler nested inside it.
///
/// On parse failure the request is answered with `400 Bad Request` and the
/// failure's display text; the wrapped service is never called.
pub fn extract_param<T, P, E>(key: &'static str, parse: P) -> ExtractParamLayer<T, P>
where
    P: Fn(&str) -> Result<T, E>,
{
    ExtractParamLayer {
        key,
        parse,
        _value: PhantomData,
    }
}

/// Layer form of [`extract_param`]. Apply with `Router::route_layer` or
/// `MethodRouter::layer`.
pub struct ExtractParamLayer<T, P> {
    key: &'static str,
    parse: P,
    _value: PhantomData<fn() -> T>,
}

impl<T, P: Clone> Clone for ExtractParamLayer<T, P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            parse: self.parse.clone(),
            _value: PhantomData,
        }
    }
}

impl<S, T, P: Clone> Layer<S> for ExtractParamLayer<T, P> {
    type Service = ExtractParam<S, T, P>;

    fn layer(&self, inner: S) -> Self::Service {
        ExtractParam {
            inner,
            key: self.key,
            parse: self.parse.clone(),
            _value: PhantomData,
        }
    }
}

/// The middleware service produced by [`ExtractParamLayer`].
pub struct ExtractParam<S, T, P> {
    inner: S,
    key: &'static str,
    parse: P,
    _value: PhantomData<fn() -> T>,
}

impl<S: Clone, T, P: Clone> Clone for ExtractParam<S, T, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            key: self.key,
            parse: self.parse.clone(),
            _value: PhantomData,
        }
    }
}

impl<S, T, P, E> Service<Request<Body>> for ExtractParam<S, T, P>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    T: Send + Sync + 'static,
    P: Fn(&str) -> Result<T, E> + Clone + Send + Sync + 'static,
    E: fmt::Display,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // The service that was polled ready must be the one that is called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let key = self.key;
        let parse = self.parse.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let raw = match RawPathParams::from_request_parts(&mut parts, &()).await {
                Ok(raw) => raw,
                Err(rejection) => return Ok(rejection.into_response()),
            };

            let Some(text) = raw
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value)
            else {
                return Ok(bad_request(format!("unknown path parameter {key:?}")));
            };

            let parsed = match (parse)(text) {
                Ok(parsed) => parsed,
                Err(err) => return Ok(bad_request(err.to_string())),
            };

            // Extend the existing store so stacked extractors keep their values.
            let mut values = parts
                .extensions
                .get::<PathParamValues>()
                .cloned()
                .unwrap_or_default();
            values.insert(key, parsed);
            parts.extensions.insert(values);

            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Retrieve a previously extracted parameter from a request.
pub fn param_from_request<T, B>(req: &Request<B>, key: &str) -> Result<T, ParamError>
where
    T: Clone + Send + Sync + 'static,
{
    param_from_extensions(req.extensions(), key)
}

/// Retrieve a previously extracted parameter from request extensions.
pub fn param_from_extensions<T>(extensions: &Extensions, key: &str) -> Result<T, ParamError>
where
    T: Clone + Send + Sync + 'static,
{
    extensions
        .get::<PathParamValues>()
        .ok_or_else(|| ParamError::NotFound(key.to_owned()))?
        .get(key)
}
