//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address parses as a socket address
//! - Check the client URI is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `listener.bind_address` is not a socket address.
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    /// `client.uri` is not an absolute URL.
    #[error("client.uri {0:?} is not an absolute URL")]
    ClientUri(String),

    /// `client.uri` uses a scheme other than http or https.
    #[error("client.uri {0:?} must use http or https")]
    ClientUriScheme(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.client.uri) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::ClientUriScheme(config.client.uri.clone()));
        }
        Ok(_) => {}
        Err(_) => {
            errors.push(ValidationError::ClientUri(config.client.uri.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
