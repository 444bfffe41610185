//! UUID path-parameter middleware.
//!
//! # Responsibilities
//! - Require a `{uuid}` path parameter on the wrapped route
//! - Reject malformed UUIDs with 400 and the parse error text
//! - Reject the all-zero nil UUID with 400 (syntactically valid, semantically
//!   empty; treated the same as malformed input)
//! - Hand the parsed UUID back to handlers on request

use axum::http::{Extensions, Request};
use thiserror::Error;
use uuid::Uuid;

use super::path_param::{
    extract_param, param_from_extensions, param_from_request, ExtractParamLayer, ParamError,
};

/// Parameter name reserved for [`require_uuid`].
pub const UUID_PARAM: &str = "uuid";

/// Rejections produced while parsing the `{uuid}` parameter.
#[derive(Debug, Error)]
pub enum InvalidUuid {
    /// The parameter text is not a UUID.
    #[error(transparent)]
    Unparseable(#[from] uuid::Error),

    /// The parameter parsed to the all-zero nil UUID.
    #[error("invalid uuid")]
    Nil,
}

type UuidParser = fn(&str) -> Result<Uuid, InvalidUuid>;

fn parse_non_nil(raw: &str) -> Result<Uuid, InvalidUuid> {
    let uuid = Uuid::parse_str(raw)?;
    if uuid.is_nil() {
        return Err(InvalidUuid::Nil);
    }
    Ok(uuid)
}

/// Middleware requiring a non-nil `{uuid}` path parameter.
pub fn require_uuid() -> ExtractParamLayer<Uuid, UuidParser> {
    extract_param(UUID_PARAM, parse_non_nil as UuidParser)
}

/// Retrieve the UUID stored by [`require_uuid`] from a request.
pub fn uuid_from_request<B>(req: &Request<B>) -> Result<Uuid, ParamError> {
    param_from_request(req, UUID_PARAM)
}

/// Retrieve the UUID stored by [`require_uuid`] from request extensions.
pub fn uuid_from_extensions(extensions: &Extensions) -> Result<Uuid, ParamError> {
    param_from_extensions(extensions, UUID_PARAM)
}
