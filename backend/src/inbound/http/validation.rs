//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field-level failures carry `{field, code}` details. Extractor failures
//! (bad JSON, wrong content type, oversized body, bad query string) are
//! turned into `invalid_request` errors with generic messages so parser
//! internals never reach the caller.

use std::fmt::Display;

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Maximum accepted JSON request body, in bytes.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidField,
    MalformedBody,
    BodyTooLarge,
    UnsupportedContentType,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidField => "invalid_field",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::BodyTooLarge => "body_too_large",
            ErrorCode::UnsupportedContentType => "unsupported_content_type",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// `invalid_request` naming the offending field.
pub(crate) fn invalid_field_error(field: FieldName, message: impl Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidField.as_str(),
    }))
}

fn request_error(code: ErrorCode, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

/// `JsonConfig` error handler.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = req.path(), error = %err, "rejected JSON body");
    let error = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            request_error(ErrorCode::BodyTooLarge, "request body is too large")
        }
        JsonPayloadError::ContentType => request_error(
            ErrorCode::UnsupportedContentType,
            "request body must be application/json",
        ),
        _ => request_error(ErrorCode::MalformedBody, "request body must be valid JSON"),
    };
    error.into()
}

/// `QueryConfig` error handler.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = req.path(), error = %err, "rejected query string");
    request_error(ErrorCode::MalformedQuery, "query string is invalid").into()
}
