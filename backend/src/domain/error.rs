//! The one error type every service returns.
//!
//! An [`Error`] pairs a coarse [`ErrorCode`] with a message that is safe to
//! show the caller. Causes that are not safe to show are logged where they
//! occur and never stored here. Adapters decide how a code is rendered
//! (status line, headers); the JSON shape is fixed by the serde attributes
//! below.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Header name used to surface the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation or policy before any work was done.
    InvalidRequest,
    /// No usable session or bearer token.
    Unauthorized,
    /// The caller is known but lacks the role, or the target is refused.
    Forbidden,
    /// The named resource does not exist.
    NotFound,
    /// A unique value (such as a username) is already taken.
    Conflict,
    /// Login attempts exhausted for the current window.
    TooManyRequests,
    /// Anything the caller cannot act on. Always shown redacted.
    InternalError,
}

/// Why an [`Error`] could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    /// Message was blank.
    EmptyMessage,
    #[error("trace identifier must not be empty")]
    /// Trace id was blank.
    EmptyTraceId,
}

fn non_blank(value: String, otherwise: ErrorValidationError) -> Result<String, ErrorValidationError> {
    if value.trim().is_empty() {
        Err(otherwise)
    } else {
        Ok(value)
    }
}

/// Domain error payload.
///
/// The message is never blank and neither is a trace id when one is
/// attached. Building an error inside a request picks up that request's
/// [`TraceId`].
///
/// # Examples
/// ```
/// use bastion::domain::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::invalid_request("port out of range").with_details(json!({"field": "port"}));
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(
///     serde_json::to_value(&err).unwrap(),
///     json!({"code": "invalid_request", "message": "port out of range", "details": {"field": "port"}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Unchecked")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Wire form accepted before the invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Unchecked {
    code: ErrorCode,
    message: String,
    #[serde(default, alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

impl TryFrom<Unchecked> for Error {
    type Error = ErrorValidationError;

    fn try_from(raw: Unchecked) -> Result<Self, Self::Error> {
        let mut error = Self::try_new(raw.code, raw.message.trim())?;
        error.trace_id = raw
            .trace_id
            .map(|id| non_blank(id, ErrorValidationError::EmptyTraceId))
            .transpose()?;
        error.details = raw.details;
        Ok(error)
    }
}

macro_rules! code_constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for `Error::new(ErrorCode::", stringify!($code), ", message)`.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// Build an error for `code`.
    ///
    /// # Panics
    /// When `message` is blank. Call sites pass literals or formatted
    /// messages that always have content; use [`Error::try_new`] otherwise.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|err| panic!("invalid error constructed: {err}"))
    }

    /// Build an error, refusing a blank message.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        Ok(Self {
            code,
            message: non_blank(message.into(), ErrorValidationError::EmptyMessage)?,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    code_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        too_many_requests => TooManyRequests,
        internal => InternalError,
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Caller-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Request correlation id, when one was in scope or attached.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured context for the caller.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the trace id captured at construction.
    ///
    /// # Panics
    /// When `id` is blank.
    #[must_use]
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        self.try_with_trace_id(id)
            .unwrap_or_else(|err| panic!("invalid trace id attached: {err}"))
    }

    /// Fallible form of [`Error::with_trace_id`].
    pub fn try_with_trace_id(mut self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        self.trace_id = Some(non_blank(id.into(), ErrorValidationError::EmptyTraceId)?);
        Ok(self)
    }

    /// Attach machine-readable context, such as the offending field.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
