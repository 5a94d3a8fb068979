//! OpenAPI stand-ins for domain types.
//!
//! `domain::Error` and `domain::ErrorCode` stay free of utoipa derives; the
//! shapes below are registered under their names instead, so handler
//! annotations say `body = ErrorSchema` and the document names it `Error`.

use utoipa::ToSchema;

/// Error category, serialised in snake_case.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Validation failed; `details.field` names the input at fault.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No valid session or bearer token.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated, but the role or policy does not allow it.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// Username already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// Login throttled; see `Retry-After`.
    #[schema(rename = "too_many_requests")]
    TooManyRequests,
    /// Redacted server-side failure; quote `traceId` when reporting it.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Body of every non-2xx JSON response.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "fields are read by the utoipa derive only")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "host must be a hostname or IP address")]
    message: String,
    /// Same value as the `trace-id` response header.
    #[schema(example = "9b2e7f0a-3c4d-4e5f-8a9b-0c1d2e3f4a5b")]
    trace_id: Option<String>,
    #[schema(example = json!({"field": "host", "code": "invalid_field"}))]
    details: Option<serde_json::Value>,
}
