//! Network diagnostics handlers: `POST /ping` and `POST /fetch-url`.
//!
//! Hosts are parsed into [`PingTarget`] before the use-case runs, so a
//! rejected host never reaches the process runner. URLs are vetted by the
//! fetch use-case against the destination policy.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Error, PingTarget};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Request body for `POST /ping`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct PingRequest {
    /// IP literal or RFC 1123 hostname.
    #[schema(example = "example.com")]
    pub host: String,
}

/// Ping result.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub output: String,
    pub reachable: bool,
}

/// Ping a host with a fixed packet count.
#[utoipa::path(
    post,
    path = "/ping",
    request_body = PingRequest,
    responses(
        (status = 200, description = "Ping completed", body = PingResponse),
        (status = 400, description = "Host rejected", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["diagnostics"],
    operation_id = "ping",
    security([])
)]
#[post("/ping")]
pub async fn ping(
    state: web::Data<HttpState>,
    payload: web::Json<PingRequest>,
) -> ApiResult<web::Json<PingResponse>> {
    let target = PingTarget::parse(&payload.host).map_err(|err| {
        warn!(error = %err, "rejected ping host");
        invalid_field_error(FieldName::new("host"), err)
    })?;
    let report = state.ping.ping(&target).await?;
    Ok(web::Json(PingResponse {
        output: report.output,
        reachable: report.reachable,
    }))
}

/// Request body for `POST /fetch-url`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct FetchRequest {
    #[schema(example = "https://api.example.com/status")]
    pub url: String,
}

/// Upstream body, decoded lossily as UTF-8.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FetchResponse {
    pub data: String,
}

/// Fetch an allow-listed URL on the caller's behalf.
#[utoipa::path(
    post,
    path = "/fetch-url",
    request_body = FetchRequest,
    responses(
        (status = 200, description = "Upstream body", body = FetchResponse),
        (status = 400, description = "Malformed or disallowed URL", body = ErrorSchema),
        (status = 403, description = "Destination refused", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["diagnostics"],
    operation_id = "fetchUrl",
    security([])
)]
#[post("/fetch-url")]
pub async fn fetch_url(
    state: web::Data<HttpState>,
    payload: web::Json<FetchRequest>,
) -> ApiResult<web::Json<FetchResponse>> {
    let data = state.fetch.fetch(&payload.url).await?;
    Ok(web::Json(FetchResponse { data }))
}
