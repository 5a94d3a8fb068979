//! `GET /debug`: build and uptime facts for administrators.
//!
//! The payload is a fixed set of non-sensitive fields. Environment variables,
//! configuration values and secrets are never included.

use std::time::Instant;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Principal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::schemas::ErrorSchema;

/// Static facts about the running process.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeInfo {
    started_at: Instant,
}

impl RuntimeInfo {
    /// Capture the current instant as the process start.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// `debug` or `release`, fixed at compile time.
    pub const fn build_mode() -> &'static str {
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Response body for `GET /debug`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    #[schema(example = "bastion")]
    pub service: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "release")]
    pub build_mode: String,
    pub uptime_seconds: u64,
}

/// Report service identity and uptime. Requires the `admin` role.
#[utoipa::path(
    get,
    path = "/debug",
    responses(
        (status = 200, description = "Runtime facts", body = DebugResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["diagnostics"],
    operation_id = "debugInfo"
)]
#[get("/debug")]
pub async fn debug_info(
    state: web::Data<HttpState>,
    principal: Principal,
) -> ApiResult<web::Json<DebugResponse>> {
    principal.require_admin()?;
    Ok(web::Json(DebugResponse {
        service: env!("CARGO_PKG_NAME").to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        build_mode: RuntimeInfo::build_mode().to_owned(),
        uptime_seconds: state.runtime.uptime_seconds(),
    }))
}
