//! `POST /import-data`: merge an imported settings document over defaults.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::import_merge::{default_import_settings, merge_import};
use crate::domain::ImportError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Request body for `POST /import-data`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct ImportRequest {
    /// JSON document, passed as a string.
    #[schema(example = "{\"overwrite\":true,\"tags\":[\"spring\"]}")]
    pub data: String,
}

/// Merged settings.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportResponse {
    #[schema(value_type = Object)]
    pub result: Value,
}

/// Parse `data` as JSON and merge it into the default import settings.
#[utoipa::path(
    post,
    path = "/import-data",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Merged settings", body = ImportResponse),
        (status = 400, description = "Document rejected", body = ErrorSchema)
    ),
    tags = ["settings"],
    operation_id = "importData",
    security([])
)]
#[post("/import-data")]
pub async fn import_data(payload: web::Json<ImportRequest>) -> ApiResult<web::Json<ImportResponse>> {
    let result = merge_import(&default_import_settings(), &payload.data).map_err(|err| {
        if matches!(err, ImportError::ForbiddenKey { .. }) {
            warn!(error = %err, "import attempted to set a prototype key");
        }
        invalid_field_error(FieldName::new("data"), err)
    })?;
    Ok(web::Json(ImportResponse { result }))
}
