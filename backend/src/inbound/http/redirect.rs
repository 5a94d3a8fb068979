//! `GET /redirect?url=`: redirect only to local paths or allow-listed hosts.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::warn;

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Query parameters for `GET /redirect`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RedirectParams {
    /// `/local/path` or an `https` URL on an allow-listed host.
    pub url: String,
}

/// Issue a 302 to a vetted destination.
#[utoipa::path(
    get,
    path = "/redirect",
    params(RedirectParams),
    responses(
        (status = 302, description = "Redirect issued", headers(("Location" = String))),
        (status = 400, description = "Destination not allowed", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "redirect",
    security([])
)]
#[get("/redirect")]
pub async fn redirect(
    state: web::Data<HttpState>,
    params: web::Query<RedirectParams>,
) -> ApiResult<HttpResponse> {
    let location = state.redirects.check(&params.url).map_err(|err| {
        warn!(error = %err, "refused redirect destination");
        invalid_field_error(FieldName::new("url"), err)
    })?;
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish())
}
