//! `POST /hash-password`: Argon2id hashing as a service.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Password};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Request body for `POST /hash-password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct HashPasswordRequest {
    pub password: String,
}

/// PHC-encoded hash with its own random salt.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HashPasswordResponse {
    #[schema(example = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA")]
    pub hash: String,
}

/// Hash a password with a fresh salt.
#[utoipa::path(
    post,
    path = "/hash-password",
    request_body = HashPasswordRequest,
    responses(
        (status = 200, description = "Hash computed", body = HashPasswordResponse),
        (status = 400, description = "Invalid password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["crypto"],
    operation_id = "hashPassword",
    security([])
)]
#[post("/hash-password")]
pub async fn hash_password(
    state: web::Data<HttpState>,
    payload: web::Json<HashPasswordRequest>,
) -> ApiResult<web::Json<HashPasswordResponse>> {
    let password = Password::for_hashing(&payload.password)
        .map_err(|err| invalid_field_error(FieldName::new("password"), err))?;
    let hash = state
        .hasher
        .hash(&password)
        .await
        .map_err(|err| Error::internal(format!("password hashing error: {err}")))?;
    Ok(web::Json(HashPasswordResponse { hash }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockPasswordHasher, PasswordHashError};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{state_with, untouched_ports};

    async fn post(ports: HttpStatePorts, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .service(hash_password),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/hash-password")
                .set_json(body)
                .to_request(),
        )
        .await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn returns_hasher_output() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password.expose() == "secret")
            .returning(|_| Ok("$argon2id$v=19$fake".to_owned()));
        let mut ports = untouched_ports();
        ports.hasher = Arc::new(hasher);
        let (status, body) = post(ports, json!({ "password": "secret" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hash": "$argon2id$v=19$fake" }));
    }

    #[rstest]
    #[case(String::new())]
    #[case("p".repeat(129))]
    #[actix_web::test]
    async fn rejects_empty_and_oversized_passwords(#[case] password: String) {
        let (status, body) = post(untouched_ports(), json!({ "password": password })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "password");
    }

    #[rstest]
    #[actix_web::test]
    async fn hasher_failure_is_redacted() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(PasswordHashError::hash("out of memory")));
        let mut ports = untouched_ports();
        ports.hasher = Arc::new(hasher);
        let (status, body) = post(ports, json!({ "password": "secret" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
