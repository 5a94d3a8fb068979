//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response
//! payloads, and the two credential schemes (session cookie and bearer
//! token). Swagger UI serves it in debug builds and the `openapi-dump`
//! binary prints it for external tooling.

use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::catalogue::{CommentRequest, CommentResponse};
use crate::inbound::http::diagnostics::DebugResponse;
use crate::inbound::http::hashing::{HashPasswordRequest, HashPasswordResponse};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::import::{ImportRequest, ImportResponse};
use crate::inbound::http::network::{FetchRequest, FetchResponse, PingRequest, PingResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse,
};

/// Enrich the generated document with the credential schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token returned by POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bastion API",
        description = "Storefront demo service whose handlers validate and confine every input.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::import::import_data,
        crate::inbound::http::network::ping,
        crate::inbound::http::network::fetch_url,
        crate::inbound::http::files::download,
        crate::inbound::http::catalogue::search,
        crate::inbound::http::catalogue::post_comment,
        crate::inbound::http::catalogue::list_comments,
        crate::inbound::http::diagnostics::debug_info,
        crate::inbound::http::hashing::hash_password,
        crate::inbound::http::redirect::redirect,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        UserResponse,
        RegisterRequest,
        RegisterResponse,
        ImportRequest,
        ImportResponse,
        PingRequest,
        PingResponse,
        FetchRequest,
        FetchResponse,
        CommentRequest,
        CommentResponse,
        DebugResponse,
        HashPasswordRequest,
        HashPasswordResponse,
        HealthResponse,
    )),
    tags(
        (name = "users", description = "Login, registration and account listing"),
        (name = "catalogue", description = "Product search and comments"),
        (name = "diagnostics", description = "Ping, outbound fetch and runtime facts"),
        (name = "files", description = "Downloads confined to the uploads directory"),
        (name = "crypto", description = "Password hashing"),
        (name = "settings", description = "Settings import"),
        (name = "navigation", description = "Allow-listed redirects"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;

    use crate::test_support::openapi::{get_property, unwrap_object_schema};

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = unwrap_object_schema(
            schemas.get(ERROR_SCHEMA_NAME).expect("Error schema"),
            ERROR_SCHEMA_NAME,
        );

        for field in ["code", "message", "traceId"] {
            get_property(error_schema, field);
        }
    }

    #[rstest]
    #[case("/login", "post", "401")]
    #[case("/login", "post", "429")]
    #[case("/fetch-url", "post", "403")]
    #[case("/search", "get", "400")]
    fn error_responses_reference_the_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("document serialises");
        let schema = &doc["paths"][path][method]["responses"][status]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(
            schema.as_str(),
            Some(format!("#/components/schemas/{ERROR_SCHEMA_NAME}").as_str())
        );
    }

    #[rstest]
    fn user_response_never_documents_a_password() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = unwrap_object_schema(
            schemas.get("UserResponse").expect("UserResponse schema"),
            "UserResponse",
        );
        get_property(user, "role");
        assert!(user.properties.keys().all(|key| !key.contains("password")));
    }

    #[rstest]
    #[case("/login")]
    #[case("/admin/users")]
    #[case("/import-data")]
    #[case("/ping")]
    #[case("/download")]
    #[case("/search")]
    #[case("/fetch-url")]
    #[case("/debug")]
    #[case("/hash-password")]
    #[case("/health")]
    #[case("/redirect")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn both_credential_schemes_are_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
