//! Tests for principal extraction.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use rstest::rstest;

use super::*;
use crate::domain::Role;
use crate::domain::ports::{MockTokenIssuer, TokenError, TokenSubject};
use crate::inbound::http::test_utils::{
    state_with, test_session_middleware, untouched_ports, user, users_knowing,
};

fn tokens_accepting(token: &'static str, id: i32) -> MockTokenIssuer {
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().returning(move |raw| {
        if raw == token {
            Ok(TokenSubject {
                user_id: UserId::new(id),
            })
        } else {
            Err(TokenError::invalid())
        }
    });
    tokens
}

async fn call(known: User, request: test::TestRequest) -> (StatusCode, String) {
    let mut ports = untouched_ports();
    ports.users = Arc::new(users_knowing(known));
    ports.tokens = Arc::new(tokens_accepting("good-token", 1));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(ports)))
            .wrap(test_session_middleware())
            .route(
                "/whoami",
                web::get().to(|principal: Principal| async move {
                    HttpResponse::Ok().body(principal.user().username().to_string())
                }),
            )
            .route(
                "/admin",
                web::get().to(|principal: Principal| async move {
                    principal.require_admin()?;
                    Ok::<_, Error>(HttpResponse::Ok().finish())
                }),
            )
            .route(
                "/maybe",
                web::get().to(|principal: MaybePrincipal| async move {
                    let name = principal
                        .user()
                        .map_or_else(|| "anonymous".to_owned(), |u| u.username().to_string());
                    HttpResponse::Ok().body(name)
                }),
            ),
    )
    .await;
    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn bearer_token_identifies_user() {
    let (status, body) = call(
        user(1, "alice", Role::User),
        test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer good-token")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "alice");
}

#[rstest]
#[case("Bearer forged-token")]
#[case("Bearer ")]
#[case("Basic YWRtaW46cGFzc3dvcmQ=")]
#[actix_web::test]
async fn bad_authorization_headers_are_unauthorised(#[case] header: &str) {
    let (status, _) = call(
        user(1, "alice", Role::Admin),
        test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, header.to_owned())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn missing_credentials_are_unauthorised() {
    let (status, _) = call(
        user(1, "alice", Role::User),
        test::TestRequest::get().uri("/whoami"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(Role::User, StatusCode::FORBIDDEN)]
#[case(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn admin_endpoint_checks_stored_role(#[case] role: Role, #[case] expected: StatusCode) {
    let (status, _) = call(
        user(1, "alice", role),
        test::TestRequest::get()
            .uri("/admin")
            .insert_header((AUTHORIZATION, "Bearer good-token")),
    )
    .await;
    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn token_for_deleted_user_is_unauthorised() {
    let (status, _) = call(
        user(2, "bob", Role::Admin),
        test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer good-token")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn optional_principal_allows_anonymous_callers() {
    let (status, body) = call(
        user(1, "alice", Role::User),
        test::TestRequest::get().uri("/maybe"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");
}

#[rstest]
#[actix_web::test]
async fn optional_principal_still_rejects_forged_tokens() {
    let (status, _) = call(
        user(1, "alice", Role::User),
        test::TestRequest::get()
            .uri("/maybe")
            .insert_header((AUTHORIZATION, "Bearer forged-token")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
