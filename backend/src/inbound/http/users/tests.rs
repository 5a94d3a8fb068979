//! Tests for account handlers.

use super::*;
use crate::domain::ports::{
    IssuedToken, LoginOutcome, MockLoginService, MockRegistrationCommand, MockTokenIssuer,
    MockUsersQuery, TokenSubject,
};
use crate::domain::{ErrorCode, Role, UserId};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{
    state_with, test_session_middleware, untouched_ports, user, users_knowing,
};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::TimeZone;
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

const ADMIN_TOKEN: &str = "admin-token";
const USER_TOKEN: &str = "user-token";

fn tokens() -> MockTokenIssuer {
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().returning(|raw| match raw {
        ADMIN_TOKEN => Ok(TokenSubject {
            user_id: UserId::new(1),
        }),
        USER_TOKEN => Ok(TokenSubject {
            user_id: UserId::new(2),
        }),
        _ => Err(crate::domain::ports::TokenError::invalid()),
    });
    tokens
}

fn directory() -> MockUsersQuery {
    let admin = user(1, "admin", Role::Admin);
    let alice = user(2, "alice", Role::User);
    let mut users = MockUsersQuery::new();
    let everyone = vec![admin.clone(), alice.clone()];
    users.expect_find_user().returning(move |id| {
        Ok([&admin, &alice]
            .into_iter()
            .find(|candidate| candidate.id() == id)
            .cloned())
    });
    users
        .expect_list_users()
        .returning(move || Ok(everyone.clone()));
    users
}

async fn call(
    ports: HttpStatePorts,
    request: actix_test::TestRequest,
) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(ports)))
            .wrap(test_session_middleware())
            .service(login)
            .service(logout)
            .service(register)
            .service(list_users),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

fn login_service_accepting(name: &'static str, password: &'static str) -> MockLoginService {
    let mut service = MockLoginService::new();
    service.expect_login().returning(move |credentials| {
        if credentials.username() == name && credentials.password() == password {
            Ok(LoginOutcome {
                user: user(2, name, Role::User),
                token: IssuedToken {
                    token: "signed.jwt.value".to_owned(),
                    expires_at: chrono::Utc
                        .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
                        .single()
                        .expect("valid timestamp"),
                },
            })
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    });
    service
}

fn login_request(username: &str, password: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/login")
        .set_json(&LoginRequest {
            username: username.into(),
            password: password.into(),
        })
}

#[rstest]
#[actix_web::test]
async fn login_returns_token_user_and_session_cookie() {
    let mut ports = untouched_ports();
    ports.login = Arc::new(login_service_accepting("alice", "correct horse"));
    let res = call(ports, login_request("alice", "correct horse")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();
    assert!(cookie.http_only().unwrap_or(true));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "signed.jwt.value");
    assert_eq!(body["message"], "Login successful");
    assert_eq!(
        body["user"],
        serde_json::json!({"id": 2, "username": "alice", "email": "alice@example.com", "role": "user"})
    );
    assert!(body["user"].get("password").is_none());
}

#[rstest]
#[actix_web::test]
async fn login_failure_is_unauthorised_without_cookie() {
    let mut ports = untouched_ports();
    ports.login = Arc::new(login_service_accepting("alice", "correct horse"));
    let res = call(ports, login_request("alice", "' OR '1'='1")).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().all(|c| c.name() != "session"));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[case("   ", "password", "username must not be empty", "username")]
#[case(&"u".repeat(33), "password", "username must be at most 32 characters", "username")]
#[case("admin", "", "password must not be empty", "password")]
#[case("admin", &"p".repeat(129), "password must be at most 128 characters", "password")]
#[actix_web::test]
async fn login_rejects_unusable_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] message: &str,
    #[case] field: &str,
) {
    let res = call(untouched_ports(), login_request(username, password)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], message);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "invalid_field");
}

#[rstest]
#[actix_web::test]
async fn logout_is_no_content() {
    let res = call(untouched_ports(), actix_test::TestRequest::post().uri("/logout")).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

fn register_request(role: Option<&str>) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/register")
        .set_json(&RegisterRequest {
            username: "mallory".into(),
            password: "long enough".into(),
            email: "mallory@example.com".into(),
            role: role.map(str::to_owned),
        })
}

#[rstest]
#[case::anonymous(None, None)]
#[case::plain_user(Some(USER_TOKEN), Some(Role::User))]
#[case::admin(Some(ADMIN_TOKEN), Some(Role::Admin))]
#[actix_web::test]
async fn register_forwards_the_callers_stored_role(
    #[case] token: Option<&str>,
    #[case] expected_caller: Option<Role>,
) {
    let mut registration = MockRegistrationCommand::new();
    registration
        .expect_register()
        .withf(move |reg, caller| {
            reg.username().as_ref() == "mallory"
                && reg.requested_role() == Some(Role::Admin)
                && *caller == expected_caller
        })
        .times(1)
        .returning(|_, _| Ok(UserId::new(42)));
    let mut ports = untouched_ports();
    ports.registration = Arc::new(registration);
    ports.users = Arc::new(directory());
    ports.tokens = Arc::new(tokens());

    let mut request = register_request(Some("admin"));
    if let Some(token) = token {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    let res = call(ports, request).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, serde_json::json!({"success": true, "userId": 42}));
}

#[rstest]
#[case("x", "long enough", "mallory@example.com", None, "username")]
#[case("mallory", "short", "mallory@example.com", None, "password")]
#[case("mallory", "long enough", "not-an-email", None, "email")]
#[case("mallory", "long enough", "mallory@example.com", Some("root"), "role")]
#[actix_web::test]
async fn register_rejects_invalid_fields_before_storage(
    #[case] username: &str,
    #[case] password: &str,
    #[case] email: &str,
    #[case] role: Option<&str>,
    #[case] field: &str,
) {
    let request = actix_test::TestRequest::post()
        .uri("/register")
        .set_json(&RegisterRequest {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            role: role.map(str::to_owned),
        });
    let res = call(untouched_ports(), request).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_conflict() {
    let mut registration = MockRegistrationCommand::new();
    registration
        .expect_register()
        .returning(|_, _| Err(Error::conflict("username already exists")));
    let mut ports = untouched_ports();
    ports.registration = Arc::new(registration);
    let res = call(ports, register_request(None)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case::anonymous(None, StatusCode::UNAUTHORIZED)]
#[case::plain_user(Some(USER_TOKEN), StatusCode::FORBIDDEN)]
#[case::admin(Some(ADMIN_TOKEN), StatusCode::OK)]
#[actix_web::test]
async fn admin_user_list_requires_admin_role(
    #[case] token: Option<&str>,
    #[case] expected: StatusCode,
) {
    let mut ports = untouched_ports();
    ports.users = Arc::new(directory());
    ports.tokens = Arc::new(tokens());
    let mut request = actix_test::TestRequest::get().uri("/admin/users");
    if let Some(token) = token {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    let res = call(ports, request).await;
    assert_eq!(res.status(), expected);
    if expected == StatusCode::OK {
        let body: Vec<UserResponse> = actix_test::read_body_json(res).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].role, "admin");
    }
}

#[rstest]
#[actix_web::test]
async fn admin_list_failure_is_redacted() {
    let mut users = users_knowing(user(1, "admin", Role::Admin));
    users
        .expect_list_users()
        .returning(|| Err(Error::internal("user repository error: disk full")));
    let mut ports = untouched_ports();
    ports.users = Arc::new(users);
    ports.tokens = Arc::new(tokens());
    let res = call(
        ports,
        actix_test::TestRequest::get()
            .uri("/admin/users")
            .insert_header((AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], serde_json::json!(ErrorCode::InternalError));
    assert_eq!(body["message"], "Internal server error");
}

#[rstest]
fn user_response_never_carries_credentials() {
    let value = serde_json::to_value(UserResponse::from(&user(3, "carol", Role::User)))
        .expect("serialise");
    let mut keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["email", "id", "role", "username"]);
}
