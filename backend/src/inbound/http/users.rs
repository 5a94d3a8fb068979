//! Account handlers: login, logout, registration and the admin user list.
//!
//! ```text
//! POST /login {"username":"alice","password":"correct horse"}
//! POST /logout
//! POST /register {"username":"bob","password":"...","email":"bob@example.com"}
//! GET /admin/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, LoginValidationError, Registration, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{MaybePrincipal, Principal};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Login request body for `POST /login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Public view of an account. There is no password field to leak.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().to_string(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
        }
    }
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    /// HS256 bearer token.
    pub token: String,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
    pub message: String,
    pub user: UserResponse,
}

/// Registration request body for `POST /register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Honoured only when an administrator makes the call.
    #[serde(default)]
    pub role: Option<String>,
}

/// Successful registration payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: i32,
}

/// Authenticate a user, establish a session and issue a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 429, description = "Too many failed attempts", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    session.sign_in(outcome.user.id())?;
    Ok(web::Json(LoginResponse {
        success: true,
        token: outcome.token.token,
        expires_at: outcome.token.expires_at,
        message: "Login successful".to_owned(),
        user: UserResponse::from(&outcome.user),
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername | LoginValidationError::UsernameTooLong { .. } => {
            "username"
        }
        LoginValidationError::EmptyPassword | LoginValidationError::PasswordTooLong { .. } => {
            "password"
        }
    };
    invalid_field_error(FieldName::new(field), err)
}

#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.sign_out();
    HttpResponse::NoContent().finish()
}

/// Create an account. The `role` field is ignored unless an admin calls.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    caller: MaybePrincipal,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let RegisterRequest {
        username,
        password,
        email,
        role,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&username, &email, &password, role.as_deref())
        .map_err(map_registration_error)?;
    let caller_role = caller.user().map(User::role);
    let user_id = state
        .registration
        .register(&registration, caller_role)
        .await?;
    Ok(web::Json(RegisterResponse {
        success: true,
        user_id: user_id.get(),
    }))
}

fn map_registration_error(err: CredentialValidationError) -> Error {
    let field = match &err {
        CredentialValidationError::EmptyPassword
        | CredentialValidationError::PasswordTooShort { .. }
        | CredentialValidationError::PasswordTooLong { .. } => "password",
        CredentialValidationError::User(
            UserValidationError::EmptyEmail
            | UserValidationError::EmailTooLong { .. }
            | UserValidationError::EmailInvalid,
        ) => "email",
        CredentialValidationError::User(UserValidationError::UnknownRole) => "role",
        CredentialValidationError::User(_) => "username",
    };
    invalid_field_error(FieldName::new(field), err)
}

/// List every account. Requires the `admin` role.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    principal: Principal,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    principal.require_admin()?;
    let users = state.users.list_users().await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

#[cfg(test)]
mod tests;
