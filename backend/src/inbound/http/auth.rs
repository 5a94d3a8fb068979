//! Principal extraction for authenticated endpoints.
//!
//! A caller is identified by the session cookie or by an
//! `Authorization: Bearer <jwt>` header. Only the user id is taken from
//! either source; the account, and with it the role, is re-read through
//! [`UsersQuery`](crate::domain::ports::UsersQuery) on every request.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, User, UserId};

use super::session::SessionContext;
use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller. Extraction fails with 401 when nobody is logged in.
#[derive(Debug, Clone)]
pub struct Principal(User);

impl Principal {
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Require the `admin` role or fail with 403.
    pub fn require_admin(&self) -> Result<&User, Error> {
        if self.0.role().is_admin() {
            Ok(&self.0)
        } else {
            warn!(user_id = %self.0.id(), "non-admin denied access to admin endpoint");
            Err(Error::forbidden("admin role required"))
        }
    }
}

/// Caller that may be anonymous. A present but invalid bearer token still
/// fails with 401.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(Option<User>);

impl MaybePrincipal {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

enum Credential {
    Bearer(String),
    Session(Option<UserId>),
    Malformed,
}

fn read_credential(req: &HttpRequest) -> Credential {
    if let Some(value) = req.headers().get(AUTHORIZATION) {
        let Ok(value) = value.to_str() else {
            return Credential::Malformed;
        };
        return match value.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.trim().is_empty() => Credential::Bearer(token.trim().to_owned()),
            _ => Credential::Malformed,
        };
    }
    Credential::Session(SessionContext::of(req).signed_in_user())
}

async fn resolve(
    state: Option<web::Data<HttpState>>,
    credential: Credential,
) -> Result<Option<User>, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let user_id = match credential {
        Credential::Session(id) => id,
        Credential::Malformed => return Err(Error::unauthorized("malformed authorization header")),
        Credential::Bearer(token) => match state.tokens.verify(&token) {
            Ok(subject) => Some(subject.user_id),
            Err(error) => {
                warn!(%error, "bearer token rejected");
                return Err(Error::unauthorized("invalid or expired token"));
            }
        },
    };
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let user = state.users.find_user(user_id).await?;
    if user.is_none() {
        warn!(%user_id, "credential refers to a user that no longer exists");
        return Err(Error::unauthorized("login required"));
    }
    Ok(user)
}

fn prepare(req: &HttpRequest) -> (Option<web::Data<HttpState>>, Credential) {
    (
        req.app_data::<web::Data<HttpState>>().cloned(),
        read_credential(req),
    )
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let (state, credential) = prepare(req);
        Box::pin(async move {
            match resolve(state, credential).await? {
                Some(user) => Ok(Principal(user)),
                None => Err(Error::unauthorized("login required").into()),
            }
        })
    }
}

impl FromRequest for MaybePrincipal {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let (state, credential) = prepare(req);
        Box::pin(async move { Ok(MaybePrincipal(resolve(state, credential).await?)) })
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
