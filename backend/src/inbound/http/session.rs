//! Cookie-session access for handlers.
//!
//! Handlers see a signed-in user id and nothing else; the cookie store and
//! its key live in the middleware configured by the server.

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, UserId};

const SIGNED_IN_USER: &str = "uid";

/// The request's session, reduced to sign-in state.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the session attached to `req`.
    pub fn of(req: &HttpRequest) -> Self {
        Self(req.get_session())
    }

    /// Record `user_id` as signed in under a freshly issued session key.
    ///
    /// Renewing first means a session id fixed by an attacker before login
    /// never becomes authenticated.
    pub fn sign_in(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0.insert(SIGNED_IN_USER, user_id.get()).map_err(|err| {
            tracing::error!(error = %err, "session entry could not be serialised");
            Error::internal("failed to start session")
        })
    }

    /// The signed-in user, if the cookie carries a readable id.
    pub fn signed_in_user(&self) -> Option<UserId> {
        self.0
            .get::<i32>(SIGNED_IN_USER)
            .inspect_err(|err| tracing::warn!(error = %err, "ignoring unreadable session entry"))
            .ok()
            .flatten()
            .map(UserId::new)
    }

    /// Forget the user and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::of(req)))
    }
}
