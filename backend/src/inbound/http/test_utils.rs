//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    MockCatalogueQuery, MockCommentsCommand, MockCommentsQuery, MockFetchCommand, MockFileStore,
    MockLoginService, MockPasswordHasher, MockPingCommand, MockRegistrationCommand,
    MockTokenIssuer, MockUsersQuery,
};
use crate::domain::{Email, RedirectPolicy, Role, User, UserId, Username};

use super::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports whose mocks carry no expectations; any call fails the test.
///
/// Tests replace the fields they exercise.
pub fn untouched_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        users: Arc::new(MockUsersQuery::new()),
        registration: Arc::new(MockRegistrationCommand::new()),
        tokens: Arc::new(MockTokenIssuer::new()),
        catalogue: Arc::new(MockCatalogueQuery::new()),
        comments: Arc::new(MockCommentsCommand::new()),
        comments_query: Arc::new(MockCommentsQuery::new()),
        ping: Arc::new(MockPingCommand::new()),
        fetch: Arc::new(MockFetchCommand::new()),
        files: Arc::new(MockFileStore::new()),
        hasher: Arc::new(MockPasswordHasher::new()),
    }
}

/// State over `ports` with an allow-list containing `trusted.example`.
pub fn state_with(ports: HttpStatePorts) -> HttpState {
    HttpState::new(ports, RedirectPolicy::new(["trusted.example"]))
}

/// Build a stored user fixture.
pub fn user(id: i32, name: &str, role: Role) -> User {
    User::new(
        UserId::new(id),
        Username::new(name).expect("fixture username"),
        Email::new(format!("{name}@example.com")).expect("fixture email"),
        role,
    )
}

/// A users query that knows exactly one account.
pub fn users_knowing(known: User) -> MockUsersQuery {
    let mut users = MockUsersQuery::new();
    users.expect_find_user().returning(move |id| {
        Ok((id == known.id()).then(|| known.clone()))
    });
    users
}
