//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens, process, files, network)
//! are implemented in `outbound`; driving ports are the use-cases HTTP
//! handlers call, implemented by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod comment_repository;
mod comments_command;
mod file_store;
mod host_resolver;
mod login_service;
mod network_diagnostics;
mod password_hasher;
mod ping_runner;
mod product_repository;
mod registration_command;
mod token_issuer;
mod url_fetcher;
mod user_repository;
mod users_query;

pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comments_command::{CommentsCommand, CommentsQuery, RECENT_COMMENTS};
#[cfg(test)]
pub use comments_command::{MockCommentsCommand, MockCommentsQuery};
pub use file_store::{FileStore, FileStoreError};
#[cfg(test)]
pub use file_store::MockFileStore;
pub use host_resolver::{HostResolver, ResolveError};
#[cfg(test)]
pub use host_resolver::MockHostResolver;
pub use login_service::{LoginOutcome, LoginService};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use network_diagnostics::{FetchCommand, PingCommand, PingReport};
#[cfg(test)]
pub use network_diagnostics::{MockFetchCommand, MockPingCommand};
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use ping_runner::{PingOutput, PingRunner, PingRunnerError};
#[cfg(test)]
pub use ping_runner::MockPingRunner;
pub use product_repository::{ProductPersistenceError, ProductRepository};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use token_issuer::{IssuedToken, TokenError, TokenIssuer, TokenSubject};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use url_fetcher::{FETCH_MAX_BYTES, FetchError, UrlFetcher};
#[cfg(test)]
pub use url_fetcher::MockUrlFetcher;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use users_query::UsersQuery;
#[cfg(test)]
pub use users_query::MockUsersQuery;
