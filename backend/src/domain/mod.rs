//! Domain values, ports and use-case services.
//!
//! Every value that carries caller input (usernames, ping targets, download
//! paths, fetch and redirect destinations) is parsed into a type that
//! refuses hostile input at construction. Services implement the driving
//! ports in [`ports`] and report failures as [`Error`].

pub mod accounts_service;
pub mod auth;
pub mod catalogue_service;
pub mod comment;
pub mod download_path;
pub mod error;
pub mod fetch_policy;
pub mod import_merge;
pub mod login_throttle;
pub mod network_service;
pub mod ping_target;
pub mod ports;
pub mod product;
pub mod redirect_policy;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountService;
pub use self::auth::{
    CredentialValidationError, LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN,
    Password, Registration,
};
pub use self::catalogue_service::{CatalogueService, CommentService};
pub use self::comment::{
    ANONYMOUS_AUTHOR, COMMENT_MAX, Comment, CommentText, CommentValidationError, NewComment,
};
pub use self::download_path::{DownloadPath, DownloadPathError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::fetch_policy::{FetchPolicy, FetchPolicyError, FetchTarget};
pub use self::import_merge::ImportError;
pub use self::login_throttle::LoginThrottle;
pub use self::network_service::NetworkService;
pub use self::ping_target::{PingTarget, PingTargetError};
pub use self::product::{Product, SEARCH_QUERY_MAX, SearchQuery, SearchQueryError};
pub use self::redirect_policy::{RedirectPolicy, RedirectPolicyError};
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, Role, StoredCredentials, User, UserId, UserValidationError, Username,
};
