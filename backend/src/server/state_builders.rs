//! Wiring of outbound adapters into the domain services behind `HttpState`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use mockable::Clock;
use tracing::info;

use crate::config::AppSettings;
use crate::domain::ports::TokenIssuer;
use crate::domain::{
    AccountService, CatalogueService, CommentService, Email, FetchPolicy, LoginThrottle,
    NetworkService, Password, RedirectPolicy, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::crypto::{Argon2Hasher, JwtIssuer};
use crate::outbound::files::CapStdFileStore;
use crate::outbound::http::{ReqwestUrlFetcher, TokioHostResolver};
use crate::outbound::persistence::{
    DbHandle, DieselCommentRepository, DieselProductRepository, DieselUserRepository,
};
use crate::outbound::process::ProcessPingRunner;

type Accounts = AccountService<DieselUserRepository, Argon2Hasher>;

/// Adapter settings resolved from [`AppSettings`].
pub struct ServiceSettings {
    pub uploads_dir: PathBuf,
    pub fetch_policy: FetchPolicy,
    pub redirect_policy: RedirectPolicy,
    pub ping_program: String,
    pub ping_timeout: Duration,
    pub fetch_timeout: Duration,
    pub token_ttl: TimeDelta,
}

impl From<&AppSettings> for ServiceSettings {
    fn from(settings: &AppSettings) -> Self {
        Self {
            uploads_dir: settings.uploads_dir(),
            fetch_policy: FetchPolicy::new(
                settings.fetch_allowed_hosts(),
                settings.fetch_allow_http,
            ),
            redirect_policy: RedirectPolicy::new(settings.redirect_allowed_hosts()),
            ping_program: settings.ping_program().to_owned(),
            ping_timeout: settings.ping_timeout(),
            fetch_timeout: settings.fetch_timeout(),
            token_ttl: settings.token_ttl(),
        }
    }
}

/// Fully wired services.
pub struct Services {
    pub http_state: HttpState,
    accounts: Arc<Accounts>,
}

impl Services {
    /// Create the administrator account when it does not exist yet.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the username or password is unusable or
    /// storage fails.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> io::Result<bool> {
        let username = Username::new(username)
            .map_err(|err| io::Error::other(format!("invalid admin username: {err}")))?;
        let email = Email::new(format!("{username}@localhost.localdomain"))
            .map_err(|err| io::Error::other(format!("invalid admin email: {err}")))?;
        let password = Password::for_account(password)
            .map_err(|err| io::Error::other(format!("invalid admin password: {err}")))?;
        self.accounts
            .bootstrap_admin(username, email, &password)
            .await
            .map_err(|err| io::Error::other(format!("admin bootstrap failed: {err}")))
    }
}

/// Open the database and build every adapter and service.
///
/// # Errors
/// Returns [`io::Error`] when the database, the uploads directory or the
/// password hasher cannot be initialised.
pub fn build_services(
    settings: ServiceSettings,
    token_secret: &[u8],
    clock: Arc<dyn Clock>,
) -> io::Result<Services> {
    let ServiceSettings {
        uploads_dir,
        fetch_policy,
        redirect_policy,
        ping_program,
        ping_timeout,
        fetch_timeout,
        token_ttl,
    } = settings;

    let db = DbHandle::open_in_memory()
        .map_err(|err| io::Error::other(format!("database setup failed: {err}")))?;
    let files = CapStdFileStore::open(&uploads_dir).map_err(|err| {
        io::Error::other(format!(
            "failed to open uploads directory {}: {err}",
            uploads_dir.display()
        ))
    })?;
    info!(uploads_dir = %uploads_dir.display(), "uploads directory ready");
    let hasher = Arc::new(
        Argon2Hasher::new()
            .map_err(|err| io::Error::other(format!("password hasher setup failed: {err}")))?,
    );
    let tokens: Arc<dyn TokenIssuer> =
        Arc::new(JwtIssuer::new(token_secret, token_ttl, clock.clone()));

    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselUserRepository::new(db.clone())),
        hasher.clone(),
        tokens.clone(),
        Arc::new(LoginThrottle::new(clock.clone())),
    ));
    let catalogue = Arc::new(CatalogueService::new(Arc::new(
        DieselProductRepository::new(db.clone()),
    )));
    let comments = Arc::new(CommentService::new(
        Arc::new(DieselCommentRepository::new(db)),
        clock,
    ));
    let network = Arc::new(NetworkService::new(
        Arc::new(ProcessPingRunner::new(ping_program, ping_timeout)),
        Arc::new(TokioHostResolver),
        Arc::new(ReqwestUrlFetcher::new(fetch_timeout)),
        fetch_policy,
    ));

    let http_state = HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            users: accounts.clone(),
            registration: accounts.clone(),
            tokens,
            catalogue,
            comments: comments.clone(),
            comments_query: comments,
            ping: network.clone(),
            fetch: network,
            files: Arc::new(files),
            hasher,
        },
        redirect_policy,
    );
    Ok(Services {
        http_state,
        accounts,
    })
}
