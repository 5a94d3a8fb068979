//! Correlation identifier carried by every request.
//!
//! The id lives in a Tokio task-local for the duration of a request, so
//! [`Error`](super::Error) values pick it up without threading it through
//! every call. Task-locals do not follow work onto the blocking pool;
//! [`TraceId::spawn_blocking`] re-enters the scope on the worker thread.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::{JoinError, spawn_blocking};
use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across logs, error bodies and the
/// `trace-id` response header.
///
/// # Examples
/// ```
/// use bastion::domain::TraceId;
///
/// let adopted = TraceId::adopt_or_generate(Some("6f2c1f4e-93c1-4f57-9d5c-1bde0a1b2c3d"));
/// assert_eq!(adopted.to_string(), "6f2c1f4e-93c1-4f57-9d5c-1bde0a1b2c3d");
///
/// let fresh = TraceId::adopt_or_generate(Some("<script>"));
/// assert_ne!(fresh.to_string(), "<script>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse an upstream trace id when it is a well-formed UUID; anything
    /// else is discarded and a fresh id is minted.
    pub fn adopt_or_generate(upstream: Option<&str>) -> Self {
        upstream
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Trace id of the request being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    /// Run `operation` on the blocking pool with the caller's trace id (if
    /// any) still visible through [`TraceId::current`].
    pub async fn spawn_blocking<F, T>(operation: F) -> Result<T, JoinError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let inherited = Self::current();
        spawn_blocking(move || match inherited {
            Some(id) => CURRENT.sync_scope(id, operation),
            None => operation(),
        })
        .await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
