//! Shared handle to the in-memory SQLite database.
//!
//! SQLite `:memory:` databases live and die with their connection, so the
//! service keeps exactly one connection behind a mutex. Diesel's SQLite
//! backend is synchronous; every query runs on Tokio's blocking pool via
//! [`DbHandle::interact`] so request workers are never stalled.
//!
//! A statement that panics poisons the mutex. The connection itself is still
//! usable, so later callers take the lock back instead of failing forever;
//! the login throttle treats its own mutex the same way.

use std::sync::{Arc, Mutex, PoisonError};

use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::TraceId;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors that can occur while opening or using the connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to acquire the connection.
    #[error("failed to acquire database connection: {message}")]
    Checkout { message: String },

    /// Failed to open the database or apply migrations.
    #[error("failed to open database: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Cloneable handle to the single database connection.
#[derive(Clone)]
pub struct DbHandle {
    connection: Arc<Mutex<SqliteConnection>>,
}

impl DbHandle {
    /// Open a fresh in-memory database and apply all embedded migrations.
    ///
    /// # Examples
    /// ```
    /// use bastion::outbound::persistence::DbHandle;
    ///
    /// let db = DbHandle::open_in_memory().expect("database opens");
    /// # let _ = db;
    /// ```
    pub fn open_in_memory() -> Result<Self, PoolError> {
        Self::open(":memory:")
    }

    fn open(url: &str) -> Result<Self, PoolError> {
        let mut connection = SqliteConnection::establish(url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::build(format!("migrations failed: {err}")))?;
        info!(migrations = applied.len(), "database schema ready");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run `operation` with exclusive access to the connection on the
    /// blocking thread pool.
    pub async fn interact<F, T>(&self, operation: F) -> Result<T, PoolError>
    where
        F: FnOnce(&mut SqliteConnection) -> T + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        TraceId::spawn_blocking(move || {
            let mut guard = connection.lock().unwrap_or_else(PoisonError::into_inner);
            operation(&mut guard)
        })
        .await
        .map_err(|err| PoolError::checkout(format!("blocking task failed: {err}")))
    }
}
