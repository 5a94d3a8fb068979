//! Failure translation shared by the SQLite repositories.
//!
//! Repositories run their statements through `run`, which maps both
//! failure layers (the connection handle and Diesel itself) into the port's
//! error type. Raw SQLite messages are logged at debug level and never
//! copied into the returned error.

use diesel::result::{DatabaseErrorKind, Error as DieselError, QueryResult};
use diesel::SqliteConnection;
use tracing::debug;

use crate::domain::ports::{
    CommentPersistenceError, ProductPersistenceError, UserPersistenceError,
};

use super::pool::{DbHandle, PoolError};

/// Port error that can describe storage failures.
pub(super) trait RepositoryError: Sized {
    fn connection_failed(message: String) -> Self;

    fn query_failed(message: String) -> Self;

    /// Port-specific error for a UNIQUE violation, if the port models one.
    fn unique_violation() -> Option<Self> {
        None
    }
}

impl RepositoryError for UserPersistenceError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }

    fn unique_violation() -> Option<Self> {
        Some(Self::duplicate_username())
    }
}

impl RepositoryError for ProductPersistenceError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }
}

impl RepositoryError for CommentPersistenceError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }
}

fn from_pool<E: RepositoryError>(error: PoolError) -> E {
    E::connection_failed(error.to_string())
}

fn from_diesel<E: RepositoryError>(error: DieselError) -> E {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "sqlite rejected statement");
            match kind {
                DatabaseErrorKind::UniqueViolation => E::unique_violation()
                    .unwrap_or_else(|| E::query_failed("constraint violated".to_owned())),
                DatabaseErrorKind::ClosedConnection => {
                    E::connection_failed("database connection closed".to_owned())
                }
                _ => E::query_failed("database error".to_owned()),
            }
        }
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        other => {
            debug!(error = %other, "diesel operation failed");
            E::query_failed("database query error".to_owned())
        }
    }
}

/// Run `statement` against the shared connection.
pub(super) async fn run<E, T, F>(db: &DbHandle, statement: F) -> Result<T, E>
where
    E: RepositoryError,
    F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    db.interact(statement)
        .await
        .map_err(from_pool)?
        .map_err(from_diesel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Info(&'static str);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("UNIQUE constraint failed: users.username")))
    }

    #[rstest]
    fn unique_violation_uses_the_port_variant_when_modelled() {
        let mapped: UserPersistenceError =
            from_diesel(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, UserPersistenceError::DuplicateUsername);

        let mapped: CommentPersistenceError =
            from_diesel(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, CommentPersistenceError::query("constraint violated"));
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, ProductPersistenceError::connection("database connection closed"))]
    #[case(DatabaseErrorKind::CheckViolation, ProductPersistenceError::query("database error"))]
    fn sqlite_messages_are_not_forwarded(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: ProductPersistenceError,
    ) {
        let mapped: ProductPersistenceError = from_diesel(database_error(kind));
        assert_eq!(mapped, expected);
        assert!(!mapped.to_string().contains("users.username"));
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let mapped: UserPersistenceError = from_pool(PoolError::checkout("blocking task failed"));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }
}
