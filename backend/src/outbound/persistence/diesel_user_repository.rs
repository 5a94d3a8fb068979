//! SQLite-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every lookup goes through Diesel's query builder, so caller input is
//! always bound as a parameter and never spliced into SQL text.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, Role, StoredCredentials, User, UserId, UserValidationError, Username,
};

use super::error_mapping::run;
use super::models::{NewUserRow, UserRow};
use super::pool::DbHandle;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    db: DbHandle,
}

impl DieselUserRepository {
    /// Create a new repository over the shared database handle.
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(User::new(
        UserId::new(row.id),
        Username::new(row.username.clone()).map_err(invalid)?,
        Email::new(row.email.clone()).map_err(invalid)?,
        row.role.parse::<Role>().map_err(invalid)?,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let username = user.username.to_string();
        let email = user.email.as_ref().to_owned();
        let role = user.role.as_str();
        let password_hash = user.password_hash.clone();
        let id = run(&self.db, move |conn| {
            diesel::insert_into(users::table)
                .values(NewUserRow {
                    username: &username,
                    email: &email,
                    role,
                    password_hash: &password_hash,
                })
                .returning(users::id)
                .get_result::<i32>(conn)
        })
        .await?;
        Ok(UserId::new(id))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let username = username.to_owned();
        let row = run(&self.db, move |conn| {
            users::table
                .filter(users::username.eq(username))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
        })
        .await?;
        row.map(|row| -> Result<StoredCredentials, UserPersistenceError> {
            let user = row_to_user(&row)?;
            Ok(StoredCredentials::new(user, row.password_hash))
        })
        .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let row = run(&self.db, move |conn| {
            users::table
                .find(id.get())
                .select(UserRow::as_select())
                .first(conn)
                .optional()
        })
        .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let rows = run(&self.db, |conn| {
            users::table
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load(conn)
        })
        .await?;
        rows.iter().map(row_to_user).collect()
    }
}
