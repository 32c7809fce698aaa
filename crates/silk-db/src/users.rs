//! User repository for the credential store.

use silk_core::{ShopError, User};
use sqlx::{FromRow, SqlitePool};

use crate::{db_error, is_unique_violation};

#[derive(Debug, FromRow)]
struct UserRow {
    email: String,
    password: String,
    authenticated: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            email: row.email,
            password_hash: row.password,
            authenticated: row.authenticated,
        }
    }
}

/// Repository for `user` table operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, ShopError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT email, password, authenticated FROM "user" WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(User::from))
    }

    /// Insert a new account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidRequest` if the email already exists.
    /// Returns `ShopError::Database` for other database errors.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, ShopError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO "user" (email, password, authenticated)
            VALUES (?, ?, 0)
            RETURNING email, password, authenticated
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return ShopError::InvalidRequest(format!("user already exists: {email}"));
            }
            db_error(e)
        })?;

        Ok(row.into())
    }

    /// Set the authenticated flag, committing immediately.
    ///
    /// Returns `false` if no user has this email.
    pub async fn set_authenticated(&self, email: &str, authenticated: bool) -> Result<bool, ShopError> {
        let result = sqlx::query(r#"UPDATE "user" SET authenticated = ? WHERE email = ?"#)
            .bind(authenticated)
            .bind(email)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_in_memory;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = connect_in_memory().await.unwrap();
        let users = UserRepository::new(&pool);

        let created = users.create("owner@silkstore.in", "hash").await.unwrap();
        assert!(!created.authenticated);

        let fetched = users.get_by_email("owner@silkstore.in").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(users.get_by_email("nobody@silkstore.in").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let users = UserRepository::new(&pool);

        users.create("owner@silkstore.in", "hash").await.unwrap();
        let err = users.create("owner@silkstore.in", "other").await.unwrap_err();
        assert!(matches!(err, ShopError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_set_authenticated() {
        let pool = connect_in_memory().await.unwrap();
        let users = UserRepository::new(&pool);
        users.create("owner@silkstore.in", "hash").await.unwrap();

        assert!(users.set_authenticated("owner@silkstore.in", true).await.unwrap());
        let user = users.get_by_email("owner@silkstore.in").await.unwrap().unwrap();
        assert!(user.authenticated);

        assert!(!users.set_authenticated("ghost@silkstore.in", true).await.unwrap());
    }
}
