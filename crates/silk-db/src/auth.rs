//! Credential verification and the authenticated flag.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use silk_core::{ShopError, User};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::users::UserRepository;

/// Minimum password length accepted at provisioning.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Credential store operations used by the login and logout flows.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Provision an account. There is no signup route; the CLI calls this.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidRequest` for a short password or an existing email.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ShopError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ShopError::InvalidRequest(format!("invalid email: {email}")));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ShopError::InvalidRequest(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let hash = hash_password(password)?;
        let user = self.users.create(email, &hash).await?;
        info!("Provisioned user {}", user.email);
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Unknown email, wrong password and an unreadable stored hash all
    /// yield `Ok(None)`.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Option<User>, ShopError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            debug!("Login for unknown email");
            return Ok(None);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => {
                debug!("Password mismatch for {}", user.email);
                Ok(None)
            }
            Err(e) => {
                warn!("Unreadable password hash for {}: {}", user.email, e);
                Ok(None)
            }
        }
    }

    /// Resolve a session identity back to the stored user.
    pub async fn load(&self, email: &str) -> Result<Option<User>, ShopError> {
        self.users.get_by_email(email).await
    }

    pub async fn mark_authenticated(&self, user: &mut User) -> Result<(), ShopError> {
        self.users.set_authenticated(&user.email, true).await?;
        user.authenticated = true;
        Ok(())
    }

    pub async fn mark_unauthenticated(&self, user: &mut User) -> Result<(), ShopError> {
        self.users.set_authenticated(&user.email, false).await?;
        user.authenticated = false;
        Ok(())
    }
}

/// Hash a password into an argon2 PHC string with a random salt.
///
/// # Errors
///
/// Returns `ShopError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ShopError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ShopError::PasswordHash(e.to_string()))
}

/// Compare a password against a stored PHC string.
///
/// # Errors
///
/// Returns `ShopError::PasswordHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, ShopError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| ShopError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_in_memory;

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_password("correct horse", &a).unwrap());
        assert!(!verify_password("wrong horse", &a).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "plaintext").is_err());
    }

    #[tokio::test]
    async fn test_login_logout_flag_transitions() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register("owner@silkstore.in", "s1lk-s3cret").await.unwrap();

        let mut user = auth
            .verify("owner@silkstore.in", "s1lk-s3cret")
            .await
            .unwrap()
            .expect("valid credentials");
        assert!(!user.authenticated);

        auth.mark_authenticated(&mut user).await.unwrap();
        assert!(auth.load("owner@silkstore.in").await.unwrap().unwrap().authenticated);

        auth.mark_unauthenticated(&mut user).await.unwrap();
        assert!(!user.authenticated);
        assert!(!auth.load("owner@silkstore.in").await.unwrap().unwrap().authenticated);
    }

    #[tokio::test]
    async fn test_corrupt_hash_fails_login() {
        let pool = connect_in_memory().await.unwrap();
        UserRepository::new(&pool)
            .create("legacy@silkstore.in", "plaintext-password")
            .await
            .unwrap();

        let auth = AuthService::new(&pool);
        assert!(auth
            .verify("legacy@silkstore.in", "plaintext-password")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials_yield_none() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register("owner@silkstore.in", "s1lk-s3cret").await.unwrap();

        assert!(auth.verify("owner@silkstore.in", "nope-nope").await.unwrap().is_none());
        assert!(auth.verify("ghost@silkstore.in", "s1lk-s3cret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        assert!(auth.register("owner@silkstore.in", "short").await.is_err());
        assert!(auth.register("not-an-email", "long-enough").await.is_err());
    }
}
