//! # User Types
//!
//! Credential store record. Accounts are provisioned out of band; the web
//! app only flips the `authenticated` flag.

use serde::{Deserialize, Serialize};

/// A store account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique account identifier
    pub email: String,

    /// Argon2 PHC string, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Set on login, cleared on logout
    #[serde(default)]
    pub authenticated: bool,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            authenticated: false,
        }
    }

    /// Identity stored in the session for this user
    pub fn session_id(&self) -> &str {
        &self.email
    }
}
