//! # Shop Error Types
//!
//! Typed error handling for the silk-store storefront.
//! Store and gateway operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for store and payment operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any storage failure that is not a known constraint violation
    #[error("Database error: {0}")]
    Database(String),

    /// Unique constraint on the item name was violated
    #[error("Item name already exists: {name}")]
    DuplicateName { name: String },

    /// Item id not present in the catalog
    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Password hashing or hash parsing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),

    /// Payment provider API error. The message is the provider's own text.
    #[error("{message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Configuration(_) => 500,
            ShopError::Database(_) => 500,
            ShopError::DuplicateName { .. } => 409,
            ShopError::ItemNotFound { .. } => 404,
            ShopError::InvalidRequest(_) => 400,
            ShopError::PasswordHash(_) => 500,
            ShopError::Session(_) => 500,
            ShopError::ProviderError { .. } => 502,
            ShopError::NetworkError(_) => 503,
            ShopError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for store and payment operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ShopError::DuplicateName {
                name: "Saree".into()
            }
            .status_code(),
            409
        );
        assert_eq!(ShopError::ItemNotFound { id: 7 }.status_code(), 404);
        assert_eq!(
            ShopError::InvalidRequest("price".into()).status_code(),
            400
        );
        assert_eq!(
            ShopError::ProviderError {
                provider: "stripe".into(),
                message: "No such price".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_provider_error_displays_raw_message() {
        let err = ShopError::ProviderError {
            provider: "stripe".into(),
            message: "No such price: 'price_missing'".into(),
        };
        assert_eq!(err.to_string(), "No such price: 'price_missing'");
    }
}
