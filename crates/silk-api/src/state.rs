//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the store pool, the payment gateway, and configuration.

use silk_core::{BoxedPaymentGateway, CheckoutUrls, Currency, ShopError};
use silk_stripe::StripeGateway;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for checkout callbacks
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// SQLite connection string
    pub database_url: String,
    /// Currency new catalog prices are created in
    pub currency: Currency,
}

impl AppConfig {
    /// Load from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Configuration` for an unparseable `PORT` or
    /// `STORE_CURRENCY`.
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(p) => p
                .parse()
                .map_err(|_| ShopError::Configuration(format!("invalid PORT: {p}")))?,
            Err(_) => 5000,
        };

        let currency = match std::env::var("STORE_CURRENCY") {
            Ok(c) => c.parse().map_err(ShopError::Configuration)?,
            Err(_) => Currency::default(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| silk_db::DEFAULT_DATABASE_URL.to_string()),
            currency,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, ShopError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("invalid socket address: {e}")))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Session cookies are marked Secure when served over https
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            environment: "development".to_string(),
            database_url: silk_db::DEFAULT_DATABASE_URL.to_string(),
            currency: Currency::default(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Credential and catalog store
    pub pool: SqlitePool,
    /// Payment provider
    pub gateway: BoxedPaymentGateway,
    /// Checkout URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool, gateway: BoxedPaymentGateway) -> Self {
        let urls = CheckoutUrls::new(&config.base_url);
        Self {
            pool,
            gateway,
            urls,
            config,
        }
    }

    /// Open the store and initialize the Stripe gateway from the environment
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let pool = silk_db::connect(&config.database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if gateway.config().is_live_mode() {
            info!("Stripe running with live keys");
        } else {
            info!("Stripe running with test keys");
        }

        Ok(Self::new(config, pool, Arc::new(gateway) as BoxedPaymentGateway))
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    pub fn success_url(&self) -> String {
        self.urls.success_url()
    }

    pub fn cancel_url(&self) -> String {
        self.urls.cancel_url()
    }
}
