//! # Payment Gateway Trait
//!
//! Seam between the storefront and the external payment provider.
//! The storefront never handles card data; it provisions prices for new
//! catalog items and asks the provider for hosted checkout pages.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── create_price()      add flow                           │
//! │  ├── create_checkout()   checkout flow                      │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ StripeGateway │
//!                    └───────────────┘
//! ```

use crate::checkout::{CheckoutSession, ProviderPrice};
use crate::error::ShopResult;
use crate::price::Price;
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a provider product and a one-time price for a catalog item.
    ///
    /// # Arguments
    /// * `name` - Product display name
    /// * `image` - Product image URL
    /// * `price` - Unit price in the store currency
    async fn create_price(&self, name: &str, image: &str, price: &Price)
        -> ShopResult<ProviderPrice>;

    /// Create a hosted checkout session for a single unit of `price_id`.
    ///
    /// # Returns
    /// A `CheckoutSession` containing the provider page to redirect to.
    async fn create_checkout(
        &self,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Configuration for URLs used in checkout
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the application (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success".to_string(),
            cancel_path: "/cancel".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}
