//! # Stripe Checkout Sessions
//!
//! Hosted checkout for a single catalog price. Stripe collects the payment
//! details; the storefront only redirects to the returned URL.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use silk_core::{CheckoutSession, PaymentGateway, Price, ProviderPrice, ShopError, ShopResult};
use tracing::{debug, error, info, instrument};

pub(crate) const PROVIDER: &str = "stripe";

/// Stripe implementation of `PaymentGateway`
pub struct StripeGateway {
    pub(crate) config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway with a 30 second request timeout
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// POST a form-encoded request and decode the JSON body.
    ///
    /// Every POST carries a fresh idempotency key.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form_params: &[(String, String)],
    ) -> ShopResult<T> {
        let url = self.config.endpoint(path);
        let idempotency_key = uuid::Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(form_params)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: path={}, status={}, body={}", path, status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShopError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShopError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, image, price), fields(amount = price.amount, currency = %price.currency))]
    async fn create_price(
        &self,
        name: &str,
        image: &str,
        price: &Price,
    ) -> ShopResult<ProviderPrice> {
        let product = self.create_product(name, image).await?;
        let price = self.create_unit_price(&product.id, price).await?;

        Ok(ProviderPrice {
            product_id: product.id,
            price_id: price.id,
        })
    }

    #[instrument(skip(self, success_url, cancel_url))]
    async fn create_checkout(
        &self,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if price_id.trim().is_empty() {
            return Err(ShopError::InvalidRequest("price reference is empty".to_string()));
        }

        debug!("Creating Stripe checkout session for {}", price_id);

        let form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
            ("line_items[0][price]".to_string(), price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];

        let session: StripeCheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &form_params).await?;

        let checkout_url = session.url.ok_or_else(|| ShopError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("checkout session {} has no redirect URL", session.id),
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, checkout_url
        );

        Ok(CheckoutSession {
            session_id: session.id,
            provider: PROVIDER.to_string(),
            checkout_url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: Utc::now(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
