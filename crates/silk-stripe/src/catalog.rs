//! # Stripe Products and Prices
//!
//! Every catalog item gets a Stripe product carrying its image and a
//! one-time price in the store currency. The price id is what checkout
//! later references.

use crate::checkout::StripeGateway;
use serde::Deserialize;
use silk_core::{Price, ShopError, ShopResult};
use tracing::info;

/// Product object returned by `POST /v1/products`
#[derive(Debug, Clone, Deserialize)]
pub struct StripeProduct {
    pub id: String,
    pub name: String,
}

/// Price object returned by `POST /v1/prices`
#[derive(Debug, Clone, Deserialize)]
pub struct StripePrice {
    pub id: String,
    pub product: String,
    #[serde(default)]
    pub unit_amount: Option<i64>,
    pub currency: String,
}

impl StripeGateway {
    /// Create a product with a single image.
    pub async fn create_product(&self, name: &str, image: &str) -> ShopResult<StripeProduct> {
        if name.trim().is_empty() {
            return Err(ShopError::InvalidRequest("product name is empty".to_string()));
        }

        let mut form_params = vec![("name".to_string(), name.to_string())];
        if !image.trim().is_empty() {
            form_params.push(("images[0]".to_string(), image.to_string()));
        }

        let product: StripeProduct = self.post_form("/v1/products", &form_params).await?;
        info!("Created Stripe product: id={}, name={}", product.id, product.name);
        Ok(product)
    }

    /// Create a one-time price for an existing product.
    pub async fn create_unit_price(&self, product_id: &str, price: &Price) -> ShopResult<StripePrice> {
        if price.amount < 0 {
            return Err(ShopError::InvalidRequest(format!(
                "negative price: {}",
                price.display()
            )));
        }

        let form_params = vec![
            ("product".to_string(), product_id.to_string()),
            ("unit_amount".to_string(), price.amount.to_string()),
            ("currency".to_string(), price.currency.as_str().to_string()),
        ];

        let created: StripePrice = self.post_form("/v1/prices", &form_params).await?;
        info!(
            "Created Stripe price: id={}, product={}, amount={}",
            created.id,
            created.product,
            price.display()
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use crate::{StripeConfig, StripeGateway};
    use serde_json::json;
    use silk_core::{Currency, PaymentGateway, Price, ShopError};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> StripeGateway {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripeGateway::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_create_price_provisions_product_then_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .and(body_string_contains("name=Kanjivaram+Saree"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "prod_kanji",
                "name": "Kanjivaram Saree"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .and(body_string_contains("product=prod_kanji"))
            .and(body_string_contains("unit_amount=499900"))
            .and(body_string_contains("currency=inr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "price_kanji",
                "product": "prod_kanji",
                "unit_amount": 499900,
                "currency": "inr"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let provisioned = gateway
            .create_price(
                "Kanjivaram Saree",
                "https://img.silkstore.in/kanjivaram.jpg",
                &Price::new(4999.0, Currency::INR),
            )
            .await
            .unwrap();

        assert_eq!(provisioned.product_id, "prod_kanji");
        assert_eq!(provisioned.price_id, "price_kanji");
    }

    #[tokio::test]
    async fn test_product_failure_skips_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Invalid API Key provided: sk_test_****" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway
            .create_price("Silk", "https://img/1.jpg", &Price::new(10.0, Currency::INR))
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::ProviderError { .. }));
        assert!(err.to_string().starts_with("Invalid API Key"));
    }
}
