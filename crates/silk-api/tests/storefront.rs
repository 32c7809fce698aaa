//! End-to-end storefront flows through the HTTP layer.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig, TestResponse};
use serde_json::{json, Value};
use silk_api::{create_router, create_session_layer, AppConfig, AppState};
use silk_core::{
    BoxedPaymentGateway, CheckoutSession, PaymentGateway, Price, ProviderPrice, ShopError,
    ShopResult,
};
use silk_db::{AuthService, ItemRepository, UserRepository};
use silk_stripe::{StripeConfig, StripeGateway};
use sqlx::SqlitePool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "owner@silk.in";
const PASSWORD: &str = "correct horse";

/// Gateway that provisions predictable ids and knows one missing price.
struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_price(
        &self,
        name: &str,
        _image: &str,
        _price: &Price,
    ) -> ShopResult<ProviderPrice> {
        let slug = name.to_lowercase().replace(' ', "_");
        Ok(ProviderPrice {
            product_id: format!("prod_{slug}"),
            price_id: format!("price_{slug}"),
        })
    }

    async fn create_checkout(
        &self,
        price_id: &str,
        _success_url: &str,
        _cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if price_id == "price_missing" {
            return Err(ShopError::ProviderError {
                provider: "fake".to_string(),
                message: "No such price: 'price_missing'".to_string(),
            });
        }
        Ok(CheckoutSession::new(
            format!("cs_{price_id}"),
            "fake",
            format!("https://checkout.example.com/{price_id}"),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

async fn server_with(gateway: BoxedPaymentGateway) -> (TestServer, SqlitePool) {
    let pool = silk_db::connect_in_memory().await.unwrap();
    AuthService::new(&pool).register(EMAIL, PASSWORD).await.unwrap();

    let state = AppState::new(AppConfig::default(), pool.clone(), gateway);
    let sessions = create_session_layer(&pool, &state.config).await.unwrap();
    let app = create_router(state, sessions);

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    (TestServer::new_with_config(app, config).unwrap(), pool)
}

async fn server() -> (TestServer, SqlitePool) {
    server_with(Arc::new(FakeGateway)).await
}

async fn login(server: &TestServer) {
    let response = server
        .post("/login")
        .form(&[("email", EMAIL), ("password", PASSWORD)])
        .await;
    assert_redirect(&response, "/");
}

async fn add(server: &TestServer, name: &str, price: &str) -> TestResponse {
    server
        .post("/add")
        .form(&[
            ("name", name),
            ("urlimage", "https://img.example.com/silk.jpg"),
            ("price", price),
        ])
        .await
}

fn assert_redirect(response: &TestResponse, location: &str) {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location").to_str().unwrap(), location);
}

#[tokio::test]
async fn test_health() {
    let (server, _pool) = server().await;
    let body: Value = server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_sets_flag_and_logout_clears_it() {
    let (server, pool) = server().await;
    let users = UserRepository::new(&pool);

    login(&server).await;
    assert!(users.get_by_email(EMAIL).await.unwrap().unwrap().authenticated);

    let body: Value = server.get("/").await.json();
    assert_eq!(body["user"], EMAIL);

    assert_redirect(&server.get("/logout").await, "/");
    assert!(!users.get_by_email(EMAIL).await.unwrap().unwrap().authenticated);

    assert_redirect(&server.get("/add").await, "/login");
}

#[tokio::test]
async fn test_bad_login_rerenders_form() {
    let (server, pool) = server().await;

    for (email, password) in [(EMAIL, "wrong password"), ("nobody@silk.in", PASSWORD)] {
        let response = server
            .post("/login")
            .form(&[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("<form method=\"post\" action=\"/login\">"));
    }

    let partial = server.post("/login").form(&[("email", EMAIL)]).await;
    assert_eq!(partial.status_code(), StatusCode::OK);
    assert!(partial.text().contains("action=\"/login\""));

    let user = UserRepository::new(&pool).get_by_email(EMAIL).await.unwrap().unwrap();
    assert!(!user.authenticated);
    assert_redirect(&server.get("/salesReport").await, "/login");
}

#[tokio::test]
async fn test_gated_routes_redirect_anonymous_callers() {
    let (server, pool) = server().await;

    for route in ["/add", "/delete", "/delete/1", "/update", "/update/1", "/salesReport", "/logout"] {
        assert_redirect(&server.get(route).await, "/login");
    }
    assert_redirect(&add(&server, "Banarasi", "1499").await, "/login");
    assert_redirect(&server.post("/delete/1").await, "/login");

    assert_eq!(ItemRepository::new(&pool).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_item_stores_provisioned_price() {
    let (server, _pool) = server().await;
    login(&server).await;

    assert_eq!(add(&server, "Banarasi Silk", "1499.50").await.status_code(), StatusCode::SEE_OTHER);

    let body: Value = server.get("/").await.json();
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["items"][0]["name"], "Banarasi Silk");
    assert_eq!(body["items"][0]["price"], 1499.5);
    assert_eq!(body["items"][0]["price_id"], "price_banarasi_silk");

    let store: Value = server.get("/store").await.json();
    assert_eq!(store["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_rejects_duplicate_and_bad_price() {
    let (server, pool) = server().await;
    login(&server).await;

    add(&server, "Kanjivaram", "2999").await;
    assert_eq!(add(&server, "Kanjivaram", "100").await.status_code(), StatusCode::CONFLICT);
    assert_eq!(add(&server, "Tussar", "cheap").await.status_code(), StatusCode::BAD_REQUEST);

    let items = ItemRepository::new(&pool).list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, 2999.0);
}

#[tokio::test]
async fn test_update_keeps_blank_fields() {
    let (server, pool) = server().await;
    login(&server).await;
    add(&server, "Chanderi", "800").await;
    let id = ItemRepository::new(&pool).list().await.unwrap()[0].id;

    let response = server
        .post(&format!("/update/{id}"))
        .form(&[("name", ""), ("urlimage", ""), ("price", "950")])
        .await;
    assert_redirect(&response, "/update");

    let item: Value = server.get(&format!("/update/{id}")).await.json();
    assert_eq!(item["name"], "Chanderi");
    assert_eq!(item["price"], 950.0);
    assert_eq!(item["price_id"], "price_chanderi");

    let missing = server.post("/update/999").form(&[("price", "1")]).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_only_target() {
    let (server, pool) = server().await;
    login(&server).await;
    add(&server, "Muga", "3500").await;
    add(&server, "Eri", "1200").await;
    let items = ItemRepository::new(&pool).list().await.unwrap();

    let confirm: Value = server.get(&format!("/delete/{}", items[0].id)).await.json();
    assert_eq!(confirm["name"], "Muga");

    assert_redirect(&server.post(&format!("/delete/{}", items[0].id)).await, "/delete");

    let remaining: Value = server.get("/delete").await.json();
    assert_eq!(remaining["items"].as_array().unwrap().len(), 1);
    assert_eq!(remaining["items"][0]["name"], "Eri");

    let again = server.post(&format!("/delete/{}", items[0].id)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_matches_substring() {
    let (server, _pool) = server().await;
    login(&server).await;
    add(&server, "Mysore Silk", "2100").await;
    add(&server, "Cotton Saree", "600").await;

    let body: Value = server.get("/search").add_query_param("search", "silk").await.json();
    assert_eq!(body["search"], "silk");
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["products"][0]["name"], "Mysore Silk");

    let everything: Value = server.get("/search").await.json();
    assert_eq!(everything["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_sales_report_totals_prices() {
    let (server, _pool) = server().await;
    login(&server).await;
    add(&server, "Paithani", "4000").await;
    add(&server, "Patola", "5000.5").await;

    let report: Value = server.get("/salesReport").await.json();
    assert_eq!(report["title"], "Stock details");
    assert_eq!(report["columns"], json!(["ID", "Name", "Image url", "Price"]));
    assert_eq!(report["rows"].as_array().unwrap().len(), 2);
    assert_eq!(report["total"], 9000.5);

    let posted = server.post("/salesReport").await;
    assert_eq!(posted.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_redirects_to_provider() {
    let (server, _pool) = server().await;

    let response = server.post("/create-checkout-session/price_banarasi").await;
    assert_redirect(&response, "https://checkout.example.com/price_banarasi");
}

#[tokio::test]
async fn test_checkout_failure_returns_raw_message() {
    let (server, _pool) = server().await;

    let response = server.post("/create-checkout-session/price_missing").await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.text(), "No such price: 'price_missing'");
}

#[tokio::test]
async fn test_checkout_through_stripe_gateway() {
    let stripe = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No such price: 'price_gone'"
            }
        })))
        .expect(1)
        .mount(&stripe)
        .await;

    let config = StripeConfig::new("sk_test_abc123").with_api_base_url(stripe.uri());
    let gateway = StripeGateway::new(config).unwrap();
    let (server, _pool) = server_with(Arc::new(gateway)).await;

    let response = server.post("/create-checkout-session/price_gone").await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.text(), "No such price: 'price_gone'");
}

#[tokio::test]
async fn test_checkout_return_pages() {
    let (server, _pool) = server().await;

    assert!(server.get("/success").await.text().contains("Payment Successful"));
    assert!(server.get("/cancel").await.text().contains("Payment Cancelled"));
}
