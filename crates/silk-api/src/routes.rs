//! # Route Definitions
//!
//! Axum router configuration.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

/// Create the storefront router
pub fn create_router(state: AppState, sessions: SessionManagerLayer<SqliteStore>) -> Router {
    // Login-gated catalog management
    let admin_routes = Router::new()
        .route("/add", get(handlers::add_page).post(handlers::add_item))
        .route("/delete", get(handlers::delete_list))
        .route(
            "/delete/{id}",
            get(handlers::delete_confirm).post(handlers::delete_item),
        )
        .route("/update", get(handlers::update_list))
        .route(
            "/update/{id}",
            get(handlers::update_page).post(handlers::update_item),
        )
        .route(
            "/salesReport",
            get(handlers::sales_report).post(handlers::sales_report),
        )
        .route("/logout", get(handlers::logout));

    // Checkout
    let checkout_routes = Router::new()
        .route(
            "/create-checkout-session/{price_id}",
            post(handlers::create_checkout_session),
        )
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/store", get(handlers::store))
        .route("/report", get(handlers::report))
        .route("/search", get(handlers::search))
        .merge(admin_routes)
        .merge(checkout_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(sessions),
        )
        // State
        .with_state(state)
}
