//! # Request Handlers
//!
//! Axum request handlers for the storefront.
//! Catalog mutations and the sales report require a logged-in user.

use crate::auth::{clear_current_user, set_current_user, OptionalLogin, RequireLogin};
use crate::error::ApiError;
use crate::pages;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use silk_core::{Item, ItemUpdate, NewItem, Price, ShopError};
use silk_db::{stock_report, AuthService, ItemRepository, StockReport};
use tower_sessions::Session;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Login form data. Missing fields count as blank.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Add item form data
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub name: String,
    pub urlimage: String,
    pub price: String,
}

/// Update item form data. Blank fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub urlimage: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl UpdateItemForm {
    fn into_update(self) -> Result<ItemUpdate, ShopError> {
        let mut update = ItemUpdate::default();
        if let Some(name) = non_blank(self.name) {
            update = update.with_name(name);
        }
        if let Some(image) = non_blank(self.urlimage) {
            update = update.with_image(image);
        }
        if let Some(price) = non_blank(self.price) {
            update = update.with_price(parse_price(&price)?);
        }
        Ok(update)
    }
}

/// Search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Catalog listing
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Search results
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search: String,
    pub products: Vec<Item>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_price(raw: &str) -> Result<f64, ShopError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ShopError::InvalidRequest(format!("invalid price: {raw}")))
}

// =============================================================================
// Authentication
// =============================================================================

/// Login form
pub async fn login_page() -> Html<&'static str> {
    Html(pages::LOGIN_FORM)
}

/// Verify credentials and start a session.
///
/// Unknown email, wrong password and missing fields all re-render the form.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let auth = AuthService::new(&state.pool);

    let Some(mut user) = auth.verify(&form.email, &form.password).await? else {
        info!("Login failed");
        return Ok(Html(pages::LOGIN_FORM).into_response());
    };

    auth.mark_authenticated(&mut user).await?;
    set_current_user(&session, &user).await?;

    info!("Logged in {}", user.email);
    Ok(Redirect::to("/").into_response())
}

/// Clear the authenticated flag, then invalidate the session.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireLogin(mut user): RequireLogin,
) -> Result<Redirect, ApiError> {
    AuthService::new(&state.pool)
        .mark_unauthenticated(&mut user)
        .await?;
    clear_current_user(&session).await?;

    info!("Logged out {}", user.email);
    Ok(Redirect::to("/"))
}

// =============================================================================
// Catalog
// =============================================================================

/// Home page: every item plus a count
pub async fn index(
    State(state): State<AppState>,
    OptionalLogin(user): OptionalLogin,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(ItemsResponse {
        total_items: Some(items.len()),
        items,
        user: user.map(|u| u.email),
    }))
}

/// Public storefront listing
pub async fn store(State(state): State<AppState>) -> Result<Json<ItemsResponse>, ApiError> {
    let items = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(ItemsResponse {
        items,
        total_items: None,
        user: None,
    }))
}

/// Public item listing used by the report page
pub async fn report(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(serde_json::json!({ "reports": reports })))
}

/// Add form
pub async fn add_page(RequireLogin(_user): RequireLogin) -> Html<&'static str> {
    Html(pages::ADD_FORM)
}

/// Provision the provider price, then store the item.
///
/// The provider objects are created first; a store failure afterwards
/// leaves them orphaned.
#[instrument(skip(state, _user, form), fields(name = %form.name))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    Form(form): Form<AddItemForm>,
) -> Result<Redirect, ApiError> {
    let price = parse_price(&form.price)?;
    let name = form.name.trim().to_string();
    let image = form.urlimage.trim().to_string();

    ItemUpdate::default()
        .with_name(&name)
        .with_image(&image)
        .with_price(price)
        .validate()?;

    let provisioned = state
        .gateway
        .create_price(&name, &image, &Price::new(price, state.currency()))
        .await
        .map_err(|e| {
            error!("Failed to provision price: {}", e);
            e
        })?;

    let item = ItemRepository::new(&state.pool)
        .create(&NewItem::new(name, image, price, provisioned.price_id))
        .await?;

    info!("Added item {} with price {}", item.id, item.price_id);
    Ok(Redirect::to("/"))
}

/// Items offered for deletion
pub async fn delete_list(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(ItemsResponse {
        items,
        total_items: None,
        user: None,
    }))
}

/// Delete confirmation: the item about to be removed
pub async fn delete_confirm(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(ItemRepository::new(&state.pool).get(id).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    Path(id): Path<i64>,
) -> Result<Redirect, ApiError> {
    ItemRepository::new(&state.pool).delete(id).await?;
    Ok(Redirect::to("/delete"))
}

/// Items offered for editing
pub async fn update_list(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(ItemsResponse {
        total_items: Some(items.len()),
        items,
        user: None,
    }))
}

/// Edit form data: the current item
pub async fn update_page(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(ItemRepository::new(&state.pool).get(id).await?))
}

/// Apply the submitted fields. The provider price is left as provisioned.
pub async fn update_item(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    Path(id): Path<i64>,
    Form(form): Form<UpdateItemForm>,
) -> Result<Redirect, ApiError> {
    let update = form.into_update()?;
    ItemRepository::new(&state.pool).update(id, &update).await?;
    Ok(Redirect::to("/update"))
}

/// Name search over the catalog
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let term = query.search.unwrap_or_default();
    let products = ItemRepository::new(&state.pool).search(&term).await?;
    Ok(Json(SearchResponse {
        search: term,
        products,
    }))
}

/// Stock details report
pub async fn sales_report(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
) -> Result<Json<StockReport>, ApiError> {
    Ok(Json(stock_report(&state.pool).await?))
}

// =============================================================================
// Checkout
// =============================================================================

/// Send the shopper to the provider's hosted checkout page.
///
/// Provider failures come back as their raw text.
#[instrument(skip(state))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Path(price_id): Path<String>,
) -> Response {
    match state
        .gateway
        .create_checkout(&price_id, &state.success_url(), &state.cancel_url())
        .await
    {
        Ok(session) => {
            info!("Created checkout session: {}", session.session_id);
            Redirect::to(&session.checkout_url).into_response()
        }
        Err(e) => {
            error!("Failed to create checkout: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

pub async fn checkout_success() -> Html<&'static str> {
    Html(pages::CHECKOUT_SUCCESS)
}

pub async fn checkout_cancel() -> Html<&'static str> {
    Html(pages::CHECKOUT_CANCEL)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "silk-store",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
