//! # silk-core
//!
//! Core types and traits for the silk-store storefront.
//!
//! This crate provides:
//! - `User` for the credential store
//! - `Item`, `NewItem` and `ItemUpdate` for the catalog
//! - `Currency` and `Price` for amount conversion
//! - `PaymentGateway` trait for the hosted-checkout provider
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use silk_core::{Currency, NewItem, PaymentGateway, Price};
//!
//! // Provision the external price before storing the item
//! let price = Price::new(1499.0, Currency::INR);
//! let provider_price = gateway.create_price("Banarasi Silk", "https://img/1.jpg", &price).await?;
//!
//! let new_item = NewItem::new("Banarasi Silk", "https://img/1.jpg", 1499.0, provider_price.price_id);
//!
//! // Later, send the shopper to the hosted checkout page
//! let session = gateway.create_checkout(&new_item.price_id, &urls.success_url(), &urls.cancel_url()).await?;
//! ```

pub mod checkout;
pub mod error;
pub mod gateway;
pub mod item;
pub mod price;
pub mod user;

// Re-exports for convenience
pub use checkout::{CheckoutSession, ProviderPrice};
pub use error::{ShopError, ShopResult};
pub use gateway::{BoxedPaymentGateway, CheckoutUrls, PaymentGateway};
pub use item::{Item, ItemUpdate, NewItem};
pub use price::{Currency, Price};
pub use user::User;
