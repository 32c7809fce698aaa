//! # silk-stripe
//!
//! Stripe payment gateway for silk-store.
//!
//! `StripeGateway` implements `silk_core::PaymentGateway` on top of Stripe's
//! form-encoded REST API:
//!
//! - **Provisioning** - `POST /v1/products` then `POST /v1/prices` when an
//!   item is added to the catalog
//! - **Checkout** - `POST /v1/checkout/sessions` with the item's price id,
//!   returning the hosted page URL
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use silk_stripe::StripeGateway;
//! use silk_core::PaymentGateway;
//!
//! let gateway = StripeGateway::from_env()?;
//!
//! let session = gateway.create_checkout(
//!     "price_1QabcXYZ",
//!     "http://localhost:5000/success",
//!     "http://localhost:5000/cancel",
//! ).await?;
//!
//! // Redirect the shopper to session.checkout_url
//! ```

pub mod catalog;
pub mod checkout;
pub mod config;

// Re-exports
pub use catalog::{StripePrice, StripeProduct};
pub use checkout::StripeGateway;
pub use config::StripeConfig;
