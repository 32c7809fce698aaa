//! # silk-api
//!
//! HTTP storefront for silk-store.
//!
//! This crate provides:
//! - Axum-based HTTP server with cookie sessions
//! - Login-gated catalog management and the stock report
//! - Hosted checkout redirects
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/` | Catalog with item count |
//! | GET/POST | `/login` | Login form / submit |
//! | GET | `/logout` | End the session (login required) |
//! | GET/POST | `/add` | Add an item (login required) |
//! | GET | `/delete`, `/delete/{id}` | Delete listing / confirmation (login required) |
//! | POST | `/delete/{id}` | Delete an item (login required) |
//! | GET | `/update`, `/update/{id}` | Edit listing / current item (login required) |
//! | POST | `/update/{id}` | Update an item (login required) |
//! | GET/POST | `/salesReport` | Stock report (login required) |
//! | GET | `/store`, `/report` | Public listings |
//! | GET | `/search?search=` | Name search |
//! | POST | `/create-checkout-session/{price_id}` | Redirect to hosted checkout |
//! | GET | `/success`, `/cancel` | Checkout return pages |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

pub use auth::{OptionalLogin, RequireLogin};
pub use error::ApiError;
pub use routes::create_router;
pub use session::create_session_layer;
pub use state::{AppConfig, AppState};
