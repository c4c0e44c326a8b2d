//! Thin wrappers over the backend endpoints, implemented as methods on [`ApiClient`].
//!
//! Responses the client reads itself (auth, cart, orders) are typed; analytics, forecasts,
//! and other computed payloads are passed through as [`serde_json::Value`] because the
//! backend owns their shape.
//!
//! [`ApiClient`]: crate::client::ApiClient

pub mod auth;
pub mod cart;
pub mod finance;
pub mod insights;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod profile;
pub mod sales;

pub use auth::*;
pub use cart::*;
pub use insights::*;
pub use inventory::*;
pub use orders::*;
pub use products::*;
pub use sales::*;
