//! Shared types for the storefront
//!
//! Common types used by the server and client front-ends: domain models,
//! the session cart, shipping pricing, error/response structures.

pub mod cart;
pub mod error;
pub mod models;
pub mod pricing;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use cart::{Cart, QuantityOutcome};
pub use error::{AppError, AppResponse, AppResult};
pub use pricing::{compute_shipping, order_total};
