//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness checks
//! - [`orders`] - order creation, queries and status updates

pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use shared::{AppResponse, AppResult};
