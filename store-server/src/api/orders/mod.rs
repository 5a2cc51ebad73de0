//! Order API Module
//!
//! Checkout is public (guest checkout is allowed); everything else requires
//! a verified identity, and list/status routes require the Admin role.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Checkout + admin list
        .route("/", post(handler::create).get(handler::list))
        // The logged-in customer's own orders
        .route("/my-orders", get(handler::my_orders))
        // Single order (admin or owner)
        .route("/{id}", get(handler::get_by_id))
        // Status transition (admin)
        .route("/{id}/status", put(handler::update_status))
}
