//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::notify::NotificationEvent;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::models::{Order, OrderCreate, OrderStatus, ShippingInfo};
use shared::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// Create a new order (public — guest checkout permitted)
///
/// Persists the order and its items in one transaction, then hands the
/// committed order to the notification worker without waiting for it.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_create(&payload)?;

    let order = order_repo::create(&state.pool, payload)
        .await
        .map_err(AppError::from)?;

    state
        .notifications
        .publish(NotificationEvent::NewOrder(order.clone()));

    Ok(Json(order))
}

/// List all orders, newest first (admin only)
pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_admin()?;

    let orders = order_repo::find_all(&state.pool, query.limit, query.offset)
        .await
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

/// The logged-in customer's orders
pub async fn my_orders(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo::find_by_user(&state.pool, &user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

/// Get one order with its items (admin, or the customer who owns it)
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = order_repo::find_by_id(&state.pool, &id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if !user.is_admin() && order.user_id.as_deref() != Some(user.id.as_str()) {
        return Err(AppError::forbidden("Access denied to this order"));
    }

    Ok(Json(order))
}

/// Status update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Status name ("Processing", "Shipped", ...); parsed here so an
    /// unknown value is a clean validation error
    pub status: String,
    pub shipping_info: Option<ShippingInfo>,
}

/// Update an order's status (admin only)
///
/// The persisted transition triggers a customer notification when a
/// template is configured for the target status.
pub async fn update_status(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;

    let new_status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::validation(format!("Unknown status {:?}", payload.status)))?;

    let order = order_repo::update_status(&state.pool, &id, new_status, payload.shipping_info)
        .await
        .map_err(AppError::from)?;

    state.notifications.publish(NotificationEvent::StatusChanged {
        order: order.clone(),
        status: new_status,
    });

    Ok(Json(order))
}

/// Checkout validation, applied before any persistence attempt
fn validate_create(payload: &OrderCreate) -> Result<(), AppError> {
    validate_required_text(&payload.customer_details.name, "Customer name", MAX_NAME_LEN)?;
    validate_required_text(
        &payload.customer_details.email,
        "Customer email",
        MAX_EMAIL_LEN,
    )?;
    validate_optional_text(&payload.customer_phone, "Customer phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.shipping_address.street, "Street", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.shipping_address.city, "City", MAX_NAME_LEN)?;
    validate_required_text(&payload.shipping_address.zip, "Postal code", MAX_SHORT_TEXT_LEN)?;

    if payload.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    for item in &payload.items {
        validate_required_text(&item.product_id, "Product id", MAX_NAME_LEN)?;
        validate_required_text(&item.product_name, "Product name", MAX_NAME_LEN)?;
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity for {} must be at least 1",
                item.product_id
            )));
        }
    }
    if payload.total_amount < 0.0 {
        return Err(AppError::validation("Total amount cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CustomerDetails, OrderItem, ShippingAddress};

    fn valid_payload() -> OrderCreate {
        OrderCreate {
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                product_name: "Product 1".to_string(),
                quantity: 1,
                price: 100.0,
                old_price: None,
                image: String::new(),
            }],
            customer_details: CustomerDetails {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
            },
            customer_phone: None,
            total_amount: 100.0,
            shipping_address: ShippingAddress {
                street: "12 MG Road".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                zip: "411001".to_string(),
            },
            user_id: None,
            payment_details: None,
        }
    }

    #[test]
    fn valid_checkout_passes() {
        assert!(validate_create(&valid_payload()).is_ok());
    }

    #[test]
    fn missing_customer_fields_are_rejected() {
        let mut payload = valid_payload();
        payload.customer_details.name = "  ".to_string();
        assert!(validate_create(&payload).is_err());

        let mut payload = valid_payload();
        payload.customer_details.email = String::new();
        assert!(validate_create(&payload).is_err());
    }

    #[test]
    fn empty_cart_is_rejected() {
        let mut payload = valid_payload();
        payload.items.clear();
        assert!(validate_create(&payload).is_err());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut payload = valid_payload();
        payload.items[0].quantity = 0;
        assert!(validate_create(&payload).is_err());
    }
}
