//! Order Repository
//!
//! Order creation runs as one transaction: header row plus all line items,
//! or nothing. Status changes go through the shared transition table and
//! write shipping info atomically with the Shipped transition.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, ShippingInfo};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, order_date, customer_name, customer_email, customer_phone, \
     shipping_address, total_amount, status, user_id, shipping_info, payment_details";

/// Raw orders row; JSON columns are parsed in [`OrderRow::into_order`]
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_date: i64,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    shipping_address: String,
    total_amount: f64,
    status: String,
    user_id: Option<String>,
    shipping_info: Option<String>,
    payment_details: Option<String>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepoResult<Order> {
        let status = OrderStatus::parse(&self.status).ok_or_else(|| {
            RepoError::Database(format!("Order {} has unknown status {:?}", self.id, self.status))
        })?;
        let shipping_address = serde_json::from_str(&self.shipping_address)
            .map_err(|e| RepoError::Database(format!("Corrupt shipping_address: {e}")))?;
        let shipping_info = parse_json_column(self.shipping_info.as_deref())
            .map_err(|e| RepoError::Database(format!("Corrupt shipping_info: {e}")))?;
        let payment_details = parse_json_column(self.payment_details.as_deref())
            .map_err(|e| RepoError::Database(format!("Corrupt payment_details: {e}")))?;

        Ok(Order {
            id: self.id,
            order_date: self.order_date,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address,
            total_amount: self.total_amount,
            status,
            user_id: self.user_id,
            shipping_info,
            payment_details,
            items,
        })
    }
}

/// Parse an optional JSON TEXT column; NULL and empty both mean absent
fn parse_json_column<T: serde::de::DeserializeOwned>(
    value: Option<&str>,
) -> Result<Option<T>, serde_json::Error> {
    match value {
        Some(s) if !s.is_empty() => serde_json::from_str(s).map(Some),
        _ => Ok(None),
    }
}

/// Create an order with its line items in a single transaction
///
/// Any failure rolls the whole insert back — a partial order is never
/// visible. Returns the re-read order, which is what downstream
/// notification receives.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    if data.items.is_empty() {
        return Err(RepoError::Validation(
            "Order must contain at least one item".into(),
        ));
    }

    let id = shared::util::order_id();
    let now = shared::util::now_millis();
    let address_json = serde_json::to_string(&data.shipping_address)
        .map_err(|e| RepoError::Database(e.to_string()))?;
    let payment_json = data
        .payment_details
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepoError::Database(e.to_string()))?;

    // Dropping the transaction on any early return rolls it back
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, order_date, customer_name, customer_email, customer_phone, \
         shipping_address, total_amount, status, user_id, payment_details, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?2, ?2)",
    )
    .bind(&id)
    .bind(now)
    .bind(&data.customer_details.name)
    .bind(&data.customer_details.email)
    .bind(&data.customer_phone)
    .bind(&address_json)
    .bind(data.total_amount)
    .bind(OrderStatus::Pending.as_str())
    .bind(&data.user_id)
    .bind(&payment_json)
    .execute(&mut *tx)
    .await?;

    for item in &data.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, product_name, quantity, price, old_price, image) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&id)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.old_price)
        .bind(&item.image)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Order {id} missing after commit")))
}

/// Find an order with its items
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let items = find_items(pool, id).await?;
            Ok(Some(row.into_order(items)?))
        }
        None => Ok(None),
    }
}

/// All orders, newest first, with items
pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    collect_with_items(pool, rows).await
}

/// A user's orders, newest first, with items
pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY order_date DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    collect_with_items(pool, rows).await
}

async fn collect_with_items(pool: &SqlitePool, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = find_items(pool, &row.id).await?;
        orders.push(row.into_order(items)?);
    }
    Ok(orders)
}

async fn find_items(pool: &SqlitePool, order_id: &str) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT product_id, product_name, quantity, price, old_price, image \
         FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Update an order's status
///
/// Validates the transition against the shared state machine. Entering
/// Shipped requires shipping info, which is written in the same UPDATE as
/// the status. Unknown order ids are a distinct NotFound.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    new_status: OrderStatus,
    shipping_info: Option<ShippingInfo>,
) -> RepoResult<Order> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if !current.status.can_transition_to(new_status) {
        return Err(RepoError::Validation(format!(
            "Cannot change status from {} to {}",
            current.status.as_str(),
            new_status.as_str()
        )));
    }

    let rule = new_status.transition_rule();
    if rule.requires_shipping_info {
        let info = shipping_info.as_ref().ok_or_else(|| {
            RepoError::Validation(
                "Carrier, tracking number and estimated delivery are required to mark an order Shipped"
                    .into(),
            )
        })?;
        if info.carrier.trim().is_empty()
            || info.tracking_number.trim().is_empty()
            || info.estimated_delivery.trim().is_empty()
        {
            return Err(RepoError::Validation(
                "Carrier, tracking number and estimated delivery must all be non-empty".into(),
            ));
        }
    }

    let now = shared::util::now_millis();
    let result = if rule.requires_shipping_info {
        let info_json = serde_json::to_string(&shipping_info)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        sqlx::query("UPDATE orders SET status = ?1, shipping_info = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(new_status.as_str())
            .bind(info_json)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?
    } else {
        sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(new_status.as_str())
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?
    };

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}
