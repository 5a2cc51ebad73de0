//! Session Cart
//!
//! Client-held cart state: one line per product, quantities capped at the
//! product's known stock, plus a shipping-address draft. Serializable so a
//! front-end can stash it for the browsing session. Totals are derived
//! against an explicitly passed settings snapshot — the cart holds no
//! configuration of its own.
//!
//! The stock cap here is a UX policy; the server does not re-clamp.

use crate::models::{OrderItem, Product, ShippingAddress, ShippingSettings};
use crate::pricing;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of a quantity change, for surfacing UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// Quantity applied as requested
    Updated,
    /// Requested quantity exceeded stock; clamped to the contained value
    Clamped(i32),
    /// Quantity dropped to zero or below; the line was removed
    Removed,
    /// No line with that product id
    NotInCart,
}

/// Session-scoped cart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    items: Vec<OrderItem>,
    shipping_address: Option<ShippingAddress>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Add a product to the cart
    ///
    /// An existing line accumulates quantity; either way the line is capped
    /// at the product's stock.
    pub fn add(&mut self, product: &Product, quantity: i32) -> QuantityOutcome {
        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let requested = line.quantity + quantity;
            line.quantity = requested.min(product.stock);
            if requested > product.stock {
                return QuantityOutcome::Clamped(line.quantity);
            }
            return QuantityOutcome::Updated;
        }

        let capped = quantity.min(product.stock);
        self.items.push(OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: capped,
            price: product.price,
            old_price: product.old_price,
            image: product.image.clone(),
        });
        if quantity > product.stock {
            QuantityOutcome::Clamped(capped)
        } else {
            QuantityOutcome::Updated
        }
    }

    /// Set a line's quantity
    ///
    /// Zero or below removes the line; above `stock` clamps and reports it
    /// so the UI can warn.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        new_quantity: i32,
        stock: i32,
    ) -> QuantityOutcome {
        if new_quantity <= 0 {
            let before = self.items.len();
            self.remove(product_id);
            return if self.items.len() < before {
                QuantityOutcome::Removed
            } else {
                QuantityOutcome::NotInCart
            };
        }

        let Some(line) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return QuantityOutcome::NotInCart;
        };

        if new_quantity > stock {
            line.quantity = stock;
            QuantityOutcome::Clamped(stock)
        } else {
            line.quantity = new_quantity;
            QuantityOutcome::Updated
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clear all lines and the address draft (checkout or explicit clear)
    pub fn clear(&mut self) {
        self.items.clear();
        self.shipping_address = None;
    }

    pub fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address.as_ref()
    }

    pub fn save_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = Some(address);
    }

    // ── Derived totals ──────────────────────────────────────────────

    pub fn subtotal(&self) -> f64 {
        let sum: Decimal = self
            .items
            .iter()
            .map(|i| Decimal::from_f64(i.price).unwrap_or_default() * Decimal::from(i.quantity))
            .sum();
        sum.to_f64().unwrap_or_default()
    }

    /// Σ (original price − sale price) × quantity across all lines
    pub fn total_savings(&self) -> f64 {
        let sum: Decimal = self
            .items
            .iter()
            .map(|i| {
                let original = Decimal::from_f64(i.old_price.unwrap_or(i.price)).unwrap_or_default();
                let price = Decimal::from_f64(i.price).unwrap_or_default();
                (original - price) * Decimal::from(i.quantity)
            })
            .sum();
        sum.to_f64().unwrap_or_default()
    }

    pub fn shipping(&self, config: &ShippingSettings) -> f64 {
        pricing::compute_shipping(self.subtotal(), self.shipping_address(), config)
    }

    pub fn total(&self, config: &ShippingSettings) -> f64 {
        pricing::order_total(self.subtotal(), self.shipping(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64, old_price: Option<f64>, stock: i32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            old_price,
            stock,
            image: String::new(),
            enabled: true,
        }
    }

    #[test]
    fn add_accumulates_one_line_per_product() {
        let mut cart = Cart::new();
        let p = product("p1", 100.0, None, 10);
        cart.add(&p, 2);
        cart.add(&p, 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn add_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("p1", 100.0, None, 3);
        assert_eq!(cart.add(&p, 2), QuantityOutcome::Updated);
        assert_eq!(cart.add(&p, 5), QuantityOutcome::Clamped(3));
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let p = product("p1", 100.0, None, 10);
        cart.add(&p, 2);
        assert_eq!(cart.update_quantity("p1", 0, 10), QuantityOutcome::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.update_quantity("p1", 1, 10), QuantityOutcome::NotInCart);
    }

    #[test]
    fn update_quantity_clamps_above_stock() {
        let mut cart = Cart::new();
        let p = product("p1", 100.0, None, 4);
        cart.add(&p, 1);
        assert_eq!(cart.update_quantity("p1", 9, 4), QuantityOutcome::Clamped(4));
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn savings_use_old_price_when_present() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 1499.0, Some(1999.0), 10), 2);
        cart.add(&product("p2", 500.0, None, 10), 1);
        // (1999 - 1499) * 2 + 0
        assert_eq!(cart.total_savings(), 1000.0);
    }

    #[test]
    fn totals_against_settings_snapshot() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 1899.0, None, 5), 1);
        cart.save_shipping_address(ShippingAddress {
            street: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip: "560001".to_string(),
        });
        let config = ShippingSettings {
            flat_rate_enabled: true,
            flat_rate_cost: 50.0,
            free_shipping_enabled: true,
            free_shipping_threshold: 2000.0,
            pincode_free_shipping_enabled: true,
            free_shipping_pincodes: "411001".to_string(),
            ..Default::default()
        };
        assert_eq!(cart.subtotal(), 1899.0);
        assert_eq!(cart.shipping(&config), 50.0);
        assert_eq!(cart.total(&config), 1949.0);
    }

    #[test]
    fn clear_drops_lines_and_address() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 10.0, None, 10), 1);
        cart.save_shipping_address(ShippingAddress {
            street: "a".into(),
            city: "b".into(),
            state: "c".into(),
            zip: "1".into(),
        });
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.shipping_address().is_none());
    }

    #[test]
    fn empty_cart_total_is_zero_under_any_config() {
        let cart = Cart::new();
        let config = ShippingSettings {
            flat_rate_enabled: true,
            flat_rate_cost: 50.0,
            ..Default::default()
        };
        assert_eq!(cart.subtotal(), 0.0);
        assert_eq!(cart.shipping(&config), 0.0);
        assert_eq!(cart.total(&config), 0.0);
    }
}
