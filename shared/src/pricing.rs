//! Shipping Pricing
//!
//! Pure shipping-cost evaluation over a settings snapshot. Uses
//! rust_decimal internally so repeated additions stay exact; f64 at the
//! boundary to match stored prices. No rounding is applied here — amounts
//! keep whatever precision the stored prices have.

use crate::models::{ShippingAddress, ShippingSettings};
use rust_decimal::prelude::*;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Compute the shipping cost for a cart
///
/// Rule evaluation order, first match wins:
/// 1. Empty cart (subtotal 0) ships free.
/// 2. Pincode free shipping: enabled, an address is present, and its
///    trimmed zip appears in the configured comma-separated pincode set
///    (entries trimmed, empties discarded).
/// 3. Threshold free shipping: enabled and subtotal ≥ threshold.
/// 4. Flat rate: enabled → the configured cost.
/// 5. Nothing configured → free. A malformed configuration never errors.
pub fn compute_shipping(
    subtotal: f64,
    address: Option<&ShippingAddress>,
    config: &ShippingSettings,
) -> f64 {
    if subtotal == 0.0 {
        return 0.0;
    }

    if config.pincode_free_shipping_enabled
        && let Some(address) = address
        && !config.free_shipping_pincodes.is_empty()
    {
        let zip = address.zip.trim();
        let matched = config
            .free_shipping_pincodes
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .any(|p| p == zip);
        if matched {
            return 0.0;
        }
    }

    if config.free_shipping_enabled && subtotal >= config.free_shipping_threshold {
        return 0.0;
    }

    if config.flat_rate_enabled {
        return config.flat_rate_cost;
    }

    0.0
}

/// Grand total: subtotal plus shipping
pub fn order_total(subtotal: f64, shipping: f64) -> f64 {
    to_f64(to_decimal(subtotal) + to_decimal(shipping))
}
