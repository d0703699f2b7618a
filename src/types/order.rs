//! Order types for the matchbook engine.
//!
//! An [`Order`] is the client-facing input record. Prices are plain `f64`
//! and are validated (finite, within the configured band) at the book
//! boundary before they ever reach an index. Quantities are integral units.
//!
//! `timestamp_ns` is supplied by the client and is used only to select the
//! trade price when two resting orders cross; arrival order, not the
//! timestamp, determines queue position.

use serde::{Deserialize, Serialize};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order (bid) - wants to purchase the asset
    Buy,
    /// Sell order (ask) - wants to sell the asset
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// True for [`Side::Buy`]
    #[inline]
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order submission.
///
/// ## Example
///
/// ```
/// use matchbook::{Order, Side};
///
/// // Buy 1000 units at 100.50, client timestamp 1ns
/// let order = Order::new(1, Side::Buy, 100.50, 1000, 1);
/// assert_eq!(order.side, Side::Buy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier, nonzero, chosen by the client
    pub order_id: u64,

    /// Buy or Sell
    pub side: Side,

    /// Limit price; must be finite and within the configured band
    pub price: f64,

    /// Remaining quantity; decremented as the order is filled
    pub quantity: u64,

    /// Client-supplied timestamp in nanoseconds; tie-breaker for the
    /// trade price, never for queue order
    pub timestamp_ns: u64,
}

impl Order {
    /// Create a new limit order
    pub fn new(order_id: u64, side: Side, price: f64, quantity: u64, timestamp_ns: u64) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
            timestamp_ns,
        }
    }

    /// Shorthand for a buy order
    pub fn buy(order_id: u64, price: f64, quantity: u64, timestamp_ns: u64) -> Self {
        Self::new(order_id, Side::Buy, price, quantity, timestamp_ns)
    }

    /// Shorthand for a sell order
    pub fn sell(order_id: u64, price: f64, quantity: u64, timestamp_ns: u64) -> Self {
        Self::new(order_id, Side::Sell, price, quantity, timestamp_ns)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
