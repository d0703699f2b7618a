//! Trade type representing an executed match between two orders.

use serde::{Deserialize, Serialize};

/// A trade is a single fill between the resting heads of the two best levels.
///
/// ## Price Discovery
///
/// The trade executes at the price of whichever side rested earlier
/// (`timestamp_ns` comparison, the bid winning ties). Both participating
/// orders are identified so the host can attribute the fill.
///
/// ## Example
///
/// ```
/// use matchbook::Trade;
///
/// let trade = Trade::new(200, 100.60, 5, 4, 9);
/// assert_eq!(trade.price, 100.60);
/// assert_eq!(trade.bid_order_id, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Executed quantity
    pub quantity: u64,

    /// Execution price (the earlier resting order's limit price)
    pub price: f64,

    /// Order id of the buy side of the fill
    pub bid_order_id: u64,

    /// Order id of the sell side of the fill
    pub ask_order_id: u64,

    /// Book version under which this fill was emitted; every fill produced
    /// by one mutating operation carries that operation's version
    pub version: u64,
}

impl Trade {
    /// Create a new trade
    pub fn new(quantity: u64, price: f64, bid_order_id: u64, ask_order_id: u64, version: u64) -> Self {
        Self {
            quantity,
            price,
            bid_order_id,
            ask_order_id,
            version,
        }
    }

    /// Notional value of this trade (price x quantity)
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
