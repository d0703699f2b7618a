//! The order book and its matching loop.
//!
//! ## Architecture
//!
//! The book couples three structures that the matcher mutates together:
//!
//! - **Slab**: stable storage for every live order node
//! - **Two [`SideIndex`]es**: price-sorted levels, bids descending and asks
//!   ascending, so the first entry on each side is the best price
//! - **HashMap**: order id to slab key, for O(1) cancel and amend
//!
//! Every mutating operation validates first and touches no state on
//! rejection. Successful mutations bump the version counter exactly once;
//! fills triggered by an operation are emitted under that operation's
//! version. After every operation the book is uncrossed, every live order is
//! reachable by id and by queue position, and no empty level remains.
//!
//! ## Concurrency
//!
//! Single-threaded by contract: operations are synchronous and must be
//! serialized by the caller. Distinct books are independent.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use slab::Slab;
use tracing::{debug, trace, warn};

use crate::book::side::{AskKey, BidKey, SideIndex};
use crate::book::sink::{stdout_sink, TradeSink};
use crate::book::{OrderNode, PriceLevel};
use crate::config::BookConfig;
use crate::error::OrderBookError;
use crate::types::{Order, Side, Trade};

// ============================================================================
// Snapshot records
// ============================================================================

/// Aggregate view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLevel {
    /// Level price
    pub price: f64,
    /// Sum of remaining quantities at this price
    pub total_quantity: u64,
    /// Number of queued orders at this price
    pub order_count: usize,
}

/// Depth-limited view of both sides, best levels first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bid levels, highest price first
    pub bids: Vec<SnapshotLevel>,
    /// Ask levels, lowest price first
    pub asks: Vec<SnapshotLevel>,
}

// ============================================================================
// OrderBook
// ============================================================================

/// Single-symbol limit order book with price-time priority matching.
///
/// ## Example
///
/// ```
/// use matchbook::{Order, OrderBook};
///
/// let mut book = OrderBook::new();
/// book.add_order(Order::buy(1, 100.50, 1000, 1)).unwrap();
/// book.add_order(Order::sell(2, 100.60, 300, 2)).unwrap();
///
/// assert_eq!(book.best_bid(), 100.50);
/// assert_eq!(book.best_ask(), 100.60);
/// assert_eq!(book.order_count(), 2);
/// ```
pub struct OrderBook {
    /// Order node storage; keys stay stable while an order is live
    orders: Slab<OrderNode>,

    /// Bid price levels, best (highest) first
    bids: SideIndex<BidKey>,

    /// Ask price levels, best (lowest) first
    asks: SideIndex<AskKey>,

    /// Order id to slab key, for O(1) cancel and amend
    by_id: HashMap<u64, usize>,

    /// Validation limits
    config: BookConfig,

    /// Bumped once per successful mutation
    version: u64,

    /// Matching reentrancy guard; the public API cannot re-enter the
    /// matcher, the flag makes that assumption cheap to keep
    matching_in_progress: bool,

    /// Fill callback
    sink: Box<dyn TradeSink>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with default limits, printing fills to stdout
    pub fn new() -> Self {
        Self::with_sink(BookConfig::default(), stdout_sink())
    }

    /// Create an empty book with custom limits, printing fills to stdout
    pub fn with_config(config: BookConfig) -> Self {
        Self::with_sink(config, stdout_sink())
    }

    /// Create an empty book with pre-allocated storage for `capacity` orders
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
            bids: SideIndex::new(),
            asks: SideIndex::new(),
            by_id: HashMap::with_capacity(capacity),
            config: BookConfig::default(),
            version: 0,
            matching_in_progress: false,
            sink: Box::new(stdout_sink()),
        }
    }

    /// Create an empty book with custom limits and a custom fill sink
    pub fn with_sink<S: TradeSink + 'static>(config: BookConfig, sink: S) -> Self {
        Self {
            orders: Slab::new(),
            bids: SideIndex::new(),
            asks: SideIndex::new(),
            by_id: HashMap::new(),
            config,
            version: 0,
            matching_in_progress: false,
            sink: Box::new(sink),
        }
    }

    /// Replace the fill sink
    pub fn set_trade_sink<S: TradeSink + 'static>(&mut self, sink: S) {
        self.sink = Box::new(sink);
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// The configured validation limits
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Pre-allocated order slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of live orders across both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.by_id.len()
    }

    /// True if no order is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of live bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of live ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Monotonic counter, bumped once per successful mutation
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Best bid price, or `0.0` when no bids rest
    #[inline]
    pub fn best_bid(&self) -> f64 {
        self.bids.best_price().unwrap_or(0.0)
    }

    /// Best ask price, or `f64::INFINITY` when no asks rest
    #[inline]
    pub fn best_ask(&self) -> f64 {
        self.asks.best_price().unwrap_or(f64::INFINITY)
    }

    /// `best_ask - best_bid`, or `0.0` when no asks rest
    pub fn spread(&self) -> f64 {
        let best_ask = self.best_ask();
        if best_ask.is_infinite() {
            0.0
        } else {
            best_ask - self.best_bid()
        }
    }

    /// True if `order_id` is live
    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.by_id.contains_key(&order_id)
    }

    /// Look up a live order by id
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        self.by_id.get(&order_id).map(|&key| &self.orders[key].order)
    }

    /// Up to `depth` best levels per side, best first
    pub fn snapshot(&self, depth: usize) -> Snapshot {
        let entry = |level: &PriceLevel| SnapshotLevel {
            price: level.price,
            total_quantity: level.total_quantity,
            order_count: level.order_count,
        };

        Snapshot {
            bids: self.bids.iter_from_best().take(depth).map(entry).collect(),
            asks: self.asks.iter_from_best().take(depth).map(entry).collect(),
        }
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Submit a limit order.
    ///
    /// On success the order is queued at the tail of its price level and the
    /// matcher runs; the call succeeds even if the order is fully consumed.
    /// On any validation failure the book is untouched.
    pub fn add_order(&mut self, order: Order) -> Result<(), OrderBookError> {
        self.validate_new(&order)?;

        let key = self.orders.insert(OrderNode::new(order));
        self.by_id.insert(order.order_id, key);

        let level = match order.side {
            Side::Buy => self.bids.get_or_insert(order.price),
            Side::Sell => self.asks.get_or_insert(order.price),
        };
        level.push_back(key, &mut self.orders);

        trace!(
            order_id = order.order_id,
            side = ?order.side,
            price = order.price,
            quantity = order.quantity,
            "order accepted"
        );

        self.version += 1;
        self.match_orders();
        Ok(())
    }

    /// Cancel a live order.
    ///
    /// Unlinks the order from its level, erasing the level if it empties,
    /// and releases the record.
    pub fn cancel_order(&mut self, order_id: u64) -> Result<(), OrderBookError> {
        if order_id == 0 {
            debug!("rejected cancel: zero order id");
            return Err(OrderBookError::InvalidId);
        }

        let key = self
            .by_id
            .remove(&order_id)
            .ok_or(OrderBookError::UnknownId(order_id))?;

        let (side, price) = {
            let node = &self.orders[key];
            (node.order.side, node.order.price)
        };

        self.unlink(key, side, price);
        self.orders.remove(key);
        self.version += 1;

        trace!(order_id, "order cancelled");
        Ok(())
    }

    /// Replace a live order's price and quantity.
    ///
    /// With the price unchanged only the quantity is rewritten and the order
    /// keeps its queue position; no matching is triggered. A price change
    /// re-queues the order at the tail of its new level, losing time
    /// priority, and the matcher runs in case the new price crosses.
    pub fn amend_order(
        &mut self,
        order_id: u64,
        new_price: f64,
        new_quantity: u64,
    ) -> Result<(), OrderBookError> {
        if order_id == 0 {
            debug!("rejected amend: zero order id");
            return Err(OrderBookError::InvalidId);
        }
        if !self.config.valid_price(new_price) {
            debug!(price = new_price, "rejected amend: price out of range");
            return Err(OrderBookError::InvalidPrice(new_price));
        }
        if !self.config.valid_quantity(new_quantity) {
            debug!(quantity = new_quantity, "rejected amend: quantity out of range");
            return Err(OrderBookError::InvalidQuantity(new_quantity));
        }

        let key = *self
            .by_id
            .get(&order_id)
            .ok_or(OrderBookError::UnknownId(order_id))?;

        let (side, old_price, old_quantity) = {
            let node = &self.orders[key];
            (node.order.side, node.order.price, node.order.quantity)
        };

        if new_price == old_price {
            // Quantity-only: the order keeps its place in the queue
            self.orders[key].order.quantity = new_quantity;
            let level = match side {
                Side::Buy => self.bids.get_mut(old_price),
                Side::Sell => self.asks.get_mut(old_price),
            }
            .expect("live order without a level");
            level.total_quantity = level
                .total_quantity
                .saturating_sub(old_quantity)
                .saturating_add(new_quantity);

            self.version += 1;
            trace!(order_id, quantity = new_quantity, "order amended in place");
            return Ok(());
        }

        // Price change: leave the old level, join the tail of the new one
        self.unlink(key, side, old_price);
        {
            let order = &mut self.orders[key].order;
            order.price = new_price;
            order.quantity = new_quantity;
        }
        let level = match side {
            Side::Buy => self.bids.get_or_insert(new_price),
            Side::Sell => self.asks.get_or_insert(new_price),
        };
        level.push_back(key, &mut self.orders);

        self.version += 1;
        trace!(order_id, price = new_price, quantity = new_quantity, "order amended");
        self.match_orders();
        Ok(())
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Match the two best levels against each other until the book no longer
    /// crosses or one side empties.
    ///
    /// Each step trades `min` of the two head quantities at the price of the
    /// earlier resting head (`timestamp_ns`, ties to the bid), emits the fill
    /// to the sink, and removes whichever heads reached zero along with any
    /// level they empty. Each step removes at least one order, so the loop
    /// terminates.
    fn match_orders(&mut self) {
        if self.matching_in_progress {
            return;
        }
        self.matching_in_progress = true;

        loop {
            let (Some(bid_price), Some(ask_price)) =
                (self.bids.best_price(), self.asks.best_price())
            else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            let bid_head = self.bids.best().and_then(|level| level.peek_head());
            let ask_head = self.asks.best().and_then(|level| level.peek_head());
            let (Some(bid_key), Some(ask_key)) = (bid_head, ask_head) else {
                // Should not occur: no empty level stays indexed
                warn!(bid_price, ask_price, "matching halted on headless level");
                break;
            };

            let (bid_id, bid_quantity, bid_ts) = {
                let order = &self.orders[bid_key].order;
                (order.order_id, order.quantity, order.timestamp_ns)
            };
            let (ask_id, ask_quantity, ask_ts) = {
                let order = &self.orders[ask_key].order;
                (order.order_id, order.quantity, order.timestamp_ns)
            };

            let quantity = bid_quantity.min(ask_quantity);
            // The earlier resting order sets the price; the bid wins ties
            let price = if bid_ts <= ask_ts { bid_price } else { ask_price };

            self.orders[bid_key].order.quantity -= quantity;
            self.orders[ask_key].order.quantity -= quantity;
            if let Some(level) = self.bids.best_mut() {
                level.reduce_quantity(quantity);
            }
            if let Some(level) = self.asks.best_mut() {
                level.reduce_quantity(quantity);
            }

            let trade = Trade::new(quantity, price, bid_id, ask_id, self.version);
            trace!(quantity, price, bid_id, ask_id, "fill");
            self.sink.on_trade(&trade);

            if bid_quantity == quantity {
                self.remove_filled(bid_key, Side::Buy, bid_price, bid_id);
            }
            if ask_quantity == quantity {
                self.remove_filled(ask_key, Side::Sell, ask_price, ask_id);
            }
        }

        self.matching_in_progress = false;
    }

    /// Release a fully-filled head: unlink, drop the id, free the node
    fn remove_filled(&mut self, key: usize, side: Side, price: f64, order_id: u64) {
        self.unlink(key, side, price);
        self.by_id.remove(&order_id);
        self.orders.remove(key);
    }

    /// Unlink a node from its level, erasing the level if it empties
    fn unlink(&mut self, key: usize, side: Side, price: f64) {
        match side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(price) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.bids.remove(price);
                    }
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(price) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.asks.remove(price);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn validate_new(&self, order: &Order) -> Result<(), OrderBookError> {
        if order.order_id == 0 {
            debug!("rejected order: zero id");
            return Err(OrderBookError::InvalidId);
        }
        if !self.config.valid_price(order.price) {
            debug!(price = order.price, "rejected order: price out of range");
            return Err(OrderBookError::InvalidPrice(order.price));
        }
        if !self.config.valid_quantity(order.quantity) {
            debug!(quantity = order.quantity, "rejected order: quantity out of range");
            return Err(OrderBookError::InvalidQuantity(order.quantity));
        }
        if self.by_id.contains_key(&order.order_id) {
            debug!(order_id = order.order_id, "rejected order: duplicate id");
            return Err(OrderBookError::DuplicateId(order.order_id));
        }
        if let Some(max_orders) = self.config.max_orders {
            if self.by_id.len() >= max_orders {
                debug!(max_orders, "rejected order: store at capacity");
                return Err(OrderBookError::CapacityExhausted);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("order_count", &self.order_count())
            .field("bid_levels", &self.bid_levels())
            .field("ask_levels", &self.ask_levels())
            .field("best_bid", &self.bids.best_price())
            .field("best_ask", &self.asks.best_price())
            .field("version", &self.version)
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
