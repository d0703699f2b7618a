//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` holds every live order at a single price in a FIFO queue
//! (doubly-linked list threaded through the slab):
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be removed in O(1) using its slab key
//!
//! The aggregates `total_quantity` and `order_count` are maintained
//! incrementally and always equal the sum/length of the queue.

use slab::Slab;

use crate::book::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata and the aggregates.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level
    pub price: f64,

    /// Total remaining quantity across the queue
    pub total_quantity: u64,

    /// Head of the order queue (oldest order, slab key).
    /// This is the first order to be matched
    pub head: Option<usize>,

    /// Tail of the order queue (newest order, slab key).
    /// New orders are appended here
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: f64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Add an order to the tail of the queue.
    ///
    /// FIFO: older orders are matched first, so appending preserves time
    /// priority for everything already queued.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = slab.get_mut(key).expect("invalid slab key");
        let quantity = node.quantity();

        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            let tail_node = slab.get_mut(tail_key).expect("invalid tail key");
            tail_node.next = Some(key);
        } else {
            // Empty queue - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Remove an order from the queue by slab key, unlinking it in O(1).
    ///
    /// Removing a key that is not queued here is a no-op; a second remove of
    /// the same order does nothing.
    ///
    /// # Returns
    ///
    /// The remaining quantity of the removed order, or 0 for a no-op
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let node = slab.get(key).expect("invalid slab key");

        // An unlinked node that is not the sole member is not in this queue
        if node.is_unlinked() && self.head != Some(key) {
            return 0;
        }

        let quantity = node.quantity();
        let prev_key = node.prev;
        let next_key = node.next;

        if let Some(prev) = prev_key {
            let prev_node = slab.get_mut(prev).expect("invalid prev key");
            prev_node.next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        if let Some(next) = next_key {
            let next_node = slab.get_mut(next).expect("invalid next key");
            next_node.prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        let node = slab.get_mut(key).expect("invalid slab key");
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        quantity
    }

    /// Get the head order's slab key (oldest order).
    ///
    /// This is the first order to be matched at this price level.
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Reduce the total quantity after a partial fill of a queued order
    pub fn reduce_quantity(&mut self, filled_quantity: u64) {
        self.total_quantity = self.total_quantity.saturating_sub(filled_quantity);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
