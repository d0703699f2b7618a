//! Trade event delivery.
//!
//! The book owns a single [`TradeSink`] and invokes it once per fill, inside
//! the mutating operation that produced the fill. Any `FnMut(&Trade)` closure
//! is a sink, so hosts can forward fills to a channel, a buffer, or a wire
//! encoder without implementing anything.

use crate::types::Trade;

/// Host-registered callback invoked once per fill.
pub trait TradeSink: Send {
    /// Called synchronously for each fill, in emission order
    fn on_trade(&mut self, trade: &Trade);
}

impl<F> TradeSink for F
where
    F: FnMut(&Trade) + Send,
{
    fn on_trade(&mut self, trade: &Trade) {
        self(trade)
    }
}

/// The default sink: prints each fill to stdout as
/// `MATCH: <qty> @ <price> (Bid: <bid_id>, Ask: <ask_id>)`.
pub fn stdout_sink() -> impl TradeSink {
    |trade: &Trade| {
        println!(
            "MATCH: {} @ {} (Bid: {}, Ask: {})",
            trade.quantity, trade.price, trade.bid_order_id, trade.ask_order_id
        );
    }
}

/// A sink that drops every fill. Useful for benchmarks and load tests.
pub fn null_sink() -> impl TradeSink {
    |_: &Trade| {}
}
