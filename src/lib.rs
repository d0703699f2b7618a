//! # matchbook
//!
//! Single-symbol, in-memory limit order book with a continuous price-time
//! priority matching engine.
//!
//! ## Architecture
//!
//! - **Types**: core records ([`Order`], [`Side`], [`Trade`])
//! - **Book**: slab-backed storage, FIFO price levels, price-sorted side
//!   indices, and the matching loop
//! - **Config / Error**: validation limits and the rejection taxonomy
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the trade stream and final book state are fully
//!    determined by the operation sequence and the client timestamps; no
//!    wall clock is consulted
//! 2. **Price-time priority**: better prices first, FIFO within a level
//! 3. **O(1) order operations**: slab storage with intrusive level queues
//! 4. **Synchronous execution**: no async in the hot path; callers
//!    serialize operations
//!
//! ## Example
//!
//! ```
//! use matchbook::{BookConfig, Order, OrderBook, Trade};
//!
//! let mut book = OrderBook::with_sink(BookConfig::default(), |t: &Trade| {
//!     println!("filled {} @ {}", t.quantity, t.price);
//! });
//!
//! book.add_order(Order::sell(1, 100.60, 300, 1)).unwrap();
//! book.add_order(Order::buy(2, 100.80, 200, 2)).unwrap();
//!
//! // The crossing buy filled 200 @ 100.60 against the resting ask
//! assert_eq!(book.order(1).unwrap().quantity, 100);
//! assert!(!book.contains_order(2));
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod types;

pub use book::{
    null_sink, stdout_sink, AskKey, BidKey, OrderBook, OrderNode, PriceLevel, SideIndex, SideKey,
    Snapshot, SnapshotLevel, TradeSink,
};
pub use config::{BookConfig, MAX_ORDER_QUANTITY, MAX_PRICE, MIN_PRICE};
pub use error::OrderBookError;
pub use types::{Order, Side, Trade};
