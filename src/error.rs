//! Error taxonomy for book operations.
//!
//! Every rejection is local: a failed operation leaves the book exactly as it
//! was, including the version counter. There are no fatal errors that poison
//! the book.

use thiserror::Error;

/// Reasons a mutating book operation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrderBookError {
    /// The order id was zero.
    #[error("order id must be nonzero")]
    InvalidId,

    /// The price was NaN, infinite, or outside the configured band.
    #[error("invalid price {0}")]
    InvalidPrice(f64),

    /// The quantity was zero or above the configured cap.
    #[error("invalid quantity {0}")]
    InvalidQuantity(u64),

    /// `add_order` was called with an id that is already live.
    #[error("duplicate order id {0}")]
    DuplicateId(u64),

    /// `cancel_order` or `amend_order` named an id that is not live.
    #[error("unknown order id {0}")]
    UnknownId(u64),

    /// The configured `max_orders` bound is reached; nothing was inserted.
    #[error("order store at capacity")]
    CapacityExhausted,
}
