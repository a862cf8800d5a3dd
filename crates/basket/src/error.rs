use thiserror::Error;

/// Errors raised by basket storage.
#[derive(Debug, Error)]
pub enum BasketError {
    /// A basket was written without the buyer it belongs to.
    #[error("Basket has no buyer id")]
    BuyerIdRequired,

    /// The backing store failed.
    #[error("Basket storage error: {0}")]
    Storage(String),
}

/// Result type for basket operations.
pub type Result<T> = std::result::Result<T, BasketError>;
