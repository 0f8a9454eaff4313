use thiserror::Error;

/// Errors raised by the exchange rate source.
#[derive(Debug, Error)]
pub enum PriceError {
    /// No rate is currently known for the token.
    #[error("exchange rate not currently available for token: {0}")]
    UnavailableRate(String),
    /// The upstream rate source could not be queried.
    #[error("exchange rate lookup failed: {0}")]
    Fetch(String),
}
