use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections produced by the admission gate.
///
/// These are deterministic for identical inputs and carry the computed
/// figures so the caller can explain the rejection to the end user.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The gas declared in the request deviates too much from the gas the
    /// forwarded call is estimated to need. Usually a stale or manipulated
    /// client-side estimate.
    #[error(
        "request gas deviates too much from the estimated gas for this \
         transaction: estimated {estimated}, declared {declared}"
    )]
    GasDeviation {
        /// Internally estimated gas of the forwarded call.
        estimated: Decimal,
        /// Gas declared in the request payload.
        declared: Decimal,
    },
    /// The token amount the user agreed to pay does not cover the required
    /// cost of the transaction.
    #[error(
        "user agreed to spend lower than what the transaction may require: \
         required {required} gas, agreed {agreed} gas"
    )]
    InsufficientTokenAmount {
        /// Required cost in gas units, fee inclusive.
        required: Decimal,
        /// The declared token amount expressed in gas units.
        agreed: Decimal,
    },
}
