//! Relay error types.

use alloy::primitives::Bytes;
use core::fmt;
use jsonrpsee::core::RpcResult;
use thiserror::Error;

mod admission;
pub use admission::AdmissionError;

mod conversion;
pub use conversion::ConversionError;

mod estimation;
pub use estimation::EstimationError;

mod price;
pub use price::PriceError;

/// The overarching error type returned by the estimation and admission
/// entry points.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A request was rejected by the admission gate.
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    /// A fixed-point conversion could not be performed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// A gas estimation could not be produced.
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    /// An exchange rate could not be obtained.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// No transaction dispatcher is wired into this instance; the server
    /// only answers ping and estimation requests.
    #[error("transaction dispatch is not configured on this relay")]
    DispatchUnavailable,
    /// An internal error occurred.
    #[error(transparent)]
    InternalError(#[from] eyre::Error),
}

impl From<RelayError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: RelayError) -> Self {
        match err {
            // Client-facing rejections: deterministic given the request, the
            // caller can relay the message to the end user.
            RelayError::Admission(_) | RelayError::DispatchUnavailable => {
                invalid_params(err.to_string())
            }
            RelayError::Estimation(EstimationError::UnsupportedStrategy) => {
                invalid_params(err.to_string())
            }
            // Infrastructure failures.
            RelayError::Conversion(_)
            | RelayError::Estimation(_)
            | RelayError::Price(_)
            | RelayError::InternalError(_) => internal_rpc(err.to_string()),
        }
    }
}

/// A helper trait to provide an RPC error code.
pub trait ToRpcResult<Ok, Err>: Sized {
    /// Converts the result to an [`RpcResult`] by converting the error
    /// variant to a [`jsonrpsee::types::error::ErrorObject`].
    fn to_rpc_result(self) -> RpcResult<Ok>
    where
        Err: fmt::Display;
}

impl<Ok> ToRpcResult<Ok, RelayError> for Result<Ok, RelayError> {
    fn to_rpc_result(self) -> RpcResult<Ok> {
        self.map_err(|err| err.into())
    }
}

impl From<RelayError> for String {
    fn from(err: RelayError) -> Self {
        err.to_string()
    }
}

/// Constructs an invalid params JSON-RPC error.
fn invalid_params(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INVALID_PARAMS_CODE, msg, None)
}

/// Constructs an internal JSON-RPC error.
fn internal_rpc(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INTERNAL_ERROR_CODE, msg, None)
}

/// Constructs a JSON-RPC error with `code`, `message` and optional `data`.
fn rpc_err(
    code: i32,
    msg: impl Into<String>,
    data: Option<Bytes>,
) -> jsonrpsee::types::error::ErrorObject<'static> {
    jsonrpsee::types::error::ErrorObject::owned(code, msg.into(), data)
}
