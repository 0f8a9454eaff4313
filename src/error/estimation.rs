use thiserror::Error;

/// Errors raised while producing a gas estimation.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// An RPC or simulation call could not complete. Not retried here;
    /// retry policy belongs to the calling orchestrator.
    #[error("gas estimation call failed: {0}")]
    Rpc(String),
    /// The linear-fit strategy was requested for a deployment.
    #[error("linear fit estimation not implemented for deployments")]
    UnsupportedStrategy,
    /// An intermediate figure fell outside the decimal range.
    #[error(transparent)]
    Conversion(#[from] crate::error::ConversionError),
}
