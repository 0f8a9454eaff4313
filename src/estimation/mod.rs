//! Gas estimation for relay and deploy requests.
//!
//! Estimation is built from pure correction primitives and a set of
//! interchangeable strategies over the chain RPC collaborator:
//!
//! - **standard**: one full `relayCall`/`deployCall` simulation against the
//!   relay hub. Most accurate, costs an extra RPC round-trip.
//! - **linear fit**: replaces the hub simulation with an offline-fitted
//!   linear model over a cheaper internal-call estimate. Relay requests
//!   only.
//! - **execution only**: the raw node estimate of an arbitrary call, reused
//!   by the other strategies under different corrections.

mod gas;
pub use gas::{
    apply_gas_correction_factor, apply_internal_correction, estimate_max_possible_gas,
    estimate_max_possible_gas_execution, estimate_max_possible_gas_token_transfer,
    estimate_with_strategy, execution_only_max_possible_gas_estimation,
    linear_fit_max_possible_gas_estimation, standard_max_possible_gas_estimation,
};

mod linear_fit;
pub use linear_fit::LinearFitModel;

use serde::{Deserialize, Serialize};

/// Selectable estimation strategy.
///
/// A configuration value, decided per relay instance. Substituting a
/// strategy never requires touching the admission gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationStrategy {
    /// Full relay hub simulation.
    #[default]
    Standard,
    /// Linear-fit approximation, trading accuracy for fewer RPC round-trips.
    LinearFit,
    /// Corrected estimate of the forwarded call alone, without accounting
    /// for hub overhead. Only fit for quoting against callers that add
    /// their own overhead margin.
    ExecutionOnly,
}
