//! Relay constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed gas amount subtracted from simulations of internal calls (token
/// transfers, forwarded execution). Node-side simulation prices these as
/// top-level transactions and overstates them by roughly this constant.
pub const INTERNAL_TRANSACTION_ESTIMATE_CORRECTION: Decimal = dec!(20000);

/// Multiplicative safety margin applied to raw `relayCall`/`deployCall`
/// simulation results. Must be kept >= 1; the current calibration against
/// observed execution traces is exactly 1.
pub const ESTIMATED_GAS_CORRECTION_FACTOR: Decimal = dec!(1);

/// Gas floor charged for a token payment whose simulation reports zero cost,
/// e.g. when the simulator collapses the storage writes of the transfer.
pub const TOKEN_TRANSFER_SUBSIDY: Decimal = dec!(12000);

/// Decimal precision of the native currency.
pub const NATIVE_CURRENCY_DECIMALS: u32 = 18;

/// Default tolerated deviation between the gas declared in a relay request
/// and the estimated gas of the forwarded call. Requests whose estimate
/// exceeds `declared * (1 + deviation)` are rejected.
pub const DEFAULT_MAX_ESTIMATED_GAS_DEVIATION: Decimal = dec!(0.2);
