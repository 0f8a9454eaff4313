//! Relay metrics.

use metrics::counter;

/// Counter of admission gate outcomes, labeled by terminal outcome.
const ADMISSION_OUTCOMES: &str = "relay_admission_outcomes_total";

/// Terminal outcome of a request evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Accepted without a fee.
    AcceptedSponsored,
    /// Accepted with a fee charged on top of the base estimate.
    AcceptedFeeCharged,
    /// Rejected because the declared gas deviates from the estimate.
    RejectedGasDeviation,
    /// Rejected because the agreed token amount cannot cover the cost.
    RejectedInsufficientValue,
    /// Rejected because the configured strategy does not support the
    /// request variant.
    RejectedUnsupportedStrategy,
}

impl AdmissionOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::AcceptedSponsored => "accepted_sponsored",
            Self::AcceptedFeeCharged => "accepted_fee_charged",
            Self::RejectedGasDeviation => "rejected_gas_deviation",
            Self::RejectedInsufficientValue => "rejected_insufficient_value",
            Self::RejectedUnsupportedStrategy => "rejected_unsupported_strategy",
        }
    }
}

/// Records an admission gate outcome.
pub fn record_admission(outcome: AdmissionOutcome) {
    counter!(ADMISSION_OUTCOMES, "outcome" => outcome.as_str()).increment(1);
}
