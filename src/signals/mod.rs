//! Signal evaluators.
//!
//! Each submodule inspects one category of input data and produces a fixed
//! verdict struct. The verdicts share the minimal [`Signal`] interface so the
//! scorer and confidence estimator can consume them uniformly.

pub mod asn_isp;
pub mod direct_flags;
pub mod fingerprint;
pub mod geo;
pub mod reputation;

use serde::{Deserialize, Serialize};

pub use asn_isp::AsnIspVerdict;
pub use direct_flags::DirectFlagsVerdict;
pub use fingerprint::FingerprintVerdict;
pub use geo::GeoConsistencyVerdict;
pub use reputation::{ReputationChecker, ReputationVerdict};

/// Common surface of every signal verdict.
pub trait Signal {
    /// Whether this signal considers the IP suspicious.
    fn suspicious(&self) -> bool;

    /// Set only when the evaluator could not complete its work. A verdict
    /// carrying an error is never suspicious; it only reduces confidence.
    fn error(&self) -> Option<&str> {
        None
    }
}

/// The five verdicts produced by one analysis, keyed by category name in the
/// serialized report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    pub direct_flags: DirectFlagsVerdict,
    pub reputation: ReputationVerdict,
    pub asn_analysis: AsnIspVerdict,
    pub geo_consistency: GeoConsistencyVerdict,
    pub fingerprint: FingerprintVerdict,
}

impl SignalSet {
    /// The verdicts as an unordered set behind the shared interface.
    pub fn as_signals(&self) -> [&dyn Signal; 5] {
        [
            &self.direct_flags,
            &self.reputation,
            &self.asn_analysis,
            &self.geo_consistency,
            &self.fingerprint,
        ]
    }
}
