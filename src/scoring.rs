use crate::config::SignalWeights;
use crate::signals::SignalSet;
use serde::{Deserialize, Serialize};

/// Mitigation recommended for a given suspicion score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Allow,
    Monitor,
    Challenge,
    Block,
}

impl RecommendedAction {
    /// Map a suspicion score onto the fixed action bands, highest first.
    /// Total over 0-100; depends on nothing but the score.
    pub fn for_score(score: u8) -> Self {
        if score >= 85 {
            RecommendedAction::Block
        } else if score >= 65 {
            RecommendedAction::Challenge
        } else if score >= 40 {
            RecommendedAction::Monitor
        } else {
            RecommendedAction::Allow
        }
    }
}

/// Sum the weights of every suspicious category. Weights are validated to
/// total 100 at construction, so the result stays within 0-100.
pub fn suspicion_score(signals: &SignalSet, weights: &SignalWeights) -> u8 {
    let mut score: u32 = 0;
    if signals.direct_flags.suspicious {
        score += weights.direct_flags as u32;
    }
    if signals.reputation.suspicious {
        score += weights.reputation as u32;
    }
    if signals.asn_analysis.suspicious {
        score += weights.asn_analysis as u32;
    }
    if signals.geo_consistency.suspicious {
        score += weights.geo_consistency as u32;
    }
    if signals.fingerprint.suspicious {
        score += weights.fingerprint as u32;
    }
    score.min(100) as u8
}

/// Estimate how much the suspicion score should be trusted.
///
/// Base confidence is the fraction of evaluators that completed; it is then
/// scaled by how strongly the completed evaluators agree with each other
/// (unanimous either way scores highest, a 50/50 split lowest). With no
/// completed evaluators at all the confidence is 0.
pub fn confidence(signals: &SignalSet) -> u8 {
    let verdicts = signals.as_signals();
    let total = verdicts.len();
    let valid: Vec<_> = verdicts
        .iter()
        .filter(|signal| signal.error().is_none())
        .collect();

    if valid.is_empty() {
        return 0;
    }

    let base = (valid.len() as f64 / total as f64) * 100.0;
    let suspicious_count = valid.iter().filter(|signal| signal.suspicious()).count();
    let agreement = ((suspicious_count as f64 / valid.len() as f64) - 0.5).abs() * 2.0;

    (base * (0.7 + agreement * 0.3)).round() as u8
}
