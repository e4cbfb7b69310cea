use crate::config::Config;
use crate::errors::{DetectorError, Result};
use crate::record::IpRecord;
use crate::scoring::{self, RecommendedAction};
use crate::signals::{asn_isp, direct_flags, fingerprint, geo, ReputationChecker, SignalSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Final analysis for one IP. Field names are part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ip: String,
    pub is_proxy: bool,
    pub suspicion_score: u8,
    pub confidence: u8,
    pub signals: SignalSet,
    pub recommended_action: RecommendedAction,
}

/// The analysis orchestrator.
///
/// Holds only read-only configuration and the reputation client; every call
/// to [`analyze`](ProxyVpnDetector::analyze) produces independent data, so a
/// single detector is freely shared across concurrent analyses.
#[derive(Debug, Clone)]
pub struct ProxyVpnDetector {
    config: Arc<Config>,
    reputation: ReputationChecker,
}

impl ProxyVpnDetector {
    /// Build a detector from validated configuration. Invalid configuration
    /// is fatal here, not per-request.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let reputation = ReputationChecker::new(&config.reputation)
            .map_err(|e| DetectorError::Configuration(e.to_string()))?;
        Ok(ProxyVpnDetector {
            config: Arc::new(config),
            reputation,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one IP record.
    ///
    /// Runs the four data-only evaluators inline while the reputation lookup
    /// is in flight; total latency is bounded by that single call, which
    /// carries its own timeout. Evaluator failures are absorbed into the
    /// report; the only error is a record without a usable IP.
    pub async fn analyze(&self, record: &IpRecord) -> Result<AnalysisReport> {
        let ip = record
            .ip
            .as_deref()
            .filter(|ip| !ip.is_empty())
            .ok_or(DetectorError::MissingIp)?;

        log::debug!("Analyzing {ip}");

        let reputation_lookup = self.reputation.check(ip);

        let signals = SignalSet {
            direct_flags: direct_flags::evaluate(record.security.as_ref()),
            asn_analysis: asn_isp::evaluate(&self.config, record.connection.as_ref()),
            geo_consistency: geo::evaluate(record),
            fingerprint: fingerprint::evaluate(record, record.client_fingerprint.as_ref()),
            reputation: reputation_lookup.await,
        };

        let suspicion_score = scoring::suspicion_score(&signals, &self.config.weights);
        let confidence = scoring::confidence(&signals);
        let recommended_action = RecommendedAction::for_score(suspicion_score);
        let is_proxy = suspicion_score >= self.config.suspicion_threshold;

        log::info!(
            "Analysis of {ip}: score={suspicion_score} confidence={confidence} \
             is_proxy={is_proxy} action={recommended_action:?}"
        );

        Ok(AnalysisReport {
            ip: ip.to_string(),
            is_proxy,
            suspicion_score,
            confidence,
            signals,
            recommended_action,
        })
    }
}
