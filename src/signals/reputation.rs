use super::Signal;
use crate::config::ReputationConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verdict from the external IP reputation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReputationVerdict {
    pub fraud_score: u8,
    pub is_proxy: bool,
    pub is_vpn: bool,
    pub is_tor: bool,
    pub is_bot: bool,
    pub is_datacenter: bool,
    pub is_cloud_provider: bool,
    pub suspicious: bool,
    /// Set only when the lookup could not complete. An errored verdict is
    /// never suspicious; it degrades confidence instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Signal for ReputationVerdict {
    fn suspicious(&self) -> bool {
        self.suspicious
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl ReputationVerdict {
    /// Neutral verdict for a failed lookup.
    pub fn unavailable(reason: String) -> Self {
        ReputationVerdict {
            error: Some(reason),
            ..Default::default()
        }
    }
}

/// Reputation service response (IPQualityScore shape).
#[derive(Debug, Deserialize)]
struct ReputationResponse {
    fraud_score: f64,
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    vpn: bool,
    #[serde(default)]
    tor: bool,
    #[serde(default)]
    bot_status: bool,
    #[serde(default)]
    connection_type: Option<String>,
}

impl From<ReputationResponse> for ReputationVerdict {
    fn from(data: ReputationResponse) -> Self {
        let fraud_score = data.fraud_score.clamp(0.0, 100.0) as u8;
        let connection_type = data.connection_type.as_deref().unwrap_or("");
        ReputationVerdict {
            fraud_score,
            is_proxy: data.proxy,
            is_vpn: data.vpn,
            is_tor: data.tor,
            is_bot: data.bot_status,
            is_datacenter: connection_type == "data_center",
            is_cloud_provider: connection_type == "cloud_provider",
            suspicious: data.proxy || data.vpn || data.tor || fraud_score > 75,
            error: None,
        }
    }
}

/// Performs the single outbound reputation lookup for an analysis.
///
/// The only network-bound evaluator. Lookups are bounded by the configured
/// timeout and never fail the analysis: any failure is folded into the
/// verdict's `error` field.
#[derive(Debug, Clone)]
pub struct ReputationChecker {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    use_mock: bool,
}

impl ReputationChecker {
    pub fn new(config: &ReputationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("proxyguard/0.1")
            .build()?;

        Ok(ReputationChecker {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            use_mock: config.use_mock_data,
        })
    }

    /// Look up the IP's reputation. Infallible by contract: failures come
    /// back as a neutral verdict carrying an error description.
    pub async fn check(&self, ip: &str) -> ReputationVerdict {
        if self.use_mock {
            return self.mock_verdict(ip);
        }

        match self.fetch(ip).await {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("IP reputation lookup failed for {ip}: {e}");
                ReputationVerdict::unavailable(e.to_string())
            }
        }
    }

    async fn fetch(&self, ip: &str) -> Result<ReputationVerdict> {
        let url = format!("{}/{}/{}", self.endpoint, self.api_key, ip);
        log::debug!("Querying reputation service for {ip}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "reputation service returned HTTP {}",
                response.status()
            ));
        }

        let data: ReputationResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("malformed reputation response: {e}"))?;

        let verdict = ReputationVerdict::from(data);
        log::debug!(
            "Reputation lookup complete for {ip}: fraud_score={} suspicious={}",
            verdict.fraud_score,
            verdict.suspicious
        );
        Ok(verdict)
    }

    /// Canned verdicts for testing, keyed by documentation-range IPs.
    fn mock_verdict(&self, ip: &str) -> ReputationVerdict {
        log::debug!("Using mock reputation data for {ip}");
        match ip {
            // High fraud score, flagged as proxy.
            "203.0.113.66" => ReputationVerdict {
                fraud_score: 90,
                is_proxy: true,
                suspicious: true,
                ..Default::default()
            },
            // Known VPN egress, moderate score.
            "203.0.113.80" => ReputationVerdict {
                fraud_score: 60,
                is_vpn: true,
                is_datacenter: true,
                suspicious: true,
                ..Default::default()
            },
            // Simulated lookup failure.
            "192.0.2.200" => {
                ReputationVerdict::unavailable("mock reputation lookup timed out".to_string())
            }
            _ => ReputationVerdict::default(),
        }
    }
}
