use crate::errors::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// ASNs operated by hosting/VPN providers commonly used for tunneling.
    #[serde(default = "default_known_proxy_asns")]
    pub known_proxy_asns: HashSet<u32>,

    /// Case-insensitive substrings that flag an ISP name as a VPN/proxy host.
    #[serde(default = "default_vpn_keywords")]
    pub vpn_keywords: Vec<String>,

    /// Suspicion score at or above which an IP is reported as a proxy.
    /// Independent of the fixed action bands; tune it separately.
    #[serde(default = "default_suspicion_threshold")]
    pub suspicion_threshold: u8,

    /// Per-category score weights. Must sum to exactly 100.
    #[serde(default)]
    pub weights: SignalWeights,

    #[serde(default)]
    pub reputation: ReputationConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

/// Score weight carried by each signal category when it is suspicious.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_weight_direct_flags")]
    pub direct_flags: u8,
    #[serde(default = "default_weight_reputation")]
    pub reputation: u8,
    #[serde(default = "default_weight_asn_analysis")]
    pub asn_analysis: u8,
    #[serde(default = "default_weight_geo_consistency")]
    pub geo_consistency: u8,
    #[serde(default = "default_weight_fingerprint")]
    pub fingerprint: u8,
}

impl Default for SignalWeights {
    fn default() -> Self {
        SignalWeights {
            direct_flags: default_weight_direct_flags(),
            reputation: default_weight_reputation(),
            asn_analysis: default_weight_asn_analysis(),
            geo_consistency: default_weight_geo_consistency(),
            fingerprint: default_weight_fingerprint(),
        }
    }
}

impl SignalWeights {
    pub fn total(&self) -> u32 {
        self.direct_flags as u32
            + self.reputation as u32
            + self.asn_analysis as u32
            + self.geo_consistency as u32
            + self.fingerprint as u32
    }
}

/// Settings for the outbound IP reputation lookup (IPQualityScore shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    #[serde(default = "default_reputation_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_reputation_timeout")]
    pub timeout_seconds: u64,
    /// Serve canned verdicts instead of calling the network (for testing).
    #[serde(default)]
    pub use_mock_data: bool,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        ReputationConfig {
            endpoint: default_reputation_endpoint(),
            api_key: String::new(),
            timeout_seconds: default_reputation_timeout(),
            use_mock_data: false,
        }
    }
}

/// Settings for the geolocation provider the CLI uses to build an IpRecord.
/// The detection engine itself never performs this lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_geolocation_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        GeolocationConfig {
            endpoint: default_geolocation_endpoint(),
            access_key: String::new(),
            timeout_seconds: default_geolocation_timeout(),
        }
    }
}

fn default_known_proxy_asns() -> HashSet<u32> {
    HashSet::from([
        14061, // DigitalOcean
        16509, // Amazon AWS
        14618, // Amazon AWS
        15169, // Google Cloud
        3356,  // Level3
        9009,  // M247
        4766,  // Korea Telecom
        9299,  // Philippine Long Distance Telephone Company
        6939,  // Hurricane Electric
    ])
}

fn default_vpn_keywords() -> Vec<String> {
    [
        "vpn",
        "proxy",
        "hosting",
        "cloud",
        "data center",
        "server",
        "anonymous",
        "nord",
        "express",
        "hide",
        "tor",
        "exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_suspicion_threshold() -> u8 {
    65
}

fn default_weight_direct_flags() -> u8 {
    35
}

fn default_weight_reputation() -> u8 {
    25
}

fn default_weight_asn_analysis() -> u8 {
    20
}

fn default_weight_geo_consistency() -> u8 {
    15
}

fn default_weight_fingerprint() -> u8 {
    5
}

fn default_reputation_endpoint() -> String {
    "https://ipqualityscore.com/api/json/ip".to_string()
}

fn default_reputation_timeout() -> u64 {
    5
}

fn default_geolocation_endpoint() -> String {
    "http://api.ipstack.com".to_string()
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            known_proxy_asns: default_known_proxy_asns(),
            vpn_keywords: default_vpn_keywords(),
            suspicion_threshold: default_suspicion_threshold(),
            weights: SignalWeights::default(),
            reputation: ReputationConfig::default(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Enforce construction-time invariants. Violations are fatal at startup
    /// rather than per-request.
    pub fn validate(&self) -> Result<()> {
        let total = self.weights.total();
        if total != 100 {
            return Err(DetectorError::Configuration(format!(
                "signal weights must sum to 100, got {total}"
            )));
        }
        if self.suspicion_threshold > 100 {
            return Err(DetectorError::Configuration(format!(
                "suspicion_threshold must be within 0-100, got {}",
                self.suspicion_threshold
            )));
        }
        if self.reputation.timeout_seconds == 0 {
            return Err(DetectorError::Configuration(
                "reputation timeout_seconds must be nonzero".to_string(),
            ));
        }
        if self.reputation.endpoint.is_empty() {
            return Err(DetectorError::Configuration(
                "reputation endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
