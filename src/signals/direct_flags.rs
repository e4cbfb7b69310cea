use super::Signal;
use crate::record::SecurityInfo;
use serde::{Deserialize, Serialize};

/// Verdict from the security flags the geolocation provider reports directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectFlagsVerdict {
    pub is_explicit_proxy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_type: Option<String>,
    pub is_tor: bool,
    pub is_crawler: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_types: Option<Vec<String>>,
    pub suspicious: bool,
}

impl Signal for DirectFlagsVerdict {
    fn suspicious(&self) -> bool {
        self.suspicious
    }
}

/// Evaluate the provider's own security flags. Missing fields default to
/// non-suspicious values; an absent threat level counts as "low".
pub fn evaluate(security: Option<&SecurityInfo>) -> DirectFlagsVerdict {
    let Some(security) = security else {
        return DirectFlagsVerdict::default();
    };

    let is_explicit_proxy = security.is_proxy == Some(true);
    let is_tor = security.is_tor == Some(true);
    let elevated_threat = security
        .threat_level
        .as_deref()
        .is_some_and(|level| level != "low");

    DirectFlagsVerdict {
        is_explicit_proxy,
        proxy_type: security.proxy_type.clone(),
        is_tor,
        is_crawler: security.is_crawler == Some(true),
        threat_level: security.threat_level.clone(),
        threat_types: security.threat_types.clone(),
        suspicious: is_explicit_proxy || is_tor || elevated_threat,
    }
}
