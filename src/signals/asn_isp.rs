use super::Signal;
use crate::config::Config;
use crate::record::ConnectionInfo;
use serde::{Deserialize, Serialize};

/// Verdict from the network-operator heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AsnIspVerdict {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    pub is_known_proxy_asn: bool,
    pub contains_vpn_keyword: bool,
    pub suspicious: bool,
}

impl Signal for AsnIspVerdict {
    fn suspicious(&self) -> bool {
        self.suspicious
    }
}

/// Check the ASN against the configured hosting/VPN operator list and scan
/// the ISP name for VPN keywords. Missing data defaults both checks to false.
pub fn evaluate(config: &Config, connection: Option<&ConnectionInfo>) -> AsnIspVerdict {
    let Some(connection) = connection else {
        return AsnIspVerdict::default();
    };

    let is_known_proxy_asn = connection
        .asn
        .is_some_and(|asn| config.known_proxy_asns.contains(&asn));

    let contains_vpn_keyword = connection.isp.as_deref().is_some_and(|isp| {
        let isp_lower = isp.to_lowercase();
        config
            .vpn_keywords
            .iter()
            .any(|keyword| isp_lower.contains(&keyword.to_lowercase()))
    });

    AsnIspVerdict {
        asn: connection.asn,
        isp: connection.isp.clone(),
        is_known_proxy_asn,
        contains_vpn_keyword,
        suspicious: is_known_proxy_asn || contains_vpn_keyword,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(asn: Option<u32>, isp: Option<&str>) -> ConnectionInfo {
        ConnectionInfo {
            asn,
            isp: isp.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_missing_connection_block() {
        let config = Config::default();
        let verdict = evaluate(&config, None);
        assert!(!verdict.suspicious);
        assert!(verdict.asn.is_none());
    }

    #[test]
    fn test_known_proxy_asn() {
        let config = Config::default();
        let conn = connection(Some(15169), Some("Google LLC"));
        let verdict = evaluate(&config, Some(&conn));
        assert!(verdict.is_known_proxy_asn);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_vpn_keyword_case_folded() {
        let config = Config::default();
        let conn = connection(Some(1), Some("ExpressVPN International Ltd"));
        let verdict = evaluate(&config, Some(&conn));
        assert!(!verdict.is_known_proxy_asn);
        assert!(verdict.contains_vpn_keyword);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_residential_isp_is_clean() {
        let config = Config::default();
        let conn = connection(Some(7922), Some("Comcast Cable Communications"));
        let verdict = evaluate(&config, Some(&conn));
        assert!(!verdict.suspicious);
    }

    #[test]
    fn test_missing_fields_default_to_clean() {
        let config = Config::default();
        let conn = connection(None, None);
        let verdict = evaluate(&config, Some(&conn));
        assert!(!verdict.is_known_proxy_asn);
        assert!(!verdict.contains_vpn_keyword);
        assert!(!verdict.suspicious);
    }

    #[test]
    fn test_custom_keyword_list() {
        let mut config = Config::default();
        config.vpn_keywords = vec!["tunnelco".to_string()];
        let conn = connection(None, Some("TunnelCo Networks"));
        let verdict = evaluate(&config, Some(&conn));
        assert!(verdict.contains_vpn_keyword);
    }
}
