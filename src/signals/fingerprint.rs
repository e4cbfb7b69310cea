use super::Signal;
use crate::record::{ClientFingerprint, IpRecord};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Verdict from browser-side fingerprint signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintVerdict {
    pub web_rtc_leaks: bool,
    pub user_agent_consistent: bool,
    pub time_zone_offset_consistent: bool,
    pub suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Signal for FingerprintVerdict {
    fn suspicious(&self) -> bool {
        self.suspicious
    }
}

/// Whether an address belongs to a range a WebRTC candidate scan should
/// ignore (local networks never reveal a tunnel endpoint).
fn is_local_address(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

/// Evaluate client-supplied fingerprint signals against the IP record.
///
/// Without a payload this degrades to the fixed non-suspicious default:
/// fingerprint collection happens in the browser, so a server that was never
/// handed the payload has nothing to judge.
pub fn evaluate(record: &IpRecord, payload: Option<&ClientFingerprint>) -> FingerprintVerdict {
    let Some(payload) = payload else {
        return FingerprintVerdict {
            web_rtc_leaks: false,
            user_agent_consistent: true,
            time_zone_offset_consistent: true,
            suspicious: false,
            notes: Some("no client fingerprint supplied; server-side default".to_string()),
        };
    };

    let record_ip: Option<IpAddr> = record.ip.as_deref().and_then(|s| s.parse().ok());

    // A public WebRTC candidate that differs from the connecting IP means the
    // browser sees a network the tunnel hides from us.
    let web_rtc_leaks = payload.web_rtc_ips.iter().any(|candidate| {
        match candidate.parse::<IpAddr>() {
            Ok(ip) => !is_local_address(&ip) && Some(ip) != record_ip,
            Err(_) => false,
        }
    });

    let user_agent_consistent = match (
        payload.reported_user_agent.as_deref(),
        payload.observed_user_agent.as_deref(),
    ) {
        (Some(reported), Some(observed)) => reported == observed,
        _ => true,
    };

    let record_tz = record
        .location
        .as_ref()
        .and_then(|loc| loc.time_zone.as_ref())
        .and_then(|tz| tz.id.as_deref());

    let time_zone_offset_consistent = match (payload.browser_time_zone.as_deref(), record_tz) {
        (Some(browser_tz), Some(ip_tz)) => browser_tz == ip_tz,
        _ => true,
    };

    FingerprintVerdict {
        web_rtc_leaks,
        user_agent_consistent,
        time_zone_offset_consistent,
        suspicious: web_rtc_leaks || !user_agent_consistent || !time_zone_offset_consistent,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LocationInfo, TimeZoneInfo};

    fn record_with_ip(ip: &str) -> IpRecord {
        IpRecord {
            ip: Some(ip.to_string()),
            location: Some(LocationInfo {
                time_zone: Some(TimeZoneInfo {
                    id: Some("America/New_York".to_string()),
                }),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_payload_defaults_to_clean() {
        let verdict = evaluate(&record_with_ip("1.2.3.4"), None);
        assert!(!verdict.suspicious);
        assert!(!verdict.web_rtc_leaks);
        assert!(verdict.user_agent_consistent);
        assert!(verdict.notes.is_some());
    }

    #[test]
    fn test_webrtc_leak_of_foreign_public_ip() {
        let payload = ClientFingerprint {
            web_rtc_ips: vec!["198.51.100.9".to_string()],
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(verdict.web_rtc_leaks);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_private_candidates_are_ignored() {
        let payload = ClientFingerprint {
            web_rtc_ips: vec![
                "192.168.1.10".to_string(),
                "10.0.0.3".to_string(),
                "127.0.0.1".to_string(),
            ],
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.web_rtc_leaks);
        assert!(!verdict.suspicious);
    }

    #[test]
    fn test_candidate_matching_record_ip_is_not_a_leak() {
        let payload = ClientFingerprint {
            web_rtc_ips: vec!["1.2.3.4".to_string()],
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.web_rtc_leaks);
    }

    #[test]
    fn test_user_agent_mismatch() {
        let payload = ClientFingerprint {
            observed_user_agent: Some("Mozilla/5.0 (X11; Linux)".to_string()),
            reported_user_agent: Some("Mozilla/5.0 (Windows NT 10.0)".to_string()),
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.user_agent_consistent);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_browser_timezone_mismatch() {
        let payload = ClientFingerprint {
            browser_time_zone: Some("Europe/Moscow".to_string()),
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.time_zone_offset_consistent);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_matching_payload_is_clean() {
        let payload = ClientFingerprint {
            web_rtc_ips: vec!["192.168.1.10".to_string()],
            observed_user_agent: Some("Mozilla/5.0".to_string()),
            reported_user_agent: Some("Mozilla/5.0".to_string()),
            browser_time_zone: Some("America/New_York".to_string()),
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.suspicious);
        assert!(verdict.notes.is_none());
    }

    #[test]
    fn test_unparseable_candidates_are_ignored() {
        let payload = ClientFingerprint {
            web_rtc_ips: vec!["not-an-ip".to_string()],
            ..Default::default()
        };
        let verdict = evaluate(&record_with_ip("1.2.3.4"), Some(&payload));
        assert!(!verdict.web_rtc_leaks);
    }
}
