use serde::{Deserialize, Serialize};

/// IP data in the shape returned by ipstack-style geolocation providers.
///
/// Every field is optional: records arrive from third-party APIs and from
/// callers that only know the bare IP, so a missing group degrades the
/// corresponding signal to a neutral verdict instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpRecord {
    pub ip: Option<String>,
    pub continent_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub security: Option<SecurityInfo>,
    pub connection: Option<ConnectionInfo>,
    pub location: Option<LocationInfo>,
    /// Browser-side signals collected by a client-side collaborator.
    /// Not part of the ipstack payload; merged in by the caller when available.
    pub client_fingerprint: Option<ClientFingerprint>,
}

/// Security flags as reported by the geolocation provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub is_proxy: Option<bool>,
    pub proxy_type: Option<String>,
    pub is_tor: Option<bool>,
    pub is_crawler: Option<bool>,
    pub threat_level: Option<String>,
    pub threat_types: Option<Vec<String>>,
}

/// Network operator information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub asn: Option<u32>,
    pub isp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    pub time_zone: Option<TimeZoneInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeZoneInfo {
    /// IANA timezone identifier, e.g. "America/New_York".
    pub id: Option<String>,
}

/// Client-supplied fingerprint payload.
///
/// Collected in the browser (WebRTC candidate scan, `Intl` timezone, user
/// agent self-report) and passed alongside the IP record. All fields
/// optional; missing data is treated as consistent rather than suspicious.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientFingerprint {
    /// Candidate IPs surfaced by WebRTC ICE gathering.
    #[serde(default)]
    pub web_rtc_ips: Vec<String>,
    /// User agent observed server-side on the HTTP request.
    pub observed_user_agent: Option<String>,
    /// User agent the client-side script reports for itself.
    pub reported_user_agent: Option<String>,
    /// IANA timezone the browser resolves via Intl.DateTimeFormat.
    pub browser_time_zone: Option<String>,
}
