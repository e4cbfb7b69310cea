use super::Signal;
use crate::record::IpRecord;
use serde::{Deserialize, Serialize};

/// Verdict from the geographic consistency checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoConsistencyVerdict {
    pub time_zone_matches_region: bool,
    pub has_detailed_location: bool,
    pub suspicious: bool,
}

impl Signal for GeoConsistencyVerdict {
    fn suspicious(&self) -> bool {
        self.suspicious
    }
}

/// Whether the timezone's leading region token is plausible for the given
/// continent code. Rough mapping; border regions are accepted as matches only
/// when the table says so.
fn region_matches_continent(tz_region: &str, continent: &str) -> bool {
    match tz_region {
        "America" => continent == "NA",
        "Europe" => continent == "EU",
        "Asia" => continent == "AS",
        "Africa" => continent == "AF",
        "Australia" => continent == "OC" || continent == "AU",
        "Pacific" => continent == "OC",
        _ => false,
    }
}

/// Check that the reported timezone agrees with the reported continent and
/// that the location carries full detail (VPN endpoints often geolocate with
/// generic, coordinate-free data). Missing timezone or continent data is
/// treated conservatively as a mismatch.
pub fn evaluate(record: &IpRecord) -> GeoConsistencyVerdict {
    let tz_id = record
        .location
        .as_ref()
        .and_then(|loc| loc.time_zone.as_ref())
        .and_then(|tz| tz.id.as_deref())
        .unwrap_or("");

    let tz_region = tz_id.split('/').next().unwrap_or("");

    let time_zone_matches_region = match record.continent_code.as_deref() {
        Some(continent) if !tz_region.is_empty() => {
            region_matches_continent(tz_region, continent)
        }
        _ => false,
    };

    let has_detailed_location = record.latitude.is_some()
        && record.longitude.is_some()
        && record.city.as_deref().is_some_and(|c| !c.is_empty())
        && record.zip.as_deref().is_some_and(|z| !z.is_empty());

    GeoConsistencyVerdict {
        time_zone_matches_region,
        has_detailed_location,
        suspicious: !time_zone_matches_region || !has_detailed_location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LocationInfo, TimeZoneInfo};

    fn record(tz: Option<&str>, continent: Option<&str>) -> IpRecord {
        IpRecord {
            continent_code: continent.map(|s| s.to_string()),
            latitude: Some(40.71),
            longitude: Some(-74.0),
            city: Some("New York".to_string()),
            zip: Some("10001".to_string()),
            location: tz.map(|id| LocationInfo {
                time_zone: Some(TimeZoneInfo {
                    id: Some(id.to_string()),
                }),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_consistent_record() {
        let verdict = evaluate(&record(Some("America/New_York"), Some("NA")));
        assert!(verdict.time_zone_matches_region);
        assert!(verdict.has_detailed_location);
        assert!(!verdict.suspicious);
    }

    #[test]
    fn test_timezone_continent_mismatch() {
        let verdict = evaluate(&record(Some("Europe/London"), Some("NA")));
        assert!(!verdict.time_zone_matches_region);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_missing_timezone_is_a_mismatch() {
        let verdict = evaluate(&record(None, Some("NA")));
        assert!(!verdict.time_zone_matches_region);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_missing_continent_is_a_mismatch() {
        let verdict = evaluate(&record(Some("America/New_York"), None));
        assert!(!verdict.time_zone_matches_region);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_australia_accepts_both_codes() {
        let oc = evaluate(&record(Some("Australia/Sydney"), Some("OC")));
        assert!(oc.time_zone_matches_region);
        let au = evaluate(&record(Some("Australia/Sydney"), Some("AU")));
        assert!(au.time_zone_matches_region);
        let pacific = evaluate(&record(Some("Pacific/Auckland"), Some("OC")));
        assert!(pacific.time_zone_matches_region);
    }

    #[test]
    fn test_missing_zip_means_no_detail() {
        let mut rec = record(Some("America/New_York"), Some("NA"));
        rec.zip = None;
        let verdict = evaluate(&rec);
        assert!(verdict.time_zone_matches_region);
        assert!(!verdict.has_detailed_location);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_empty_city_means_no_detail() {
        let mut rec = record(Some("Europe/Berlin"), Some("EU"));
        rec.city = Some(String::new());
        let verdict = evaluate(&rec);
        assert!(!verdict.has_detailed_location);
        assert!(verdict.suspicious);
    }

    #[test]
    fn test_unknown_region_token() {
        let verdict = evaluate(&record(Some("Etc/UTC"), Some("NA")));
        assert!(!verdict.time_zone_matches_region);
        assert!(verdict.suspicious);
    }
}
