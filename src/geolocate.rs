use crate::config::GeolocationConfig;
use crate::record::IpRecord;
use anyhow::{anyhow, Result};
use std::time::Duration;

/// Client for an ipstack-shaped geolocation provider.
///
/// Used by the CLI to turn a bare IP into an [`IpRecord`] before analysis.
/// The detection engine never calls this; it only consumes the record.
#[derive(Debug, Clone)]
pub struct GeolocationClient {
    client: reqwest::Client,
    endpoint: String,
    access_key: String,
}

impl GeolocationClient {
    pub fn new(config: &GeolocationConfig) -> Result<Self> {
        if config.access_key.is_empty() {
            return Err(anyhow!("geolocation access_key is not configured"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("proxyguard/0.1")
            .build()?;

        Ok(GeolocationClient {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
        })
    }

    /// Fetch the geolocation record for an IP, including the provider's
    /// security flags (`security=1`).
    pub async fn lookup(&self, ip: &str) -> Result<IpRecord> {
        let url = format!(
            "{}/{}?access_key={}&security=1",
            self.endpoint, ip, self.access_key
        );
        log::debug!("Fetching geolocation data for {ip}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "geolocation service returned HTTP {}",
                response.status()
            ));
        }

        let record: IpRecord = response
            .json()
            .await
            .map_err(|e| anyhow!("malformed geolocation response: {e}"))?;

        if record.ip.is_none() {
            return Err(anyhow!("geolocation response carries no IP"));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_access_key_is_rejected() {
        let config = GeolocationConfig::default();
        assert!(GeolocationClient::new(&config).is_err());
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let config = GeolocationConfig {
            endpoint: "http://api.ipstack.com/".to_string(),
            access_key: "test-key".to_string(),
            timeout_seconds: 5,
        };
        let client = GeolocationClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "http://api.ipstack.com");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = GeolocationConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            access_key: "test-key".to_string(),
            timeout_seconds: 1,
        };
        let client = GeolocationClient::new(&config).unwrap();
        assert!(client.lookup("1.2.3.4").await.is_err());
    }
}
