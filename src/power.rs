use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::climatology::RawPointSeries;
use crate::config::Config;
use crate::fetch_error::FetchError;

/// NASA POWER daily point endpoint.
pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
/// POWER community the request is scoped to. AG reports agroclimatology units.
pub const DEFAULT_COMMUNITY: &str = "AG";
/// First day of the 30-year historical window (YYYYMMDD).
pub const DEFAULT_RECORD_START: &str = "19810101";
/// Last day of the 30-year historical window (YYYYMMDD).
pub const DEFAULT_RECORD_END: &str = "20101231";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct PowerDailyResponse {
    pub properties: PowerProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PowerProperties {
    #[serde(default)]
    pub parameter: RawPointSeries,
}

#[derive(Clone)]
pub struct PowerClient {
    client: reqwest::Client,
    base_url: String,
    community: String,
    record_start: String,
    record_end: String,
}

impl PowerClient {
    pub fn new(config: &Config) -> Self {
        Self::build(
            config.power_base_url.clone(),
            config.power_community.clone(),
            config.power_record_start.clone(),
            config.power_record_end.clone(),
            config.power_timeout_secs,
        )
    }

    /// Client pointed at an alternate endpoint, used by tests against a mock server.
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(
            base_url,
            DEFAULT_COMMUNITY.to_string(),
            DEFAULT_RECORD_START.to_string(),
            DEFAULT_RECORD_END.to_string(),
            DEFAULT_TIMEOUT_SECS,
        )
    }

    fn build(
        base_url: String,
        community: String,
        record_start: String,
        record_end: String,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            community,
            record_start,
            record_end,
        }
    }

    pub fn record_start(&self) -> &str {
        &self.record_start
    }

    pub fn record_end(&self) -> &str {
        &self.record_end
    }

    /// Fetch the full daily series for one point, keyed by parameter code.
    ///
    /// `parameters` is a comma-separated list of POWER parameter codes,
    /// e.g. "T2M,PRECTOTCORR".
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_daily_point(
        &self,
        latitude: f64,
        longitude: f64,
        parameters: &str,
    ) -> Result<RawPointSeries, FetchError> {
        let url = self.daily_point_url(latitude, longitude, parameters);
        debug!("Sending HTTP request to POWER API");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.is_client_error() {
            return Err(FetchError::ClientError(format!(
                "{} for ({}, {})",
                status, latitude, longitude
            )));
        }
        if status.is_server_error() {
            return Err(FetchError::ServerError(format!(
                "{} for ({}, {})",
                status, latitude, longitude
            )));
        }

        let body = response.text().await?;
        debug!("Retrieved JSON content, size: {} bytes", body.len());

        let parsed: PowerDailyResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(parsed.properties.parameter)
    }

    fn daily_point_url(&self, latitude: f64, longitude: f64, parameters: &str) -> String {
        format!(
            "{}?parameters={}&community={}&latitude={}&longitude={}&start={}&end={}&format=JSON",
            self.base_url,
            parameters,
            self.community,
            latitude,
            longitude,
            self.record_start,
            self.record_end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_point_url() {
        let client = PowerClient::with_base_url("https://example.test/daily".to_string());
        let url = client.daily_point_url(48.8566, 2.3522, "T2M,PRECTOTCORR");
        assert_eq!(
            url,
            "https://example.test/daily?parameters=T2M,PRECTOTCORR&community=AG&latitude=48.8566&longitude=2.3522&start=19810101&end=20101231&format=JSON"
        );
    }

    #[test]
    fn test_deserialize_daily_response() {
        let body = r#"{
            "properties": {
                "parameter": {
                    "T2M": {"19810701": 31.4, "19810702": "33.0"}
                }
            }
        }"#;

        let parsed: PowerDailyResponse = serde_json::from_str(body).unwrap();
        let series = parsed.properties.parameter;
        assert_eq!(series.len(), 1);
        assert_eq!(series["T2M"].len(), 2);
    }

    #[test]
    fn test_deserialize_missing_parameter_map() {
        let body = r#"{"properties": {}}"#;

        let parsed: PowerDailyResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.properties.parameter.is_empty());
    }

    #[test]
    fn test_deserialize_missing_properties_is_error() {
        let body = r#"{"messages": ["bad request"]}"#;

        let parsed = serde_json::from_str::<PowerDailyResponse>(body);
        assert!(parsed.is_err());
    }
}
