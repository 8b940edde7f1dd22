use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::climatology::{
    exceedance_probability, extract_daily_series, ClimatologyError, RawPointSeries,
};
use crate::fetch_error::FetchError;
use crate::power::PowerClient;

pub const DEFAULT_HEAT_PARAM: &str = "T2M";
pub const DEFAULT_HEAT_THRESHOLD_C: f64 = 35.0;
pub const DEFAULT_RAIN_PARAM: &str = "PRECTOTCORR";
pub const DEFAULT_RAIN_THRESHOLD_MM: f64 = 20.0;

#[derive(Debug, thiserror::Error)]
pub enum LikelihoodError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Climatology error: {0}")]
    Climatology(#[from] ClimatologyError),
}

/// Query parameters for the likelihood endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LikelihoodQuery {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
    /// Calendar month to evaluate (1-12)
    pub month: u32,
    /// POWER parameter code for the heat variable
    #[serde(default = "default_heat_param")]
    pub heat_param: String,
    /// Heat threshold, same unit as the heat parameter (deg C for T2M)
    #[serde(default = "default_heat_threshold")]
    pub heat_thresh: f64,
    /// POWER parameter code for the rain variable
    #[serde(default = "default_rain_param")]
    pub rain_param: String,
    /// Rain threshold, same unit as the rain parameter (mm/day for PRECTOTCORR)
    #[serde(default = "default_rain_threshold")]
    pub rain_thresh: f64,
}

fn default_heat_param() -> String {
    DEFAULT_HEAT_PARAM.to_string()
}

fn default_heat_threshold() -> f64 {
    DEFAULT_HEAT_THRESHOLD_C
}

fn default_rain_param() -> String {
    DEFAULT_RAIN_PARAM.to_string()
}

fn default_rain_threshold() -> f64 {
    DEFAULT_RAIN_THRESHOLD_MM
}

impl LikelihoodQuery {
    /// Check coordinate, month and threshold ranges before any fetch is attempted.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("lat must be between -90 and 90, got {}", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("lon must be between -180 and 180, got {}", self.lon));
        }
        if !(1..=12).contains(&self.month) {
            return Err(format!("month must be between 1 and 12, got {}", self.month));
        }
        if self.heat_param.trim().is_empty() || self.rain_param.trim().is_empty() {
            return Err("parameter codes must not be blank".to_string());
        }
        if !self.heat_thresh.is_finite() || !self.rain_thresh.is_finite() {
            return Err("thresholds must be finite numbers".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthLikelihood {
    /// Requested point as "lat,lon"
    pub location: String,
    pub month: u32,
    /// First day of the historical record (YYYYMMDD)
    pub record_start: String,
    /// Last day of the historical record (YYYYMMDD)
    pub record_end: String,
    pub probabilities: ProbabilitySet,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProbabilitySet {
    pub heat: ExceedanceEstimate,
    pub rain: ExceedanceEstimate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExceedanceEstimate {
    /// POWER parameter code the estimate was computed from
    pub parameter: String,
    pub threshold: f64,
    /// Fraction of on-record days in the month above the threshold, or null
    /// when the record holds no usable days for that month
    pub probability: Option<f64>,
}

#[derive(Clone)]
pub struct LikelihoodService {
    power: PowerClient,
}

impl LikelihoodService {
    pub fn new(power: PowerClient) -> Self {
        Self { power }
    }

    /// Fetch the historical record for the requested point and compute both
    /// exceedance estimates. Heat and rain codes are deduplicated into a
    /// single parameter list so each request costs one POWER call.
    #[instrument(skip(self, query), fields(lat = query.lat, lon = query.lon, month = query.month))]
    pub async fn month_likelihood(
        &self,
        query: &LikelihoodQuery,
    ) -> Result<MonthLikelihood, LikelihoodError> {
        let parameters = join_parameters(&[&query.heat_param, &query.rain_param]);
        debug!("Fetching POWER record for parameters {}", parameters);

        let series = self
            .power
            .fetch_daily_point(query.lat, query.lon, &parameters)
            .await?;

        let heat = estimate(&series, &query.heat_param, query.month, query.heat_thresh)?;
        let rain = estimate(&series, &query.rain_param, query.month, query.rain_thresh)?;

        Ok(MonthLikelihood {
            location: format!("{},{}", query.lat, query.lon),
            month: query.month,
            record_start: self.power.record_start().to_string(),
            record_end: self.power.record_end().to_string(),
            probabilities: ProbabilitySet { heat, rain },
        })
    }
}

fn estimate(
    series: &RawPointSeries,
    param: &str,
    month: u32,
    threshold: f64,
) -> Result<ExceedanceEstimate, ClimatologyError> {
    let readings = extract_daily_series(series, param)?;
    let probability = exceedance_probability(&readings, month, threshold)?;
    Ok(ExceedanceEstimate {
        parameter: param.to_string(),
        threshold,
        probability: probability.map(round_probability),
    })
}

/// Comma-join distinct parameter codes, preserving first-seen order.
fn join_parameters(codes: &[&str]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for &code in codes {
        if !seen.contains(&code) {
            seen.push(code);
        }
    }
    seen.join(",")
}

/// Rounding for the response body; the core computation stays unrounded.
fn round_probability(p: f64) -> f64 {
    (p * 1000.0).round() / 1000.0
}
