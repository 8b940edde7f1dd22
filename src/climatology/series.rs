use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::climatology::error::ClimatologyError;

/// Raw POWER point payload: parameter code -> (8-digit date key -> raw value).
///
/// Values arrive as JSON numbers or strings and stay unvalidated until
/// [`extract_daily_series`] runs. The inner `BTreeMap` keeps date keys sorted,
/// so extracted readings come out in chronological order.
pub type RawPointSeries = HashMap<String, BTreeMap<String, Value>>;

/// Values at or below this mark a missing observation in the provider's data
/// (POWER fills gaps with -9999). Design constant, not configurable.
pub const MISSING_SENTINEL: f64 = -9000.0;

/// One validated day of data: a calendar date and a finite reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub value: f64,
}

/// Extract the validated daily series for one parameter.
///
/// Entries with a malformed date key or a non-numeric value are skipped, not
/// errors, since POWER payloads may carry non-data metadata keys. Sentinel and
/// non-finite values are dropped here so they can never reach the denominator
/// of a downstream statistic.
///
/// A parameter missing from the payload entirely is an error: an empty result
/// must mean "parameter present but nothing usable", never "parameter absent".
pub fn extract_daily_series(
    series: &RawPointSeries,
    param: &str,
) -> Result<Vec<DailyReading>, ClimatologyError> {
    if param.trim().is_empty() {
        return Err(ClimatologyError::EmptyParameter);
    }

    let entries = series
        .get(param)
        .ok_or_else(|| ClimatologyError::ParameterNotFound(param.to_string()))?;

    let mut readings = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;

    for (key, raw) in entries {
        let date = match parse_date_key(key) {
            Some(date) => date,
            None => {
                debug!("Skipping non-date key {:?} for parameter {}", key, param);
                skipped += 1;
                continue;
            }
        };

        let value = match parse_raw_value(raw) {
            Some(value) => value,
            None => {
                debug!("Skipping non-numeric value {:?} on {}", raw, date);
                skipped += 1;
                continue;
            }
        };

        if !value.is_finite() || value <= MISSING_SENTINEL {
            skipped += 1;
            continue;
        }

        readings.push(DailyReading { date, value });
    }

    if skipped > 0 {
        debug!(
            "Extracted {} readings for parameter {} ({} entries skipped)",
            readings.len(),
            param,
            skipped
        );
    }

    Ok(readings)
}

/// Date keys must be exactly eight ASCII digits ("YYYYMMDD") and a real
/// calendar date.
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(key, "%Y%m%d").ok()
}

/// POWER serializes readings as numbers, but some payloads carry them as
/// strings ("36.2", "-9999"); accept both.
fn parse_raw_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series_with(param: &str, entries: &[(&str, Value)]) -> RawPointSeries {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        let mut series = HashMap::new();
        series.insert(param.to_string(), map);
        series
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_numbers_and_numeric_strings() {
        let series = series_with(
            "T2M",
            &[
                ("20100715", json!("36.2")),
                ("20100716", json!(-9999)),
                ("20100801", json!(34.0)),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert_eq!(
            readings,
            vec![
                DailyReading {
                    date: date(2010, 7, 15),
                    value: 36.2
                },
                DailyReading {
                    date: date(2010, 8, 1),
                    value: 34.0
                },
            ]
        );
    }

    #[test]
    fn test_extract_skips_malformed_date_keys() {
        let series = series_with(
            "T2M",
            &[
                ("invalid-date", json!("40")),
                ("2010071", json!(21.0)),
                ("201007150", json!(21.0)),
                ("20101340", json!(21.0)),
                ("20100230", json!(21.0)),
                ("20100715", json!(21.0)),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].date, date(2010, 7, 15));
    }

    #[test]
    fn test_extract_skips_non_numeric_values() {
        let series = series_with(
            "T2M",
            &[
                ("20100715", json!("n/a")),
                ("20100716", json!(null)),
                ("20100717", json!([1.0, 2.0])),
                ("20100718", json!(18.5)),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, 18.5);
    }

    #[test]
    fn test_extract_skips_nan_and_infinite_strings() {
        let series = series_with(
            "T2M",
            &[
                ("20100715", json!("NaN")),
                ("20100716", json!("inf")),
                ("20100717", json!("-inf")),
                ("20100718", json!("20.0")),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].date, date(2010, 7, 18));
    }

    #[test]
    fn test_extract_sentinel_boundary() {
        // -9000 itself counts as missing; anything above it is a reading
        let series = series_with(
            "T2M",
            &[
                ("20100715", json!(-9000.0)),
                ("20100716", json!(-8999.9)),
                ("20100717", json!(-9999)),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, -8999.9);
    }

    #[test]
    fn test_extract_missing_parameter_is_an_error() {
        let series = series_with("T2M", &[("20100715", json!(30.0))]);

        let result = extract_daily_series(&series, "PRECTOTCORR");

        assert!(matches!(
            result,
            Err(ClimatologyError::ParameterNotFound(ref p)) if p == "PRECTOTCORR"
        ));
    }

    #[test]
    fn test_extract_blank_parameter_is_an_error() {
        let series = series_with("T2M", &[("20100715", json!(30.0))]);

        assert!(matches!(
            extract_daily_series(&series, ""),
            Err(ClimatologyError::EmptyParameter)
        ));
        assert!(matches!(
            extract_daily_series(&series, "   "),
            Err(ClimatologyError::EmptyParameter)
        ));
    }

    #[test]
    fn test_extract_present_but_empty_parameter_is_ok() {
        let series = series_with("T2M", &[]);

        let readings = extract_daily_series(&series, "T2M").unwrap();

        assert!(readings.is_empty());
    }

    #[test]
    fn test_extract_output_is_chronological() {
        let series = series_with(
            "T2M",
            &[
                ("20101231", json!(1.0)),
                ("19810101", json!(2.0)),
                ("19950615", json!(3.0)),
            ],
        );

        let readings = extract_daily_series(&series, "T2M").unwrap();

        let dates: Vec<NaiveDate> = readings.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(1981, 1, 1), date(1995, 6, 15), date(2010, 12, 31)]
        );
    }
}
