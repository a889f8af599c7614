//! Provider JSON format
//!
//! The provider answers with an array of forecast records:
//!
//! ```json
//! [{"id": 7, "point": {"id": 3, "forecastHour": 1, "latitude": 44.43,
//!   "longitude": 26.1}, "metricType": "pm2p5", "value": 1.2e-8, "status": 0}]
//! ```

use crate::{FetchError, FetchResult};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zephyr_core::{Location, MetricId, Reading};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPointDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub forecast_hour: i64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub point: ForecastPointDto,
    pub metric_type: String,
    pub value: f64,
    /// Provider status code, unused by the domain
    #[serde(default)]
    pub status: Option<i64>,
}

impl ForecastRecord {
    /// Domain reading, or `None` for a metric or hour this system does not know
    pub fn into_reading(self) -> Option<Reading> {
        let metric_type: MetricId = self.metric_type.parse().ok()?;
        let forecast_hour = u8::try_from(self.point.forecast_hour).ok()?;
        Some(Reading {
            metric_type,
            value: self.value,
            forecast_hour,
            location: Location {
                lat: self.point.latitude,
                lng: self.point.longitude,
            },
        })
    }
}

/// Decode a provider response body, skipping unrecognised records
pub fn parse_readings(body: &[u8]) -> FetchResult<Vec<Reading>> {
    let records: Vec<ForecastRecord> =
        serde_json::from_slice(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

    let total = records.len();
    let readings: Vec<Reading> = records
        .into_iter()
        .filter_map(|record| {
            let metric = record.metric_type.clone();
            let reading = record.into_reading();
            if reading.is_none() {
                warn!(metric_type = %metric, "skipping unrecognised forecast record");
            }
            reading
        })
        .collect();

    if readings.len() < total {
        warn!(skipped = total - readings.len(), total, "forecast response partially decoded");
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let body = br#"[
            {"id": 1, "point": {"id": 9, "forecastHour": 2, "latitude": 44.43, "longitude": 26.1},
             "metricType": "pm2p5", "value": 1.2e-8, "status": 0},
            {"id": 2, "point": {"id": 9, "forecastHour": 2, "latitude": 44.43, "longitude": 26.1},
             "metricType": "tm", "value": 290.15, "status": 0}
        ]"#;
        let readings = parse_readings(body).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].metric_type, MetricId::Pm25);
        assert_eq!(readings[0].forecast_hour, 2);
        assert_eq!(readings[0].location, Location { lat: 44.43, lng: 26.1 });
        assert_eq!(readings[1].metric_type, MetricId::Temperature);
    }

    #[test]
    fn test_unknown_metric_is_skipped() {
        let body = br#"[
            {"point": {"forecastHour": 0, "latitude": 1.0, "longitude": 2.0},
             "metricType": "dust_conc", "value": 3.0},
            {"point": {"forecastHour": 0, "latitude": 1.0, "longitude": 2.0},
             "metricType": "uv", "value": 0.1}
        ]"#;
        let readings = parse_readings(body).unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].metric_type, MetricId::Uv);
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_readings(b"{\"error\": true}"),
            Err(FetchError::InvalidResponse(_))
        ));
        assert!(parse_readings(b"[]").unwrap().is_empty());
    }
}
