//! Composite Air Quality Index: worst scorable pollutant wins

use crate::breakpoints::{aqi_table, interpolate};
use crate::catalog::{metrics_of, MetricKind};
use crate::types::{MetricId, ReadingSet};
use crate::units::truncate_decimals;
use serde::Serialize;

/// Display name reported when no pollutant is scorable
pub const UNKNOWN_POLLUTANT: &str = "Unknown";

/// Index of a single pollutant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantScore {
    pub metric: MetricId,
    pub index: u32,
    /// Value in the breakpoint table's unit, truncated to 2 decimals
    pub value: f64,
}

/// Composite AQI with its dominant pollutant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiResult {
    pub aqi: u32,
    pub main_pollutant: String,
    pub value: f64,
    pub unit: String,
}

impl AqiResult {
    /// Renderable "no data" result
    pub fn no_data() -> Self {
        Self {
            aqi: 0,
            main_pollutant: UNKNOWN_POLLUTANT.to_string(),
            value: 0.0,
            unit: String::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.main_pollutant != UNKNOWN_POLLUTANT
    }
}

/// Score one pollutant; `None` if absent, tableless or out of table
pub fn score_pollutant(readings: &ReadingSet, metric: MetricId) -> Option<PollutantScore> {
    let table = aqi_table(metric)?;
    let scaled = readings.display_value(metric)?;
    let index = interpolate(scaled, table)?;
    Some(PollutantScore {
        metric,
        index,
        value: truncate_decimals(scaled, 2),
    })
}

/// Every scorable pollutant, in catalog order
pub fn pollutant_scores(readings: &ReadingSet) -> Vec<PollutantScore> {
    metrics_of(MetricKind::Pollutant)
        .filter_map(|metric| score_pollutant(readings, metric))
        .collect()
}

/// Composite AQI over all scorable pollutants.
///
/// The highest index wins; on a tie the pollutant registered first in the
/// catalog is reported.
pub fn compute_aqi(readings: &ReadingSet) -> AqiResult {
    let worst = pollutant_scores(readings)
        .into_iter()
        .fold(None::<PollutantScore>, |best, score| match best {
            Some(b) if b.index >= score.index => Some(b),
            _ => Some(score),
        });

    match worst {
        Some(score) => {
            let info = score.metric.info();
            AqiResult {
                aqi: score.index,
                main_pollutant: info.display_name.to_string(),
                value: score.value,
                unit: info.unit.to_string(),
            }
        }
        None => AqiResult::no_data(),
    }
}

/// EPA category label for an AQI value
pub fn aqi_category(aqi: u32) -> &'static str {
    match aqi {
        0..=50 => "Good",
        51..=100 => "Moderate",
        101..=150 => "Unhealthy for Sensitive Groups",
        151..=200 => "Unhealthy",
        201..=300 => "Very Unhealthy",
        _ => "Hazardous",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Reading};

    fn reading(metric: MetricId, value: f64) -> Reading {
        Reading {
            metric_type: metric,
            value,
            forecast_hour: 0,
            location: Location { lat: 44.43, lng: 26.1 },
        }
    }

    fn set(readings: &[(MetricId, f64)]) -> ReadingSet {
        readings.iter().map(|&(m, v)| reading(m, v)).collect()
    }

    #[test]
    fn test_pm25_only() {
        // 10 µg/m³ expressed as a mass ratio
        let result = compute_aqi(&set(&[(MetricId::Pm25, 1.0e-8)]));

        assert_eq!(result.aqi, 42);
        assert_eq!(result.main_pollutant, "PM2.5");
        assert_eq!(result.value, 10.0);
        assert_eq!(result.unit, "µg/m³");
    }

    #[test]
    fn test_worst_pollutant_wins() {
        let readings = set(&[
            (MetricId::Pm25, 1.0e-8),  // 42
            (MetricId::No2, 120.0),    // 105
            (MetricId::So2, 50.0),     // 69
            (MetricId::GrassPollen, 400.0),
        ]);
        let result = compute_aqi(&readings);

        let max = pollutant_scores(&readings)
            .iter()
            .map(|s| s.index)
            .max()
            .unwrap();
        assert_eq!(result.aqi, max);
        assert_eq!(result.main_pollutant, "Nitrogen Dioxide (NO₂)");
        assert_eq!(result.unit, "ppb");
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        // PM10 54 -> 50 and SO2 35 -> 50; PM10 is registered first
        let result = compute_aqi(&set(&[(MetricId::So2, 35.0), (MetricId::Pm10, 54.0)]));

        assert_eq!(result.aqi, 50);
        assert_eq!(result.main_pollutant, "PM10");
    }

    #[test]
    fn test_out_of_table_is_excluded() {
        let readings = set(&[(MetricId::Co, 99.0), (MetricId::O3, 30.0)]);
        let scores = pollutant_scores(&readings);

        assert_eq!(scores.len(), 1);
        assert_eq!(compute_aqi(&readings).main_pollutant, "Ozone (O₃)");
    }

    #[test]
    fn test_ozone_scored_in_catalog_unit() {
        // 50 / 54 * 40 = 37.04
        let result = compute_aqi(&set(&[(MetricId::O3, 40.0)]));

        assert_eq!(result.aqi, 37);
        assert_eq!(result.main_pollutant, "Ozone (O₃)");
        assert_eq!(result.value, 40.0);
        assert_eq!(result.unit, MetricId::O3.unit());
        assert_eq!(result.unit, "ppb");
    }

    #[test]
    fn test_no_data_sentinel() {
        let result = compute_aqi(&ReadingSet::new());
        assert_eq!(result, AqiResult::no_data());
        assert_eq!(result.aqi, 0);
        assert_eq!(result.main_pollutant, "Unknown");
        assert!(!result.has_data());

        // only unscorable input
        let result = compute_aqi(&set(&[(MetricId::Pm25, 1.0)]));
        assert_eq!(result, AqiResult::no_data());
    }

    #[test]
    fn test_scaled_value_truncates() {
        // 15.678 µg/m³ is reported as 15.67, not 15.68
        let result = compute_aqi(&set(&[(MetricId::Pm25, 15.678e-9)]));
        assert_eq!(result.value, 15.67);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(aqi_category(42), "Good");
        assert_eq!(aqi_category(104), "Unhealthy for Sensitive Groups");
        assert_eq!(aqi_category(450), "Hazardous");
    }
}
