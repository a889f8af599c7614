//! One-shot evaluation of all three indices over the same readings

use crate::aqi::{compute_aqi, AqiResult};
use crate::pollen::{compute_pollen_index, PollenResult};
use crate::risk::{assess_combined_risk, CombinedAssessment};
use crate::types::ReadingSet;
use serde::Serialize;

/// AQI, pollen and risk for one location and forecast hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentReport {
    pub aqi: AqiResult,
    pub pollen: PollenResult,
    pub risk: CombinedAssessment,
}

/// Each index is computed independently; none sees another's output
pub fn build_report(readings: &ReadingSet) -> EnvironmentReport {
    EnvironmentReport {
        aqi: compute_aqi(readings),
        pollen: compute_pollen_index(readings),
        risk: assess_combined_risk(readings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, MetricId, Reading};

    #[test]
    fn test_empty_report_is_renderable() {
        let report = build_report(&ReadingSet::new());

        assert_eq!(report.aqi.main_pollutant, "Unknown");
        assert_eq!(report.pollen.dominant_pollen, "None");
        assert_eq!(report.risk.risk_score, 0.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aqi"]["mainPollutant"], "Unknown");
        assert_eq!(json["pollen"]["dominantPollen"], "None");
        assert_eq!(json["risk"]["riskScore"], 0.0);
    }

    #[test]
    fn test_report_combines_indices() {
        let location = Location { lat: 44.43, lng: 26.1 };
        let readings: ReadingSet = [
            (MetricId::Pm25, 1.0e-8),
            (MetricId::BirchPollen, 120.0),
        ]
        .into_iter()
        .map(|(metric_type, value)| Reading {
            metric_type,
            value,
            forecast_hour: 2,
            location,
        })
        .collect();
        let report = build_report(&readings);

        assert_eq!(report.aqi.aqi, 42);
        assert_eq!(report.pollen.dominant_pollen, "Birch");
        assert_eq!(report.risk, CombinedAssessment::no_risk_data());
    }
}
