//! Piecewise-linear breakpoint interpolation
//!
//! A breakpoint table maps closed concentration intervals linearly onto
//! closed index intervals. Tables are static, ordered and non-overlapping.
//! A value that falls outside every interval (below, above, or in the gap
//! between two tiers) is unscored rather than zero.

use crate::types::MetricId;
use serde::Serialize;

/// Table construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BreakpointError {
    #[error("Empty breakpoint table")]
    Empty,

    #[error("Breakpoint {0} has a non-increasing concentration interval")]
    ZeroWidth(usize),

    #[error("Breakpoint {0} has a decreasing index interval")]
    DecreasingIndex(usize),

    #[error("Breakpoint {0} overlaps the previous breakpoint")]
    Overlap(usize),
}

/// One tier: `[concentration_low, concentration_high] -> [index_low, index_high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

impl Breakpoint {
    pub const fn new(c_low: f64, c_high: f64, i_low: f64, i_high: f64) -> Self {
        Self {
            concentration_low: c_low,
            concentration_high: c_high,
            index_low: i_low,
            index_high: i_high,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.concentration_low && value <= self.concentration_high
    }

    /// Linear map of `value` onto the index interval (unrounded)
    pub fn interpolate(&self, value: f64) -> f64 {
        (self.index_high - self.index_low) / (self.concentration_high - self.concentration_low)
            * (value - self.concentration_low)
            + self.index_low
    }
}

/// Index for `value`, rounded to the nearest integer, or `None` when no
/// tier contains it. A value on a boundary shared by two tiers belongs to
/// the lower tier.
pub fn interpolate(value: f64, table: &[Breakpoint]) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    table
        .iter()
        .find(|bp| bp.contains(value))
        .map(|bp| bp.interpolate(value).round() as u32)
}

/// Check the construction invariants of a table
pub fn validate_table(table: &[Breakpoint]) -> Result<(), BreakpointError> {
    if table.is_empty() {
        return Err(BreakpointError::Empty);
    }
    for (i, bp) in table.iter().enumerate() {
        if bp.concentration_high <= bp.concentration_low {
            return Err(BreakpointError::ZeroWidth(i));
        }
        if bp.index_high < bp.index_low {
            return Err(BreakpointError::DecreasingIndex(i));
        }
        if i > 0 && bp.concentration_low < table[i - 1].concentration_high {
            return Err(BreakpointError::Overlap(i));
        }
    }
    Ok(())
}

const fn bp(c_low: f64, c_high: f64, i_low: f64, i_high: f64) -> Breakpoint {
    Breakpoint::new(c_low, c_high, i_low, i_high)
}

/// PM2.5, µg/m³
pub static PM25: [Breakpoint; 7] = [
    bp(0.0, 12.0, 0.0, 50.0),
    bp(12.1, 35.4, 51.0, 100.0),
    bp(35.5, 55.4, 101.0, 150.0),
    bp(55.5, 150.4, 151.0, 200.0),
    bp(150.5, 250.4, 201.0, 300.0),
    bp(250.5, 350.4, 301.0, 400.0),
    bp(350.5, 500.4, 401.0, 500.0),
];

/// PM10, µg/m³
pub static PM10: [Breakpoint; 7] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 154.0, 51.0, 100.0),
    bp(155.0, 254.0, 101.0, 150.0),
    bp(255.0, 354.0, 151.0, 200.0),
    bp(355.0, 424.0, 201.0, 300.0),
    bp(425.0, 504.0, 301.0, 400.0),
    bp(505.0, 604.0, 401.0, 500.0),
];

/// NO2, ppb
pub static NO2: [Breakpoint; 7] = [
    bp(0.0, 53.0, 0.0, 50.0),
    bp(54.0, 100.0, 51.0, 100.0),
    bp(101.0, 360.0, 101.0, 150.0),
    bp(361.0, 649.0, 151.0, 200.0),
    bp(650.0, 1249.0, 201.0, 300.0),
    bp(1250.0, 1649.0, 301.0, 400.0),
    bp(1650.0, 2049.0, 401.0, 500.0),
];

/// O3, ppb (8-hour)
pub static O3: [Breakpoint; 7] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 70.0, 51.0, 100.0),
    bp(71.0, 85.0, 101.0, 150.0),
    bp(86.0, 105.0, 151.0, 200.0),
    bp(106.0, 200.0, 201.0, 300.0),
    bp(201.0, 404.0, 301.0, 400.0),
    bp(405.0, 604.0, 401.0, 500.0),
];

/// CO, ppm
pub static CO: [Breakpoint; 7] = [
    bp(0.0, 4.4, 0.0, 50.0),
    bp(4.5, 9.4, 51.0, 100.0),
    bp(9.5, 12.4, 101.0, 150.0),
    bp(12.5, 15.4, 151.0, 200.0),
    bp(15.5, 30.4, 201.0, 300.0),
    bp(30.5, 40.4, 301.0, 400.0),
    bp(40.5, 50.4, 401.0, 500.0),
];

/// SO2, ppb
pub static SO2: [Breakpoint; 7] = [
    bp(0.0, 35.0, 0.0, 50.0),
    bp(36.0, 75.0, 51.0, 100.0),
    bp(76.0, 185.0, 101.0, 150.0),
    bp(186.0, 304.0, 151.0, 200.0),
    bp(305.0, 604.0, 201.0, 300.0),
    bp(605.0, 804.0, 301.0, 400.0),
    bp(805.0, 1004.0, 401.0, 500.0),
];

/// Generic pollen sub-index, grains/m³. Not a regulatory scale.
pub static POLLEN: [Breakpoint; 5] = [
    bp(0.0, 15.0, 0.0, 50.0),
    bp(16.0, 90.0, 51.0, 100.0),
    bp(91.0, 150.0, 101.0, 150.0),
    bp(151.0, 300.0, 151.0, 200.0),
    bp(301.0, 500.0, 201.0, 300.0),
];

/// AQI table for a pollutant, if it has one
pub fn aqi_table(metric: MetricId) -> Option<&'static [Breakpoint]> {
    match metric {
        MetricId::Pm25 => Some(&PM25[..]),
        MetricId::Pm10 => Some(&PM10[..]),
        MetricId::No2 => Some(&NO2[..]),
        MetricId::O3 => Some(&O3[..]),
        MetricId::Co => Some(&CO[..]),
        MetricId::So2 => Some(&SO2[..]),
        _ => None,
    }
}
