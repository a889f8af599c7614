//! Unit conversion utilities
//!
//! Provider readings arrive in SI/native units (K, Pa, fractional mass
//! ratio). Everything user-facing and every threshold table works in
//! display units (°C, hPa, µg/m³, UV index).

use serde::Serialize;

/// Unit conversion error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown metric type: {0}")]
    UnknownMetric(String),
}

/// Kelvin offset for °C
pub const KELVIN_OFFSET: f64 = 273.15;

/// Pa per hPa
pub const PASCALS_PER_HECTOPASCAL: f64 = 100.0;

/// Fractional mass ratio (kg/kg ~ kg/m³ at surface) to µg/m³.
///
/// The only PM2.5 factor used anywhere in the workspace.
pub const MASS_RATIO_TO_MICROGRAMS: f64 = 1e9;

/// Provider UV flux to UV index: `uv * 2 / 0.025`
pub const UV_INDEX_SCALE: f64 = 2.0 / 0.025;

/// Affine native -> display conversion: `value * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    pub scale: f64,
    pub offset: f64,
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion::scale(1.0);

    pub const fn scale(scale: f64) -> Self {
        Self { scale, offset: 0.0 }
    }

    pub const fn offset(offset: f64) -> Self {
        Self { scale: 1.0, offset }
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn pascals_to_hectopascals(pascals: f64) -> f64 {
    pascals / PASCALS_PER_HECTOPASCAL
}

pub fn mass_ratio_to_micrograms(ratio: f64) -> f64 {
    ratio * MASS_RATIO_TO_MICROGRAMS
}

/// Whole-number UV index; negative or NaN input reads as 0
pub fn uv_to_index(uv: f64) -> f64 {
    if uv.is_nan() || uv < 0.0 {
        return 0.0;
    }
    (uv * UV_INDEX_SCALE).round()
}

/// Truncate (not round) to `decimals` places
pub fn truncate_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    // absorb representation noise from unit scaling (9.999999999998 -> 10)
    let scaled = (value * factor * 1e6).round() / 1e6;
    scaled.trunc() / factor
}
