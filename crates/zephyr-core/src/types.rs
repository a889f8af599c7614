//! Core data types for forecast readings

use crate::units::UnitError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Hourly forecast slice index (0-23)
pub type ForecastHour = u8;

/// Highest forecast hour the provider serves
pub const MAX_FORECAST_HOUR: ForecastHour = 23;

/// Metric identifier as published by the data provider.
///
/// Declaration order is the catalog registration order and is used to break
/// ties deterministically (first registered wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricId {
    #[serde(rename = "uv")]
    Uv,
    #[serde(rename = "tm")]
    Temperature,
    #[serde(rename = "sp")]
    SurfacePressure,
    #[serde(rename = "pm2p5")]
    Pm25,
    #[serde(rename = "pm10_conc")]
    Pm10,
    #[serde(rename = "no2_conc")]
    No2,
    #[serde(rename = "o3_conc")]
    O3,
    #[serde(rename = "co_conc")]
    Co,
    #[serde(rename = "so2_conc")]
    So2,
    #[serde(rename = "nmvoc_conc")]
    Nmvoc,
    #[serde(rename = "apg_conc")]
    AlderPollen,
    #[serde(rename = "bpg_conc")]
    BirchPollen,
    #[serde(rename = "gpg_conc")]
    GrassPollen,
    #[serde(rename = "mpg_conc")]
    MugwortPollen,
    #[serde(rename = "opg_conc")]
    OlivePollen,
    #[serde(rename = "rwpg_conc")]
    RagweedPollen,
}

impl MetricId {
    /// Every metric, in catalog order
    pub const ALL: [MetricId; 16] = [
        MetricId::Uv,
        MetricId::Temperature,
        MetricId::SurfacePressure,
        MetricId::Pm25,
        MetricId::Pm10,
        MetricId::No2,
        MetricId::O3,
        MetricId::Co,
        MetricId::So2,
        MetricId::Nmvoc,
        MetricId::AlderPollen,
        MetricId::BirchPollen,
        MetricId::GrassPollen,
        MetricId::MugwortPollen,
        MetricId::OlivePollen,
        MetricId::RagweedPollen,
    ];

    /// Provider wire code (`pm2p5`, `tm`, ...)
    pub fn code(self) -> &'static str {
        match self {
            MetricId::Uv => "uv",
            MetricId::Temperature => "tm",
            MetricId::SurfacePressure => "sp",
            MetricId::Pm25 => "pm2p5",
            MetricId::Pm10 => "pm10_conc",
            MetricId::No2 => "no2_conc",
            MetricId::O3 => "o3_conc",
            MetricId::Co => "co_conc",
            MetricId::So2 => "so2_conc",
            MetricId::Nmvoc => "nmvoc_conc",
            MetricId::AlderPollen => "apg_conc",
            MetricId::BirchPollen => "bpg_conc",
            MetricId::GrassPollen => "gpg_conc",
            MetricId::MugwortPollen => "mpg_conc",
            MetricId::OlivePollen => "opg_conc",
            MetricId::RagweedPollen => "rwpg_conc",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MetricId {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricId::ALL
            .into_iter()
            .find(|id| id.code() == s)
            .ok_or_else(|| UnitError::UnknownMetric(s.to_string()))
    }
}

/// Invalid coordinate error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Latitude is not a number: {0}")]
    NonFiniteLatitude(f64),

    #[error("Longitude is not a number: {0}")]
    NonFiniteLongitude(f64),

    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
}

/// Geographic point (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Build a validated location
    pub fn new(lat: f64, lng: f64) -> Result<Self, LocationError> {
        let location = Self { lat, lng };
        location.validate()?;
        Ok(location)
    }

    /// Check that both coordinates are finite and in range
    pub fn validate(&self) -> Result<(), LocationError> {
        if !self.lat.is_finite() {
            return Err(LocationError::NonFiniteLatitude(self.lat));
        }
        if !self.lng.is_finite() {
            return Err(LocationError::NonFiniteLongitude(self.lng));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(LocationError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(LocationError::LongitudeOutOfRange(self.lng));
        }
        Ok(())
    }
}

/// A single provider reading in its native unit (K, Pa, mass ratio, ...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub metric_type: MetricId,

    /// Native-unit value
    pub value: f64,

    pub forecast_hour: ForecastHour,

    /// Grid point the provider resolved the query to
    pub location: Location,
}

/// Readings keyed by metric; at most one reading per metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSet {
    readings: HashMap<MetricId, Reading>,
}

impl ReadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, replacing any earlier reading for the same metric
    pub fn insert(&mut self, reading: Reading) {
        self.readings.insert(reading.metric_type, reading);
    }

    pub fn get(&self, metric: MetricId) -> Option<&Reading> {
        self.readings.get(&metric)
    }

    /// Native value, if a reading is present
    pub fn value(&self, metric: MetricId) -> Option<f64> {
        self.get(metric).map(|r| r.value)
    }

    /// Value converted to the catalog display unit; non-finite values count as absent
    pub fn display_value(&self, metric: MetricId) -> Option<f64> {
        self.value(metric)
            .map(|v| metric.info().to_display(v))
            .filter(|v| v.is_finite())
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Reading> + '_ {
        MetricId::ALL
            .iter()
            .filter_map(move |id| self.readings.get(id))
    }
}

impl FromIterator<Reading> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        let mut set = ReadingSet::new();
        for reading in iter {
            set.insert(reading);
        }
        set
    }
}

impl<'a> FromIterator<&'a Reading> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = &'a Reading>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
