//! Static metric registry: display metadata and unit conversion per metric

use crate::types::MetricId;
use crate::units::{Conversion, KELVIN_OFFSET, MASS_RATIO_TO_MICROGRAMS, PASCALS_PER_HECTOPASCAL, UV_INDEX_SCALE};
use serde::Serialize;

/// Broad family a metric belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Weather,
    Pollutant,
    Pollen,
}

/// Catalog entry for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInfo {
    #[serde(rename = "metricType")]
    pub id: MetricId,
    pub display_name: &'static str,
    /// Display unit suffix ("°C", "µg/m³", "" for UV)
    pub unit: &'static str,
    pub kind: MetricKind,
    pub conversion: Conversion,
}

impl MetricInfo {
    /// Convert a native provider value to this metric's display unit
    pub fn to_display(&self, native: f64) -> f64 {
        self.conversion.apply(native)
    }
}

const fn entry(
    id: MetricId,
    display_name: &'static str,
    unit: &'static str,
    kind: MetricKind,
    conversion: Conversion,
) -> MetricInfo {
    MetricInfo {
        id,
        display_name,
        unit,
        kind,
        conversion,
    }
}

const GRAINS: &str = "grains/m³";

// Indexed by `MetricId as usize`; order must follow `MetricId::ALL`.
static CATALOG: [MetricInfo; 16] = [
    entry(MetricId::Uv, "UV Index", "", MetricKind::Weather, Conversion::scale(UV_INDEX_SCALE)),
    entry(
        MetricId::Temperature,
        "Temperature",
        "°C",
        MetricKind::Weather,
        Conversion::offset(-KELVIN_OFFSET),
    ),
    entry(
        MetricId::SurfacePressure,
        "Surface Pressure",
        "hPa",
        MetricKind::Weather,
        Conversion::scale(1.0 / PASCALS_PER_HECTOPASCAL),
    ),
    entry(
        MetricId::Pm25,
        "PM2.5",
        "µg/m³",
        MetricKind::Pollutant,
        Conversion::scale(MASS_RATIO_TO_MICROGRAMS),
    ),
    entry(MetricId::Pm10, "PM10", "µg/m³", MetricKind::Pollutant, Conversion::IDENTITY),
    entry(
        MetricId::No2,
        "Nitrogen Dioxide (NO₂)",
        "ppb",
        MetricKind::Pollutant,
        Conversion::IDENTITY,
    ),
    entry(MetricId::O3, "Ozone (O₃)", "ppb", MetricKind::Pollutant, Conversion::IDENTITY),
    entry(
        MetricId::Co,
        "Carbon Monoxide (CO)",
        "ppm",
        MetricKind::Pollutant,
        Conversion::IDENTITY,
    ),
    entry(
        MetricId::So2,
        "Sulfur Dioxide (SO₂)",
        "ppb",
        MetricKind::Pollutant,
        Conversion::IDENTITY,
    ),
    entry(
        MetricId::Nmvoc,
        "NMVOC Concentration",
        "ppm",
        MetricKind::Pollutant,
        Conversion::IDENTITY,
    ),
    entry(MetricId::AlderPollen, "Alder Pollen", GRAINS, MetricKind::Pollen, Conversion::IDENTITY),
    entry(MetricId::BirchPollen, "Birch Pollen", GRAINS, MetricKind::Pollen, Conversion::IDENTITY),
    entry(MetricId::GrassPollen, "Grass Pollen", GRAINS, MetricKind::Pollen, Conversion::IDENTITY),
    entry(
        MetricId::MugwortPollen,
        "Mugwort Pollen",
        GRAINS,
        MetricKind::Pollen,
        Conversion::IDENTITY,
    ),
    entry(MetricId::OlivePollen, "Olive Pollen", GRAINS, MetricKind::Pollen, Conversion::IDENTITY),
    entry(
        MetricId::RagweedPollen,
        "Ragweed Pollen",
        GRAINS,
        MetricKind::Pollen,
        Conversion::IDENTITY,
    ),
];

impl MetricId {
    /// Catalog entry for this metric
    pub fn info(self) -> &'static MetricInfo {
        &CATALOG[self as usize]
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn unit(self) -> &'static str {
        self.info().unit
    }

    pub fn kind(self) -> MetricKind {
        self.info().kind
    }
}

/// Full catalog in registration order
pub fn catalog() -> &'static [MetricInfo] {
    &CATALOG
}

/// Metrics of one kind, in registration order
pub fn metrics_of(kind: MetricKind) -> impl Iterator<Item = MetricId> {
    CATALOG.iter().filter(move |m| m.kind == kind).map(|m| m.id)
}
