//! Composite pollen index (0-10) and dominant species
//!
//! Species are measured on incompatible scales, so each one is classified
//! against its own thresholds and the dominant species is chosen by
//! potency relative to its own medium threshold.

use crate::breakpoints::{interpolate, POLLEN};
use crate::types::{MetricId, ReadingSet};
use serde::Serialize;
use std::fmt;

/// Dominant species reported when none qualifies
pub const NO_DOMINANT_POLLEN: &str = "None";

/// Ordinal severity tier of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Weight used by the composite index
    pub fn weight(self) -> u32 {
        match self {
            Severity::None => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

/// Per-species classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PollenThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl PollenThresholds {
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.high {
            Severity::High
        } else if value >= self.medium {
            Severity::Medium
        } else if value >= self.low {
            Severity::Low
        } else {
            Severity::None
        }
    }
}

/// Static description of one pollen species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollenSpecies {
    pub metric: MetricId,
    pub name: &'static str,
    pub thresholds: PollenThresholds,
}

const fn species(metric: MetricId, name: &'static str, low: f64, medium: f64, high: f64) -> PollenSpecies {
    PollenSpecies {
        metric,
        name,
        thresholds: PollenThresholds { low, medium, high },
    }
}

/// Species in catalog order
pub static SPECIES: [PollenSpecies; 6] = [
    species(MetricId::AlderPollen, "Alder", 0.05, 0.3, 1.0),
    species(MetricId::BirchPollen, "Birch", 30.0, 90.0, 500.0),
    species(MetricId::GrassPollen, "Grass", 0.1, 0.5, 2.0),
    species(MetricId::MugwortPollen, "Mugwort", 1e-12, 1e-10, 1e-8),
    species(MetricId::OlivePollen, "Olive", 0.0005, 0.005, 0.05),
    species(MetricId::RagweedPollen, "Ragweed", 1e-10, 1e-9, 1e-7),
];

/// Overall pollen level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PollenLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl PollenLevel {
    pub fn from_index(index: u8) -> Self {
        match index {
            7..=u8::MAX => PollenLevel::High,
            4..=6 => PollenLevel::Medium,
            1..=3 => PollenLevel::Low,
            0 => PollenLevel::Minimal,
        }
    }
}

impl fmt::Display for PollenLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PollenLevel::Minimal => "Minimal",
            PollenLevel::Low => "Low",
            PollenLevel::Medium => "Medium",
            PollenLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Classified reading of one species
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesReading {
    pub metric: MetricId,
    pub name: &'static str,
    pub value: f64,
    pub severity: Severity,
    pub unit: &'static str,
    /// Generic 0-500 pollen sub-index, `None` when outside the table
    pub sub_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenResult {
    /// 0-10
    pub index: u8,
    pub level: PollenLevel,
    pub dominant_pollen: String,
    pub species: Vec<SpeciesReading>,
}

/// Aggregate all present pollen readings.
///
/// Iterates species in catalog order regardless of how readings were
/// supplied, so the result does not depend on input order.
pub fn compute_pollen_index(readings: &ReadingSet) -> PollenResult {
    let mut classified = Vec::new();
    let mut dominant: Option<&PollenSpecies> = None;
    let mut dominant_ratio = 0.0;

    for sp in &SPECIES {
        let Some(value) = readings.value(sp.metric).filter(|v| v.is_finite()) else {
            continue;
        };

        let ratio = value / sp.thresholds.medium;
        if ratio > dominant_ratio {
            dominant_ratio = ratio;
            dominant = Some(sp);
        }

        classified.push(SpeciesReading {
            metric: sp.metric,
            name: sp.name,
            value,
            severity: sp.thresholds.classify(value),
            unit: sp.metric.unit(),
            sub_index: interpolate(value, &POLLEN),
        });
    }

    let index = normalized_index(&classified);

    PollenResult {
        index,
        level: PollenLevel::from_index(index),
        dominant_pollen: dominant
            .map(|sp| sp.name)
            .unwrap_or(NO_DOMINANT_POLLEN)
            .to_string(),
        species: classified,
    }
}

fn normalized_index(classified: &[SpeciesReading]) -> u8 {
    if classified.is_empty() {
        return 0;
    }
    let total: u32 = classified.iter().map(|s| s.severity.weight()).sum();
    let max = classified.len() as f64 * Severity::High.weight() as f64;
    (total as f64 / max * 10.0).round() as u8
}

/// Advice sentence for a pollen index
pub fn pollen_advice(index: u8) -> &'static str {
    match index {
        8..=u8::MAX => "Very high pollen levels. Consider staying indoors and using air purifiers if you have allergies.",
        6..=7 => "High pollen levels. Take medication before symptoms start and limit outdoor activities.",
        4..=5 => "Moderate pollen levels. Keep windows closed and monitor symptoms if you're sensitive.",
        2..=3 => "Low pollen levels. Generally favorable conditions for most allergy sufferers.",
        _ => "Very low pollen count today. Excellent conditions for outdoor activities.",
    }
}
