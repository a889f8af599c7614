//! Combined health-risk assessment
//!
//! A fixed, ordered list of pure rules is evaluated against temperature,
//! UV, PM2.5 and pressure (in display units). Triggered rules contribute a
//! score, a message and recommendations; compound rules fire only when
//! their single-factor conditions both hold.

use crate::types::{MetricId, ReadingSet};
use crate::units::uv_to_index;
use serde::Serialize;

pub const SEASONAL_TEMPERATURE_C: f64 = 10.0;
pub const SEASONAL_TEMPERATURE_BAND_C: f64 = 5.0;
pub const EXTREME_HEAT_C: f64 = 35.0;
pub const HIGH_HEAT_C: f64 = 30.0;
pub const FREEZING_C: f64 = 0.0;

pub const UV_EXTREME: f64 = 11.0;
pub const UV_VERY_HIGH: f64 = 8.0;
pub const UV_HIGH: f64 = 6.0;
pub const UV_MODERATE: f64 = 3.0;

/// µg/m³
pub const PM25_UNHEALTHY: f64 = 35.5;
pub const PM25_MODERATE: f64 = 12.1;
pub const PM25_ELEVATED: f64 = 10.0;

pub const SEASONAL_PRESSURE_HPA: f64 = 1013.25;
pub const PRESSURE_MAJOR_SHIFT_HPA: f64 = 15.0;
pub const PRESSURE_SHIFT_HPA: f64 = 8.0;

pub const RISK_SCORE_MULTIPLIER: f64 = 1.5;
pub const MAX_RISK_SCORE: f64 = 10.0;

pub const NO_RISK_DATA_MESSAGE: &str = "No risk data available for this location and hour.";
pub const MINIMAL_RISK_MESSAGE: &str =
    "Today's weather poses minimal health risks. Stay safe and enjoy your day!";

const STAY_HYDRATED: &str = "Stay hydrated and drink water regularly.";
const AVOID_MIDDAY: &str = "Avoid outdoor activity between 11:00 and 16:00.";
const LIMIT_EXERTION: &str = "Limit prolonged outdoor exertion.";
const CHECK_VULNERABLE: &str = "Check on elderly and vulnerable people.";
const DRESS_WARM: &str = "Dress in warm layers and cover extremities.";
const DRESS_FOR_CHANGE: &str = "Dress for the unusual temperature.";
const SUNSCREEN: &str = "Apply SPF 30+ sunscreen.";
const SUNGLASSES_HAT: &str = "Wear sunglasses and a wide-brimmed hat.";
const SEEK_SHADE: &str = "Seek shade during midday hours.";
const WEAR_MASK: &str = "Wear a well-fitted mask (N95/FFP2) outdoors.";
const CLOSE_WINDOWS: &str = "Keep windows closed and use an air purifier if available.";
const SENSITIVE_REDUCE: &str = "Sensitive groups should reduce outdoor exposure.";
const KEEP_INHALER: &str = "Keep asthma medication at hand.";
const PLAN_REST: &str = "People prone to migraines or joint pain should plan for rest.";

/// Identifier of a triggered rule outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFactorId {
    ExtremeHeat,
    HighHeat,
    Cold,
    UnseasonalTemperature,
    ExtremeUv,
    VeryHighUv,
    HighUv,
    ModerateUv,
    UnhealthyPm25,
    ModeratePm25,
    ElevatedPm25,
    MajorPressureShift,
    PressureShift,
    HeatPollution,
    UvHeat,
}

impl RiskFactorId {
    pub fn title(self) -> &'static str {
        match self {
            RiskFactorId::ExtremeHeat => "Extreme Heat",
            RiskFactorId::HighHeat => "High Heat",
            RiskFactorId::Cold => "Cold",
            RiskFactorId::UnseasonalTemperature => "Unseasonal Temperature",
            RiskFactorId::ExtremeUv => "Extreme UV",
            RiskFactorId::VeryHighUv => "Very High UV",
            RiskFactorId::HighUv => "High UV",
            RiskFactorId::ModerateUv => "Moderate UV",
            RiskFactorId::UnhealthyPm25 => "Unhealthy PM2.5",
            RiskFactorId::ModeratePm25 => "Moderate PM2.5",
            RiskFactorId::ElevatedPm25 => "Elevated PM2.5",
            RiskFactorId::MajorPressureShift => "Major Pressure Shift",
            RiskFactorId::PressureShift => "Pressure Shift",
            RiskFactorId::HeatPollution => "Heat and Pollution",
            RiskFactorId::UvHeat => "UV and Heat",
        }
    }
}

/// Outcome of one triggered rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub id: RiskFactorId,
    pub message: String,
    pub score: f64,
    pub recommendations: Vec<String>,
}

impl RiskFactor {
    fn new(id: RiskFactorId, score: f64, detail: String, recommendations: &[&str]) -> Self {
        Self {
            id,
            message: format!("{}: {}", id.title(), detail),
            score,
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Rule inputs in display units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    pub temperature_c: f64,
    pub uv_index: f64,
    pub pm25: f64,
    pub pressure_hpa: f64,
}

impl RiskInputs {
    /// `None` if any of the four readings is missing or not finite
    pub fn from_readings(readings: &ReadingSet) -> Option<Self> {
        let uv = readings.value(MetricId::Uv).filter(|v| v.is_finite())?;
        Some(Self {
            temperature_c: readings.display_value(MetricId::Temperature)?,
            uv_index: uv_to_index(uv),
            pm25: readings.display_value(MetricId::Pm25)?,
            pressure_hpa: readings.display_value(MetricId::SurfacePressure)?,
        })
    }

    fn is_hot(&self) -> bool {
        self.temperature_c >= HIGH_HEAT_C
    }

    fn is_polluted(&self) -> bool {
        self.pm25 >= PM25_MODERATE
    }

    fn is_strong_sun(&self) -> bool {
        self.uv_index >= UV_VERY_HIGH
    }
}

/// A single risk rule
pub type RiskRule = fn(&RiskInputs) -> Option<RiskFactor>;

/// Rules in evaluation order
pub const RULES: [RiskRule; 6] = [
    temperature_rule,
    uv_rule,
    pm25_rule,
    pressure_rule,
    heat_pollution_rule,
    uv_heat_rule,
];

pub fn temperature_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    let t = inputs.temperature_c;
    if t >= EXTREME_HEAT_C {
        return Some(RiskFactor::new(
            RiskFactorId::ExtremeHeat,
            3.0,
            format!("{t:.1}°C is dangerously hot."),
            &[STAY_HYDRATED, AVOID_MIDDAY, LIMIT_EXERTION, CHECK_VULNERABLE],
        ));
    }
    if t >= HIGH_HEAT_C {
        return Some(RiskFactor::new(
            RiskFactorId::HighHeat,
            2.0,
            format!("{t:.1}°C is well above comfortable levels."),
            &[STAY_HYDRATED, AVOID_MIDDAY],
        ));
    }
    if t <= FREEZING_C {
        return Some(RiskFactor::new(
            RiskFactorId::Cold,
            2.0,
            format!("{t:.1}°C is at or below freezing."),
            &[DRESS_WARM, CHECK_VULNERABLE],
        ));
    }
    let deviation = t - SEASONAL_TEMPERATURE_C;
    if deviation.abs() > SEASONAL_TEMPERATURE_BAND_C {
        let direction = if deviation > 0.0 { "hotter" } else { "colder" };
        return Some(RiskFactor::new(
            RiskFactorId::UnseasonalTemperature,
            1.0,
            format!("it's {direction} than usual by about {:.1}°C.", deviation.abs()),
            &[DRESS_FOR_CHANGE],
        ));
    }
    None
}

pub fn uv_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    let uv = inputs.uv_index;
    let detail = format!("UV index {uv:.0}. Skin protection is advised.");
    if uv >= UV_EXTREME {
        Some(RiskFactor::new(
            RiskFactorId::ExtremeUv,
            3.0,
            detail,
            &[SUNSCREEN, SUNGLASSES_HAT, SEEK_SHADE, AVOID_MIDDAY],
        ))
    } else if uv >= UV_VERY_HIGH {
        Some(RiskFactor::new(
            RiskFactorId::VeryHighUv,
            2.0,
            detail,
            &[SUNSCREEN, SUNGLASSES_HAT, SEEK_SHADE],
        ))
    } else if uv >= UV_HIGH {
        Some(RiskFactor::new(
            RiskFactorId::HighUv,
            1.0,
            detail,
            &[SUNSCREEN, SUNGLASSES_HAT],
        ))
    } else if uv >= UV_MODERATE {
        Some(RiskFactor::new(RiskFactorId::ModerateUv, 0.5, detail, &[SUNSCREEN]))
    } else {
        None
    }
}

pub fn pm25_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    let pm = inputs.pm25;
    let detail = format!("fine particles at {pm:.1} µg/m³.");
    if pm >= PM25_UNHEALTHY {
        Some(RiskFactor::new(
            RiskFactorId::UnhealthyPm25,
            3.0,
            detail,
            &[LIMIT_EXERTION, WEAR_MASK, CLOSE_WINDOWS],
        ))
    } else if pm >= PM25_MODERATE {
        Some(RiskFactor::new(RiskFactorId::ModeratePm25, 1.0, detail, &[SENSITIVE_REDUCE]))
    } else if pm > PM25_ELEVATED {
        Some(RiskFactor::new(RiskFactorId::ElevatedPm25, 0.5, detail, &[SENSITIVE_REDUCE]))
    } else {
        None
    }
}

pub fn pressure_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    let deviation = inputs.pressure_hpa - SEASONAL_PRESSURE_HPA;
    let direction = if deviation > 0.0 { "above" } else { "below" };
    let detail = format!(
        "pressure is {:.1} hPa {direction} the seasonal normal.",
        deviation.abs()
    );
    if deviation.abs() > PRESSURE_MAJOR_SHIFT_HPA {
        Some(RiskFactor::new(
            RiskFactorId::MajorPressureShift,
            2.0,
            detail,
            &[PLAN_REST, STAY_HYDRATED],
        ))
    } else if deviation.abs() > PRESSURE_SHIFT_HPA {
        Some(RiskFactor::new(RiskFactorId::PressureShift, 1.0, detail, &[PLAN_REST]))
    } else {
        None
    }
}

pub fn heat_pollution_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    if !(inputs.is_hot() && inputs.is_polluted()) {
        return None;
    }
    Some(RiskFactor::new(
        RiskFactorId::HeatPollution,
        2.0,
        "high heat and air pollution may worsen symptoms for asthmatics or people with respiratory conditions."
            .to_string(),
        &[KEEP_INHALER, LIMIT_EXERTION, STAY_HYDRATED],
    ))
}

pub fn uv_heat_rule(inputs: &RiskInputs) -> Option<RiskFactor> {
    if !(inputs.is_hot() && inputs.is_strong_sun()) {
        return None;
    }
    Some(RiskFactor::new(
        RiskFactorId::UvHeat,
        1.0,
        "strong sun combined with heat raises the risk of sunburn and heat exhaustion.".to_string(),
        &[SEEK_SHADE, STAY_HYDRATED],
    ))
}

/// Coarse label for a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            RiskLevel::High
        } else if score >= 2.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Combined result of all triggered rules
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAssessment {
    pub message: String,
    /// 0-10
    pub risk_score: f64,
    pub level: RiskLevel,
    /// Deduplicated, first occurrence wins
    pub recommendations: Vec<String>,
    /// Triggered rules in evaluation order
    pub factors: Vec<RiskFactorId>,
}

impl CombinedAssessment {
    fn sentinel(message: &str) -> Self {
        Self {
            message: message.to_string(),
            risk_score: 0.0,
            level: RiskLevel::Low,
            recommendations: Vec::new(),
            factors: Vec::new(),
        }
    }

    pub fn no_risk_data() -> Self {
        Self::sentinel(NO_RISK_DATA_MESSAGE)
    }
}

/// Evaluate every rule against prepared inputs
pub fn assess(inputs: &RiskInputs) -> CombinedAssessment {
    let factors: Vec<RiskFactor> = RULES.iter().filter_map(|rule| rule(inputs)).collect();
    if factors.is_empty() {
        return CombinedAssessment::sentinel(MINIMAL_RISK_MESSAGE);
    }

    let total: f64 = factors.iter().map(|f| f.score).sum();
    let risk_score = (total * RISK_SCORE_MULTIPLIER).clamp(0.0, MAX_RISK_SCORE);

    let message = factors
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut recommendations: Vec<String> = Vec::new();
    for rec in factors.iter().flat_map(|f| f.recommendations.iter()) {
        if !recommendations.contains(rec) {
            recommendations.push(rec.clone());
        }
    }

    CombinedAssessment {
        message,
        risk_score,
        level: RiskLevel::from_score(risk_score),
        recommendations,
        factors: factors.iter().map(|f| f.id).collect(),
    }
}

/// Assess the readings; degrades to the "no risk data" sentinel when any
/// required reading is missing or not a number.
pub fn assess_combined_risk(readings: &ReadingSet) -> CombinedAssessment {
    match RiskInputs::from_readings(readings) {
        Some(inputs) => assess(&inputs),
        None => CombinedAssessment::no_risk_data(),
    }
}
