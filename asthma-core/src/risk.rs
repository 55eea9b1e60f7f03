//! Asthma risk scoring.
//!
//! The score is additive over fixed thresholds, then scaled by the user's
//! personal triggers:
//!
//! | condition               | effect  |
//! |-------------------------|---------|
//! | PM2.5 > 60 µg/m³        | +40     |
//! | 35 < PM2.5 ≤ 60 µg/m³   | +25     |
//! | humidity > 70 %         | +15     |
//! | temperature < 15 °C     | +10     |
//! | dust or smoke trigger   | × 1.2   |
//! | running trigger         | × 1.15  |

use crate::model::{AirQualitySample, RiskFactor, RiskResult, UserTriggers, WeatherReading};

pub const PM25_VERY_HIGH: f64 = 60.0;
pub const PM25_MODERATE: f64 = 35.0;
pub const HUMIDITY_HIGH_PCT: f64 = 70.0;
pub const COLD_AIR_C: f64 = 15.0;

const PM25_VERY_HIGH_POINTS: f64 = 40.0;
const PM25_MODERATE_POINTS: f64 = 25.0;
const HUMIDITY_POINTS: f64 = 15.0;
const COLD_AIR_POINTS: f64 = 10.0;

pub const IRRITANT_MULTIPLIER: f64 = 1.2;
pub const EXERTION_MULTIPLIER: f64 = 1.15;

pub const MAX_SCORE: u8 = 100;

/// Combine weather, air quality and the user's triggers into a bounded score.
///
/// Missing readings never add risk. A missing air-quality sample, or one
/// without a PM2.5 value, scores as 0 µg/m³.
pub fn calculate_risk(
    weather: &WeatherReading,
    air_quality: Option<&AirQualitySample>,
    triggers: &UserTriggers,
) -> RiskResult {
    let mut risk = 0.0;
    let mut reasons = Vec::new();

    let pm2_5 = air_quality.and_then(|sample| sample.pm2_5).unwrap_or(0.0);

    if pm2_5 > PM25_VERY_HIGH {
        risk += PM25_VERY_HIGH_POINTS;
        reasons.push(RiskFactor::VeryHighPm25);
    } else if pm2_5 > PM25_MODERATE {
        risk += PM25_MODERATE_POINTS;
        reasons.push(RiskFactor::ModeratePm25);
    }

    if weather.humidity_pct.is_some_and(|h| h > HUMIDITY_HIGH_PCT) {
        risk += HUMIDITY_POINTS;
        reasons.push(RiskFactor::HighHumidity);
    }

    if weather.temperature_c.is_some_and(|t| t < COLD_AIR_C) {
        risk += COLD_AIR_POINTS;
        reasons.push(RiskFactor::ColdAir);
    }

    if triggers.airborne_irritants() {
        risk *= IRRITANT_MULTIPLIER;
    }

    if triggers.running {
        risk *= EXERTION_MULTIPLIER;
        reasons.push(RiskFactor::OutdoorExertion);
    }

    RiskResult { score: clamp_score(risk), reasons }
}

fn clamp_score(risk: f64) -> u8 {
    // `as` saturates, so negative or NaN inputs land on 0.
    risk.trunc().min(f64::from(MAX_SCORE)) as u8
}
