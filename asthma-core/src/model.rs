use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed place the report is produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: "Delhi".to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
        }
    }
}

/// Personal sensitivities of the user. Loaded once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTriggers {
    pub dust: bool,
    pub smoke: bool,
    /// Carried for completeness; the score does not depend on it.
    pub strong_perfumes: bool,
    pub running: bool,
}

impl UserTriggers {
    /// All triggers disabled.
    pub const fn none() -> Self {
        Self { dust: false, smoke: false, strong_perfumes: false, running: false }
    }

    pub fn airborne_irritants(&self) -> bool {
        self.dust || self.smoke
    }
}

impl Default for UserTriggers {
    fn default() -> Self {
        Self { dust: true, smoke: true, strong_perfumes: true, running: true }
    }
}

/// Current weather. Every field is optional; `Default` is the empty reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReading {
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none() && self.humidity_pct.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    /// PM2.5 concentration in µg/m³.
    pub pm2_5: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

/// A condition that raised the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    VeryHighPm25,
    ModeratePm25,
    HighHumidity,
    ColdAir,
    OutdoorExertion,
}

impl RiskFactor {
    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::VeryHighPm25 => "Very high PM2.5 (pollution)",
            RiskFactor::ModeratePm25 => "Moderate PM2.5 levels",
            RiskFactor::HighHumidity => "High humidity",
            RiskFactor::ColdAir => "Cold air exposure risk",
            RiskFactor::OutdoorExertion => "Outdoor exertion increases inhalation",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Always within `0..=100`.
    pub score: u8,
    /// In evaluation order.
    pub reasons: Vec<RiskFactor>,
}
