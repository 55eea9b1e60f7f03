use anyhow::Result;
use tracing::debug;

use crate::{
    advice::{self, RiskTier, Verdict},
    model::{AirQualitySample, Location, RiskResult, UserTriggers, WeatherReading},
    provider::ConditionsProvider,
    risk::calculate_risk,
};

/// Shown in place of reasons when nothing raised the score.
pub const LIMITED_DATA_NOTE: &str = "Limited data available, conservative estimate applied";

/// Everything needed to present one risk check.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location: Location,
    pub weather: WeatherReading,
    pub air_quality: Option<AirQualitySample>,
    pub risk: RiskResult,
}

impl Report {
    pub fn temperature_c(&self) -> Option<f64> {
        self.weather.temperature_c
    }

    pub fn humidity_pct(&self) -> Option<f64> {
        self.weather.humidity_pct
    }

    pub fn pm2_5(&self) -> Option<f64> {
        self.air_quality.and_then(|sample| sample.pm2_5)
    }

    /// Reasons for the score, or the fallback note when there are none.
    pub fn reason_lines(&self) -> Vec<String> {
        if self.risk.reasons.is_empty() {
            vec![LIMITED_DATA_NOTE.to_string()]
        } else {
            self.risk.reasons.iter().map(ToString::to_string).collect()
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        advice::recommendations(self.risk.score)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.risk.score)
    }
}

/// Fetch weather, then air quality, and score them.
pub async fn assess(
    provider: &dyn ConditionsProvider,
    location: &Location,
    triggers: &UserTriggers,
) -> Result<Report> {
    let weather = provider.fetch_weather().await?;
    debug!(?weather, empty = weather.is_empty(), "weather fetched");

    let air_quality = provider.fetch_air_quality().await?;
    debug!(?air_quality, "air quality fetched");

    let risk = calculate_risk(&weather, air_quality.as_ref(), triggers);
    debug!(score = risk.score, tier = %RiskTier::from_score(risk.score), "risk calculated");

    Ok(Report { location: location.clone(), weather, air_quality, risk })
}
