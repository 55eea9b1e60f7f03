//! Turns a risk score into advice.

use std::fmt;

const LOW_RISK_ADVICE: &[&str] = &["Outdoor activity is generally safe", "Carry inhaler as precaution"];

const MODERATE_RISK_ADVICE: &[&str] = &[
    "Limit outdoor exposure",
    "Avoid running outdoors",
    "Wear a mask if stepping out",
    "Drink warm fluids",
];

const HIGH_RISK_ADVICE: &[&str] = &[
    "Avoid outdoor activity",
    "Wear a mask if unavoidable",
    "Avoid exercise",
    "Keep rescue inhaler accessible",
    "Stay indoors with windows closed",
];

/// Lowest score of the moderate tier.
pub const MODERATE_FROM: u8 = 30;
/// Lowest score of the high tier.
pub const HIGH_FROM: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        if score < MODERATE_FROM {
            RiskTier::Low
        } else if score < HIGH_FROM {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            RiskTier::Low => LOW_RISK_ADVICE,
            RiskTier::Moderate => MODERATE_RISK_ADVICE,
            RiskTier::High => HIGH_RISK_ADVICE,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        })
    }
}

/// Ordered advice for a score.
pub fn recommendations(score: u8) -> &'static [&'static str] {
    RiskTier::from_score(score).advice()
}

/// Final go / no-go call printed at the end of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Avoid,
    ProceedWithPrecautions,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_FROM { Verdict::Avoid } else { Verdict::ProceedWithPrecautions }
    }
}
