//! Core library for the `asthma-risk` CLI.
//!
//! This crate defines:
//! - Configuration (API key, location, personal triggers)
//! - Abstraction over the weather / air-quality source
//! - Risk scoring and advice
//! - The report produced by one check
//!
//! It is used by `asthma-cli`, but can also be reused by other binaries or services.

pub mod advice;
pub mod config;
pub mod model;
pub mod provider;
pub mod report;
pub mod risk;

pub use advice::{RiskTier, Verdict, recommendations};
pub use config::{Config, ConfigError};
pub use model::{
    AirQualitySample, Location, RiskFactor, RiskResult, UserTriggers, WeatherReading,
};
pub use provider::{ConditionsProvider, provider_from_config};
pub use report::{LIMITED_DATA_NOTE, Report, assess};
pub use risk::calculate_risk;
