//! Plain-text rendering of a [`Report`].

use asthma_core::{Report, Verdict};
use std::fmt::Write;

const MISSING: &str = "N/A";

fn reading(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

pub fn render(report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
    let place = &report.location.name;

    writeln!(out)?;
    writeln!(out, "===== Asthma Risk Check ({place}) =====")?;
    writeln!(out, "Temperature: {} °C", reading(report.temperature_c()))?;
    writeln!(out, "Humidity: {} %", reading(report.humidity_pct()))?;
    writeln!(out, "PM2.5: {} µg/m³", reading(report.pm2_5()))?;

    writeln!(out)?;
    writeln!(out, "Risk Score: {}/100", report.risk.score)?;

    writeln!(out)?;
    writeln!(out, "Why:")?;
    for reason in report.reason_lines() {
        writeln!(out, "- {reason}")?;
    }

    writeln!(out)?;
    writeln!(out, "What to do:")?;
    for advice in report.recommendations() {
        writeln!(out, "- {advice}")?;
    }

    writeln!(out)?;
    match report.verdict() {
        Verdict::Avoid => writeln!(out, "🚫 Recommendation: Avoid roaming in {place} right now.")?,
        Verdict::ProceedWithPrecautions => {
            writeln!(out, "✅ Recommendation: You may step out with precautions.")?
        }
    }

    Ok(())
}
