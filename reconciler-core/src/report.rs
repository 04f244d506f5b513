use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Which source(s) a merged field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Source1,
    Source2,
    Combined,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Source1 => "source1",
            Provenance::Source2 => "source2",
            Provenance::Combined => "combined",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed advisory categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Clothing,
    Activities,
    WindWarning,
    Umbrella,
    HealthWarning,
}

impl RecommendationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Clothing => "clothing",
            RecommendationCategory::Activities => "activities",
            RecommendationCategory::WindWarning => "wind_warning",
            RecommendationCategory::Umbrella => "umbrella",
            RecommendationCategory::HealthWarning => "health_warning",
        }
    }

    /// Human-facing section label.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationCategory::Clothing => "Clothing",
            RecommendationCategory::Activities => "Activities",
            RecommendationCategory::WindWarning => "Wind warning",
            RecommendationCategory::Umbrella => "Umbrella",
            RecommendationCategory::HealthWarning => "Health warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub air_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<f64>,
    pub source: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityReport {
    pub percent: i64,
    pub source: Provenance,
}

/// Pressure is always carried in both units; whichever unit the source
/// used, the other one is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureReport {
    pub hpa: i64,
    pub mmhg: i64,
    pub source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindReport {
    pub speed_mps: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    pub source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionReport {
    pub text: String,
    pub source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunReport {
    pub sunrise: String,
    pub sunset: String,
    pub source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeomagneticReport {
    pub index: i64,
    pub description: String,
}

/// The reconciled, annotated output of the engine.
///
/// Constructed fresh per request and never mutated after being handed
/// to a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedReport {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<HumidityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<WindReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun: Option<SunReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geomagnetic: Option<GeomagneticReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_forecast: Option<Vec<String>>,
    pub warnings: Vec<String>,
    pub confidence: f64,
    pub overall_condition: String,
    pub recommendations: BTreeMap<RecommendationCategory, String>,
    pub sources_used: u8,
}

/// Format a merged report for display.
///
/// Pure formatting aside from the timestamp line. Sections whose
/// backing fields are entirely absent are omitted; every field may be
/// individually absent.
pub fn render(report: &MergedReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "WEATHER REPORT: {}", report.city);
    let _ = writeln!(out, "{}", Local::now().format("%Y-%m-%d %H:%M"));

    out.push_str("\nGENERAL:\n");
    let _ = writeln!(out, "  - Conditions: {}", report.overall_condition);
    let _ = writeln!(out, "  - Confidence: {:.0}%", report.confidence * 100.0);
    let _ = writeln!(out, "  - Data sources: {}", report.sources_used);

    if report.temperature.is_some() || report.water_temperature_c.is_some() {
        out.push_str("\nTEMPERATURE:\n");
        if let Some(temp) = &report.temperature {
            let _ = writeln!(out, "  - Air: {}°C", temp.air_c);
            if let Some(feels_like) = temp.feels_like_c {
                let _ = writeln!(out, "  - Feels like: {feels_like}°C");
            }
        }
        if let Some(water) = report.water_temperature_c {
            let _ = writeln!(out, "  - Water: {water}°C");
        }
    }

    if report.wind.is_some() || report.humidity.is_some() {
        out.push_str("\nWIND & HUMIDITY:\n");
        if let Some(wind) = &report.wind {
            let _ = writeln!(out, "  - Speed: {} m/s ({})", wind.speed_mps, wind.description);
            if let Some(direction) = &wind.direction {
                let _ = writeln!(out, "  - Direction: {direction}");
            }
        }
        if let Some(humidity) = &report.humidity {
            let _ = writeln!(out, "  - Humidity: {}%", humidity.percent);
        }
    }

    if let Some(pressure) = &report.pressure {
        out.push_str("\nPRESSURE:\n");
        let _ = writeln!(out, "  - {} hPa ({} mmHg)", pressure.hpa, pressure.mmhg);
    }

    if let Some(sun) = &report.sun {
        out.push_str("\nSUN:\n");
        let _ = writeln!(out, "  - Sunrise: {}", sun.sunrise);
        let _ = writeln!(out, "  - Sunset: {}", sun.sunset);
        if let Some(day_length) = &report.day_length {
            let _ = writeln!(out, "  - Day length: {day_length}");
        }
    }

    if let Some(geomagnetic) = &report.geomagnetic {
        out.push_str("\nGEOMAGNETIC ACTIVITY:\n");
        let _ = writeln!(out, "  - Level: {}/9", geomagnetic.index);
        let _ = writeln!(out, "  - Description: {}", geomagnetic.description);
    }

    if let Some(hours) = &report.hourly_forecast {
        out.push_str("\nSHORT-RANGE FORECAST:\n");
        let preview: Vec<&str> = hours.iter().take(5).map(String::as_str).collect();
        let _ = writeln!(out, "  - Hours: {}", preview.join(", "));
    }

    if !report.warnings.is_empty() {
        out.push_str("\nWARNINGS:\n");
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    out.push_str("\nRECOMMENDATIONS:\n");
    if report.recommendations.is_empty() {
        out.push_str("  - No special recommendations\n");
    } else {
        for (category, advice) in &report.recommendations {
            let _ = writeln!(out, "  - {}: {advice}", category.label());
        }
    }

    out
}
