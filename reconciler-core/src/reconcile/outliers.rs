use crate::config::OutlierThresholds;
use crate::observation::{Observation, field};

/// Compare overlapping numeric fields of the two observations and flag
/// divergences beyond the configured thresholds.
///
/// Fields missing or unparseable on either side are skipped silently;
/// absence is not an anomaly. Warnings come out in a fixed field order
/// (temperature, humidity, pressure).
pub fn detect(
    obs1: &Observation,
    obs2: &Observation,
    thresholds: &OutlierThresholds,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if let (Some(t1), Some(t2)) =
        (obs1.get_f64(field::TEMPERATURE), obs2.get_f64(field::TEMPERATURE))
    {
        let diff = (t1 - t2).abs();
        if diff > thresholds.temperature {
            warnings.push(format!("Large temperature discrepancy between sources: {diff:.1}°C"));
        }
    }

    if let (Some(h1), Some(h2)) = (obs1.get_f64(field::HUMIDITY), obs2.get_f64(field::HUMIDITY)) {
        let diff = (h1 - h2).abs();
        if diff > thresholds.humidity {
            warnings.push(format!("Large humidity discrepancy between sources: {diff:.0}%"));
        }
    }

    if let (Some(p1), Some(p2)) = (obs1.get_f64(field::PRESSURE), obs2.get_f64(field::PRESSURE)) {
        let diff = (p1 - p2).abs();
        if diff > thresholds.pressure {
            warnings.push(format!("Large pressure discrepancy between sources: {diff:.0} hPa"));
        }
    }

    warnings
}
