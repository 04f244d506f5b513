use log::{debug, warn};

use crate::config::{ReconcilerConfig, SourceWeights};
use crate::observation::Observation;
use crate::report::{MergedReport, Provenance};

pub mod condition;
pub mod confidence;
pub mod fields;
pub mod outliers;

/// The reconciliation engine.
///
/// Stateless aside from its configuration; a single instance may be
/// shared freely across threads and invoked concurrently.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Engine with the given weights and default thresholds.
    pub fn with_weights(weights: SourceWeights) -> Self {
        Self::new(ReconcilerConfig { weights, ..ReconcilerConfig::default() })
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Reconcile two raw observations into a single annotated report.
    ///
    /// Total: always produces a report, even when both observations are
    /// empty. Missing and uncoercible fields degrade to absence, never
    /// to an error.
    pub fn reconcile(&self, obs1: &Observation, obs2: &Observation) -> MergedReport {
        debug!("reconciling observations: source1={obs1:?} source2={obs2:?}");

        let warnings = outliers::detect(obs1, obs2, &self.config.outliers);
        if !warnings.is_empty() {
            warn!("sources disagree: {warnings:?}");
        }

        let (city, coordinates) = fields::merge_location(obs1, obs2);
        let temperature = fields::merge_temperature(obs1, obs2, &self.config.weights);
        let humidity = fields::merge_humidity(obs1, obs2, &self.config.weights);
        let pressure = fields::merge_pressure(obs1, obs2, &self.config.weights);
        let wind = fields::merge_wind(obs1, obs2, &self.config.weights);
        let description = fields::merge_description(obs1, obs2);
        let (sun, day_length) = fields::merge_sun(obs1, obs2);
        let water_temperature_c = fields::merge_water_temperature(obs1, obs2);
        let geomagnetic = fields::merge_geomagnetic(obs1, obs2);
        let hourly_forecast = fields::merge_hourly_forecast(obs1, obs2);

        let confidence = confidence::score(obs1, obs2, &self.config.agreement);

        let overall_condition = condition::classify(
            temperature.as_ref().map(|t| t.air_c),
            wind.as_ref().map(|w| w.speed_mps),
            description.as_ref().map(|d| d.text.as_str()),
        );
        let recommendations = condition::recommend(
            temperature.as_ref().map(|t| t.air_c),
            wind.as_ref().map(|w| w.speed_mps),
            description.as_ref().map(|d| d.text.as_str()),
            geomagnetic.as_ref().map(|g| g.index),
        );

        MergedReport {
            city,
            coordinates,
            temperature,
            humidity,
            pressure,
            wind,
            description,
            sun,
            day_length,
            water_temperature_c,
            geomagnetic,
            hourly_forecast,
            warnings,
            confidence,
            overall_condition,
            recommendations,
            sources_used: 2,
        }
    }
}

/// Generic numeric merge policy shared by every weighted field: both
/// sources present yields the weighted average, exactly one yields that
/// value tagged with its source, neither yields nothing.
pub(crate) fn merge_numeric(
    v1: Option<f64>,
    v2: Option<f64>,
    weights: &SourceWeights,
) -> Option<(f64, Provenance)> {
    match (v1, v2) {
        (Some(a), Some(b)) => {
            let merged =
                (a * weights.source1 + b * weights.source2) / (weights.source1 + weights.source2);
            Some((merged, Provenance::Combined))
        }
        (Some(a), None) => Some((a, Provenance::Source1)),
        (None, Some(b)) => Some((b, Provenance::Source2)),
        (None, None) => None,
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::field;

    #[test]
    fn combined_temperature_and_single_source_humidity() {
        let obs1 = Observation::new().with(field::TEMPERATURE, 20.0);
        let obs2 = Observation::new()
            .with(field::TEMPERATURE, "22")
            .with(field::HUMIDITY, "50");

        let report = Reconciler::default().reconcile(&obs1, &obs2);

        let temp = report.temperature.expect("temperature must merge");
        assert_eq!(temp.air_c, 21.0);
        assert_eq!(temp.source, Provenance::Combined);

        let humidity = report.humidity.expect("humidity must merge");
        assert_eq!(humidity.percent, 50);
        assert_eq!(humidity.source, Provenance::Source2);
    }

    #[test]
    fn empty_observations_produce_neutral_report() {
        let report = Reconciler::default().reconcile(&Observation::new(), &Observation::new());

        assert_eq!(report.city, "Unknown city");
        assert!(report.warnings.is_empty());
        assert_eq!(report.confidence, 0.5);
        assert_eq!(report.overall_condition, "insufficient data");
        assert!(report.recommendations.is_empty());
        assert!(report.temperature.is_none());
        assert!(report.pressure.is_none());
        assert_eq!(report.sources_used, 2);
    }

    #[test]
    fn weighted_merge_stays_between_sources() {
        let weights = SourceWeights::new(0.8, 0.2).unwrap();

        for (a, b) in [(10.0, 30.0), (-5.0, 5.0), (0.0, 0.0), (21.3, 18.7)] {
            let (merged, source) = merge_numeric(Some(a), Some(b), &weights).unwrap();
            assert!(merged >= a.min(b) && merged <= a.max(b), "{merged} outside [{a}, {b}]");
            assert_eq!(source, Provenance::Combined);
        }
    }

    #[test]
    fn merge_policy_provenance() {
        let weights = SourceWeights::default();

        assert_eq!(merge_numeric(Some(1.0), None, &weights), Some((1.0, Provenance::Source1)));
        assert_eq!(merge_numeric(None, Some(2.0), &weights), Some((2.0, Provenance::Source2)));
        assert_eq!(merge_numeric(None, None, &weights), None);
    }

    #[test]
    fn unequal_weights_normalize_by_their_sum() {
        let weights = SourceWeights::new(0.9, 0.3).unwrap();

        let (merged, _) = merge_numeric(Some(10.0), Some(20.0), &weights).unwrap();
        assert!((merged - 12.5).abs() < 1e-9);
    }

    #[test]
    fn reconcile_is_deterministic() {
        let obs1 = Observation::new()
            .with(field::CITY, "Irkutsk")
            .with(field::TEMPERATURE, 20.0)
            .with(field::HUMIDITY, 60)
            .with(field::PRESSURE, 1013)
            .with(field::WIND, 4.0)
            .with(field::DESCRIPTION, "Clear");
        let obs2 = Observation::new()
            .with(field::TEMPERATURE, "22")
            .with(field::HUMIDITY, "55")
            .with(field::WIND, "5")
            .with(field::DESCRIPTION, "sunny, no rain expected");

        let engine = Reconciler::default();
        assert_eq!(engine.reconcile(&obs1, &obs2), engine.reconcile(&obs1, &obs2));
    }

    #[test]
    fn uncoercible_value_falls_back_to_other_source() {
        let obs1 = Observation::new();
        let obs2 = Observation::new().with(field::TEMPERATURE, "twenty");

        let report = Reconciler::default().reconcile(&obs1, &obs2);
        assert!(report.temperature.is_none());

        let obs1 = Observation::new().with(field::TEMPERATURE, 18.0);
        let report = Reconciler::default().reconcile(&obs1, &obs2);

        let temp = report.temperature.expect("coercion failure must not mask source 1");
        assert_eq!(temp.air_c, 18.0);
        assert_eq!(temp.source, Provenance::Source1);
    }

    #[test]
    fn custom_weights_shift_combined_values() {
        let obs1 = Observation::new().with(field::TEMPERATURE, 10.0);
        let obs2 = Observation::new().with(field::TEMPERATURE, 20.0);

        let engine = Reconciler::with_weights(SourceWeights::new(1.0, 0.0).unwrap());
        let report = engine.reconcile(&obs1, &obs2);

        let temp = report.temperature.expect("temperature must merge");
        assert_eq!(temp.air_c, 10.0);
        // Still combined: both sources reported the field.
        assert_eq!(temp.source, Provenance::Combined);
    }
}
