use crate::config::AgreementTolerances;
use crate::observation::{Observation, field};

/// Score how well the two observations agree across their comparable
/// numeric fields.
///
/// Always in `[0.3, 1.0]` when at least one field is comparable; 0.5
/// (the neutral default) when none is. Rounded to two decimals.
pub fn score(obs1: &Observation, obs2: &Observation, tolerances: &AgreementTolerances) -> f64 {
    let checks = [
        (field::TEMPERATURE, tolerances.temperature),
        (field::WIND, tolerances.wind),
        (field::HUMIDITY, tolerances.humidity),
        (field::PRESSURE, tolerances.pressure),
    ];

    let mut comparable = 0u32;
    let mut matching = 0u32;

    for (key, tolerance) in checks {
        // A value unparseable on either side drops the field from both
        // counts; it is never scored as a mismatch.
        let (Some(v1), Some(v2)) = (obs1.get_f64(key), obs2.get_f64(key)) else {
            continue;
        };

        comparable += 1;
        if (v1 - v2).abs() <= tolerance {
            matching += 1;
        }
    }

    if comparable == 0 {
        return 0.5;
    }

    let score = 0.3 + 0.7 * f64::from(matching) / f64::from(comparable);
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_score(obs1: &Observation, obs2: &Observation) -> f64 {
        score(obs1, obs2, &AgreementTolerances::default())
    }

    #[test]
    fn no_comparable_fields_gives_neutral_default() {
        assert_eq!(default_score(&Observation::new(), &Observation::new()), 0.5);

        let obs1 = Observation::new().with(field::TEMPERATURE, 20.0);
        assert_eq!(default_score(&obs1, &Observation::new()), 0.5);
    }

    #[test]
    fn one_of_three_fields_matching() {
        let obs1 = Observation::new()
            .with(field::TEMPERATURE, 10.0)
            .with(field::HUMIDITY, 40)
            .with(field::WIND, 2.0);
        let obs2 = Observation::new()
            .with(field::TEMPERATURE, 30.0)
            .with(field::HUMIDITY, 80)
            .with(field::WIND, 2.0);

        // Only wind agrees: 0.3 + 0.7 * (1/3), rounded to 0.53.
        assert_eq!(default_score(&obs1, &obs2), 0.53);
    }

    #[test]
    fn full_agreement_scores_one() {
        let obs1 = Observation::new()
            .with(field::TEMPERATURE, 20.0)
            .with(field::WIND, 3.0)
            .with(field::HUMIDITY, 60)
            .with(field::PRESSURE, 1013);
        let obs2 = Observation::new()
            .with(field::TEMPERATURE, "21.5")
            .with(field::WIND, "4")
            .with(field::HUMIDITY, "55")
            .with(field::PRESSURE, "1005");

        assert_eq!(default_score(&obs1, &obs2), 1.0);
    }

    #[test]
    fn total_disagreement_scores_floor() {
        let obs1 = Observation::new().with(field::TEMPERATURE, -10.0);
        let obs2 = Observation::new().with(field::TEMPERATURE, 25.0);

        assert_eq!(default_score(&obs1, &obs2), 0.3);
    }

    #[test]
    fn difference_at_tolerance_counts_as_matching() {
        let obs1 = Observation::new().with(field::TEMPERATURE, 20.0);
        let obs2 = Observation::new().with(field::TEMPERATURE, 22.0);

        assert_eq!(default_score(&obs1, &obs2), 1.0);
    }

    #[test]
    fn coercion_failure_excludes_field_from_both_counts() {
        let obs1 = Observation::new()
            .with(field::TEMPERATURE, 20.0)
            .with(field::WIND, 3.0);
        let obs2 = Observation::new()
            .with(field::TEMPERATURE, 21.0)
            .with(field::WIND, "gusty");

        // Wind is not comparable, so the score reflects 1/1, not 1/2.
        assert_eq!(default_score(&obs1, &obs2), 1.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let pairs = [
            (Observation::new().with(field::HUMIDITY, 10), Observation::new().with(field::HUMIDITY, 90)),
            (Observation::new().with(field::PRESSURE, 1013), Observation::new().with(field::PRESSURE, 1014)),
        ];

        for (obs1, obs2) in pairs {
            let value = default_score(&obs1, &obs2);
            assert!((0.3..=1.0).contains(&value), "score {value} out of bounds");
        }
    }
}
