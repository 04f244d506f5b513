//! Per-field merge rules.
//!
//! Every numeric field follows the shared weighted-average policy from
//! `reconcile::merge_numeric`; the deliberate asymmetries
//! (feels-like is never weighted, the sunrise/sunset pair is taken from
//! one source as a whole, wind direction is never averaged) are kept
//! here explicitly.

use crate::config::SourceWeights;
use crate::observation::{Observation, field};
use crate::reconcile::{merge_numeric, round_to};
use crate::report::{
    Coordinates, DescriptionReport, GeomagneticReport, HumidityReport, PressureReport, Provenance,
    SunReport, TemperatureReport, WindReport,
};

/// Label used when neither source names the place.
pub const DEFAULT_CITY: &str = "Unknown city";

/// Conversion factor between the two pressure units: 1 mmHg = 1.333 hPa.
pub const HPA_PER_MMHG: f64 = 1.333;

pub fn merge_location(obs1: &Observation, obs2: &Observation) -> (String, Option<Coordinates>) {
    let city = obs1
        .get_str(field::CITY)
        .or_else(|| obs2.get_str(field::CITY))
        .unwrap_or(DEFAULT_CITY)
        .to_string();

    let latitude = obs1.get_f64(field::LATITUDE).or_else(|| obs2.get_f64(field::LATITUDE));
    let longitude = obs1.get_f64(field::LONGITUDE).or_else(|| obs2.get_f64(field::LONGITUDE));

    let coordinates = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
        _ => None,
    };

    (city, coordinates)
}

pub fn merge_temperature(
    obs1: &Observation,
    obs2: &Observation,
    weights: &SourceWeights,
) -> Option<TemperatureReport> {
    let (air, source) = merge_numeric(
        obs1.get_f64(field::TEMPERATURE),
        obs2.get_f64(field::TEMPERATURE),
        weights,
    )?;

    // Feels-like is deliberately not weighted: the first source that
    // reports a usable value wins.
    let feels_like = obs1
        .get_f64(field::FEELS_LIKE)
        .or_else(|| obs2.get_f64(field::FEELS_LIKE))
        .map(|v| round_to(v, 1));

    Some(TemperatureReport { air_c: round_to(air, 1), feels_like_c: feels_like, source })
}

pub fn merge_humidity(
    obs1: &Observation,
    obs2: &Observation,
    weights: &SourceWeights,
) -> Option<HumidityReport> {
    let (value, source) =
        merge_numeric(obs1.get_f64(field::HUMIDITY), obs2.get_f64(field::HUMIDITY), weights)?;

    // Truncation, not rounding: a 49.5% average merges to 49%.
    Some(HumidityReport { percent: value.trunc() as i64, source })
}

pub fn merge_pressure(
    obs1: &Observation,
    obs2: &Observation,
    weights: &SourceWeights,
) -> Option<PressureReport> {
    let p1 = obs1.get_f64(field::PRESSURE);
    let p2 = obs2.get_f64(field::PRESSURE);

    match (p1, p2) {
        (None, Some(mmhg)) => {
            // Source 2 alone reports millimeters of mercury; derive
            // hectopascals in the opposite direction.
            Some(PressureReport {
                hpa: (mmhg * HPA_PER_MMHG).round() as i64,
                mmhg: mmhg.round() as i64,
                source: Provenance::Source2,
            })
        }
        _ => {
            let (hpa, source) = merge_numeric(p1, p2, weights)?;
            Some(PressureReport {
                hpa: hpa.round() as i64,
                mmhg: (hpa / HPA_PER_MMHG).round() as i64,
                source,
            })
        }
    }
}

pub fn merge_wind(
    obs1: &Observation,
    obs2: &Observation,
    weights: &SourceWeights,
) -> Option<WindReport> {
    // Direction is a plain fallback, never averaged.
    let direction = obs1
        .get_str(field::WIND_DIRECTION)
        .or_else(|| obs2.get_str(field::WIND_DIRECTION))
        .map(str::to_string);

    let (speed, source) =
        merge_numeric(obs1.get_f64(field::WIND), obs2.get_f64(field::WIND), weights)?;

    Some(WindReport {
        speed_mps: round_to(speed, 1),
        // Classified from the unrounded speed.
        description: wind_description(speed).to_string(),
        direction,
        source,
    })
}

/// Qualitative label for a wind speed in m/s.
fn wind_description(speed: f64) -> &'static str {
    if speed < 0.5 {
        "calm"
    } else if speed < 1.5 {
        "light air"
    } else if speed < 5.0 {
        "light breeze"
    } else if speed < 10.0 {
        "moderate breeze"
    } else if speed < 15.0 {
        "strong breeze"
    } else {
        "gale"
    }
}

pub fn merge_description(obs1: &Observation, obs2: &Observation) -> Option<DescriptionReport> {
    let d1 = obs1.get_str(field::DESCRIPTION);
    let d2 = obs2.get_str(field::DESCRIPTION);

    match (d1, d2) {
        (Some(a), Some(b)) => Some(DescriptionReport {
            // The scraped wording leads, the categorical token follows
            // in parentheses.
            text: format!("{b} ({a})"),
            source: Provenance::Combined,
        }),
        (Some(a), None) => {
            Some(DescriptionReport { text: a.to_string(), source: Provenance::Source1 })
        }
        (None, Some(b)) => {
            Some(DescriptionReport { text: b.to_string(), source: Provenance::Source2 })
        }
        (None, None) => None,
    }
}

/// The sunrise/sunset pair is preferred whole from source 1, otherwise
/// taken whole from source 2, never mixed component-wise. Day length is
/// attached independently of which source supplied the pair.
pub fn merge_sun(obs1: &Observation, obs2: &Observation) -> (Option<SunReport>, Option<String>) {
    let sun = match (obs1.get_clock_time(field::SUNRISE), obs1.get_clock_time(field::SUNSET)) {
        (Some(sunrise), Some(sunset)) => {
            Some(SunReport { sunrise, sunset, source: Provenance::Source1 })
        }
        _ => match (obs2.get_clock_time(field::SUNRISE), obs2.get_clock_time(field::SUNSET)) {
            (Some(sunrise), Some(sunset)) => {
                Some(SunReport { sunrise, sunset, source: Provenance::Source2 })
            }
            _ => None,
        },
    };

    let day_length =
        obs1.get_duration(field::DAY_LENGTH).or_else(|| obs2.get_duration(field::DAY_LENGTH));

    (sun, day_length)
}

pub fn merge_water_temperature(obs1: &Observation, obs2: &Observation) -> Option<f64> {
    obs1.get_f64(field::WATER_TEMPERATURE)
        .or_else(|| obs2.get_f64(field::WATER_TEMPERATURE))
        .map(|v| round_to(v, 1))
}

pub fn merge_geomagnetic(obs1: &Observation, obs2: &Observation) -> Option<GeomagneticReport> {
    let index = obs1
        .get_f64(field::GEOMAGNETIC)
        .or_else(|| obs2.get_f64(field::GEOMAGNETIC))?
        .trunc() as i64;

    Some(GeomagneticReport { index, description: geomagnetic_description(index).to_string() })
}

/// Qualitative label for a Kp-style geomagnetic index.
fn geomagnetic_description(index: i64) -> &'static str {
    if index <= 3 {
        "quiet"
    } else if index <= 5 {
        "minor"
    } else if index <= 7 {
        "moderate"
    } else {
        "severe"
    }
}

pub fn merge_hourly_forecast(obs1: &Observation, obs2: &Observation) -> Option<Vec<String>> {
    obs1.get_list(field::HOURLY_FORECAST)
        .or_else(|| obs2.get_list(field::HOURLY_FORECAST))
        .map(<[String]>::to_vec)
}
