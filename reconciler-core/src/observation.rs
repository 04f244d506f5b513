use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical observation field keys shared by both sources.
pub mod field {
    pub const CITY: &str = "city";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const TEMPERATURE: &str = "temperature";
    pub const FEELS_LIKE: &str = "feels_like";
    pub const HUMIDITY: &str = "humidity";
    pub const PRESSURE: &str = "pressure";
    pub const WIND: &str = "wind";
    pub const WIND_DIRECTION: &str = "wind_direction";
    pub const DESCRIPTION: &str = "description";
    pub const SUNRISE: &str = "sunrise";
    pub const SUNSET: &str = "sunset";
    pub const DAY_LENGTH: &str = "day_length";
    pub const WATER_TEMPERATURE: &str = "water_temperature";
    pub const GEOMAGNETIC: &str = "geomagnetic_activity";
    pub const HOURLY_FORECAST: &str = "hourly_forecast";
}

/// A single reported value.
///
/// The two sources disagree on types: the API reports numbers and POSIX
/// instants, the scraped source reports almost everything as text. The
/// accessors below coerce on demand; a value that cannot be coerced is
/// treated as absent, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// Numeric view of the value. Text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual view. Empty and whitespace-only strings count as absent.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Wall-clock `HH:MM` view, for sunrise/sunset fields. Integers are
    /// interpreted as POSIX seconds; text is passed through as-is.
    pub fn as_clock_time(&self) -> Option<String> {
        match self {
            Value::Timestamp(dt) => Some(dt.format("%H:%M").to_string()),
            Value::Int(n) => {
                DateTime::<Utc>::from_timestamp(*n, 0).map(|dt| dt.format("%H:%M").to_string())
            }
            Value::Text(_) => self.as_str().map(str::to_string),
            _ => None,
        }
    }

    /// Duration view, `H:MM:SS`, for the day-length field. Numbers are
    /// whole seconds; text is passed through as-is.
    pub fn as_duration(&self) -> Option<String> {
        match self {
            Value::Int(n) if *n >= 0 => Some(format_duration(*n)),
            Value::Float(x) if *x >= 0.0 => Some(format_duration(x.trunc() as i64)),
            Value::Text(_) => self.as_str().map(str::to_string),
            _ => None,
        }
    }

    /// List view. An empty list counts as absent.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

fn format_duration(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

/// One source's raw, possibly incomplete weather reading: a sparse
/// mapping from canonical field name to value. A missing key means the
/// source did not report that field, which is distinct from a reported
/// zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(HashMap<String, Value>);

impl Observation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Builder-style variant of [`Observation::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_clock_time(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_clock_time)
    }

    pub fn get_duration(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_duration)
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
