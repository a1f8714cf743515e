use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A life-metric data layer that can be bound onto slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Mood,
    Sleep,
    Weather,
    Mobility,
    Plans,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Mood,
        Layer::Sleep,
        Layer::Weather,
        Layer::Mobility,
        Layer::Plans,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mood" => Some(Layer::Mood),
            "sleep" => Some(Layer::Sleep),
            "weather" => Some(Layer::Weather),
            "mobility" => Some(Layer::Mobility),
            "plans" => Some(Layer::Plans),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Mood => "mood",
            Layer::Sleep => "sleep",
            Layer::Weather => "weather",
            Layer::Mobility => "mobility",
            Layer::Plans => "plans",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped data point. Apart from `timestamp` the fields are opaque
/// to the engine; scorers read the numeric ones they know about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Numeric field value. Missing, non-numeric and non-finite values read as 0.
    pub fn number(&self, key: &str) -> f64 {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// A sample as it arrives from a data source, timestamp still unparsed.
///
/// Accepted timestamps: RFC 3339 strings, bare `YYYY-MM-DD` dates (midnight
/// UTC) and integer Unix milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub timestamp: Value,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl RawSample {
    pub fn parse(&self) -> Option<Sample> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Some(Sample {
            timestamp,
            fields: self.fields.clone(),
        })
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
