use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DAY_SLICES, FULL_TURN, HOUR_SLICES, MONTH_SLICES, WEEK_SLICES, YEAR_SLICES,
};

/// Temporal granularity of the wheel.
///
/// Unknown names never fail: they fall back to [`ZoomLevel::Month`], both
/// through [`ZoomLevel::from_name`] and when deserializing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ZoomLevel {
    Hour,
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 5] = [
        ZoomLevel::Hour,
        ZoomLevel::Day,
        ZoomLevel::Week,
        ZoomLevel::Month,
        ZoomLevel::Year,
    ];

    /// Parse a zoom name, case-insensitively. Unrecognized input yields Month.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "hour" => ZoomLevel::Hour,
            "day" => ZoomLevel::Day,
            "week" => ZoomLevel::Week,
            "month" => ZoomLevel::Month,
            "year" => ZoomLevel::Year,
            other => {
                tracing::debug!("unknown zoom level '{other}', falling back to month");
                ZoomLevel::default()
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoomLevel::Hour => "hour",
            ZoomLevel::Day => "day",
            ZoomLevel::Week => "week",
            ZoomLevel::Month => "month",
            ZoomLevel::Year => "year",
        }
    }

    /// Fixed number of slices at this level.
    pub fn slice_count(self) -> usize {
        match self {
            ZoomLevel::Hour => HOUR_SLICES,
            ZoomLevel::Day => DAY_SLICES,
            ZoomLevel::Week => WEEK_SLICES,
            ZoomLevel::Month => MONTH_SLICES,
            ZoomLevel::Year => YEAR_SLICES,
        }
    }

    /// Angular width of one slice in degrees.
    pub fn step(self) -> f64 {
        FULL_TURN / self.slice_count() as f64
    }

    /// North-zero angle of the slice at `index`.
    pub fn angle_of(self, index: usize) -> f64 {
        index as f64 * self.step()
    }
}

impl From<String> for ZoomLevel {
    fn from(s: String) -> Self {
        ZoomLevel::from_name(&s)
    }
}

impl From<&str> for ZoomLevel {
    fn from(s: &str) -> Self {
        ZoomLevel::from_name(s)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
