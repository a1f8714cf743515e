//! Now-pointer: the continuous angular position of the present instant.
//!
//! Derived, never stored. Uses the same north-zero clockwise frame as
//! [`TimeSlice::angle`](crate::slice::TimeSlice::angle), but with a
//! fractional index so the pointer sweeps smoothly between slices.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{FULL_TURN, NOW_REFRESH_SECS, SCREEN_OFFSET};
use crate::zoom::ZoomLevel;

/// Angle of the real current instant at `zoom`.
pub fn now_angle(zoom: ZoomLevel) -> f64 {
    now_angle_at(zoom, Utc::now())
}

/// Angle of `instant` at `zoom`:
///
/// - hour: minute of day × 0.25°
/// - day: hour of day × 15°
/// - week: (weekday + hour/24) × 360/7, Sunday = 0
/// - month: day of month / 31 × 360
/// - year: day of year / 365 × 360
pub fn now_angle_at(zoom: ZoomLevel, instant: DateTime<Utc>) -> f64 {
    let hours = fractional_hour_of_day(instant);
    let raw = match zoom {
        ZoomLevel::Hour => hours * 60.0 * 0.25,
        ZoomLevel::Day => hours * 15.0,
        ZoomLevel::Week => {
            let weekday = instant.weekday().num_days_from_sunday() as f64;
            (weekday + hours / 24.0) * (FULL_TURN / 7.0)
        }
        ZoomLevel::Month => instant.day() as f64 / 31.0 * FULL_TURN,
        ZoomLevel::Year => (instant.ordinal0() as f64 + hours / 24.0) / 365.0 * FULL_TURN,
    };
    raw.rem_euclid(FULL_TURN)
}

fn fractional_hour_of_day(instant: DateTime<Utc>) -> f64 {
    let secs = instant.num_seconds_from_midnight() as f64
        + instant.nanosecond().min(999_999_999) as f64 / 1e9;
    secs / 3600.0
}

/// A computed pointer position plus what it was computed from.
///
/// The caller owns the refresh cadence: poll [`NowPointer::needs_refresh`]
/// and recompute when it says so.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPointer {
    pub zoom: ZoomLevel,
    pub angle: f64,
    pub computed_at: DateTime<Utc>,
}

impl NowPointer {
    pub fn compute(zoom: ZoomLevel) -> Self {
        Self::compute_at(zoom, Utc::now())
    }

    pub fn compute_at(zoom: ZoomLevel, now: DateTime<Utc>) -> Self {
        Self {
            zoom,
            angle: now_angle_at(zoom, now),
            computed_at: now,
        }
    }

    /// True on a zoom change, or once a full refresh interval has elapsed.
    pub fn needs_refresh(&self, zoom: ZoomLevel, now: DateTime<Utc>) -> bool {
        zoom != self.zoom || now - self.computed_at >= Self::refresh_interval()
    }

    /// Longest the pointer may go unrefreshed while in use.
    pub fn refresh_interval() -> Duration {
        Duration::seconds(NOW_REFRESH_SECS)
    }

    pub fn screen_angle(&self) -> f64 {
        self.angle + SCREEN_OFFSET
    }
}
