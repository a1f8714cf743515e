//! Zoom level slicer: focus date + zoom level → one full turn of slices.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{FULL_TURN, SCREEN_OFFSET, YEARS_BEFORE_FOCUS};
use crate::sample::{Layer, Sample};
use crate::zoom::ZoomLevel;

/// Slice identifier. Minted fresh on every slicer run, so it is only
/// meaningful within the generation that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliceId(pub Uuid);

impl SliceId {
    pub fn new() -> Self {
        SliceId(Uuid::new_v4())
    }
}

impl Default for SliceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One angular bucket of the wheel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlice {
    pub id: SliceId,
    pub index: usize,
    /// Start of the period this slice covers.
    pub instant: DateTime<Utc>,
    /// Clockwise degrees from north, in [0, 360).
    pub angle: f64,
    pub is_active: bool,
    pub is_current: bool,
    #[serde(default)]
    pub data: BTreeMap<Layer, Sample>,
}

impl TimeSlice {
    /// Bare slice with no flags and no data. Used for hand-built histories.
    pub fn new(index: usize, instant: DateTime<Utc>, angle: f64) -> Self {
        Self {
            id: SliceId::new(),
            index,
            instant,
            angle: angle.rem_euclid(FULL_TURN),
            is_active: false,
            is_current: false,
            data: BTreeMap::new(),
        }
    }

    /// Angle in screen space (0° = east), i.e. `index * step - 90`.
    pub fn screen_angle(&self) -> f64 {
        self.angle + SCREEN_OFFSET
    }

    pub fn sample(&self, layer: Layer) -> Option<&Sample> {
        self.data.get(&layer)
    }
}

/// Output of one slicer run. Replaced wholesale, never patched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceSet {
    pub generation: Uuid,
    pub zoom: ZoomLevel,
    pub focus: DateTime<Utc>,
    pub slices: Vec<TimeSlice>,
}

impl SliceSet {
    pub fn generate(focus: DateTime<Utc>, zoom: ZoomLevel) -> Self {
        Self::generate_at(focus, zoom, Utc::now())
    }

    pub fn generate_at(focus: DateTime<Utc>, zoom: ZoomLevel, now: DateTime<Utc>) -> Self {
        Self {
            generation: Uuid::new_v4(),
            zoom,
            focus,
            slices: generate_slices_at(focus, zoom, now),
        }
    }

    /// The slice holding the wall-clock present, if it is on this wheel.
    pub fn current(&self) -> Option<&TimeSlice> {
        self.slices.iter().find(|s| s.is_current)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Generate the slices for `zoom` around `focus`, marking the current slice
/// against the real clock.
pub fn generate_slices(focus: DateTime<Utc>, zoom: ZoomLevel) -> Vec<TimeSlice> {
    generate_slices_at(focus, zoom, Utc::now())
}

/// Same as [`generate_slices`] with an explicit present instant.
pub fn generate_slices_at(
    focus: DateTime<Utc>,
    zoom: ZoomLevel,
    now: DateTime<Utc>,
) -> Vec<TimeSlice> {
    (0..zoom.slice_count())
        .filter_map(|index| {
            let (start, end) = slice_span(zoom, focus, index)?;
            let mut slice = TimeSlice::new(index, start, zoom.angle_of(index));
            slice.is_active = start <= focus && focus < end;
            slice.is_current = start <= now && now < end;
            Some(slice)
        })
        .collect()
}

/// Half-open `[start, end)` span covered by slice `index`.
///
/// Only `None` for dates at the edge of chrono's representable range.
pub fn slice_span(
    zoom: ZoomLevel,
    focus: DateTime<Utc>,
    index: usize,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let date = focus.date_naive();
    let i = index as i64;
    match zoom {
        ZoomLevel::Hour => {
            let start = midnight(date) + Duration::hours(i);
            Some((start, start + Duration::hours(1)))
        }
        ZoomLevel::Day => {
            let sunday = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
            let start = midnight(sunday) + Duration::days(i);
            Some((start, start + Duration::days(1)))
        }
        ZoomLevel::Week => {
            let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
            let start = midnight(first) + Duration::days(7 * i);
            Some((start, start + Duration::days(7)))
        }
        ZoomLevel::Month => {
            let first = NaiveDate::from_ymd_opt(date.year(), index as u32 + 1, 1)?;
            let start = midnight(first);
            Some((start, start.checked_add_months(Months::new(1))?))
        }
        ZoomLevel::Year => {
            let year = date.year() - YEARS_BEFORE_FOCUS + index as i32;
            let start = midnight(NaiveDate::from_ymd_opt(year, 1, 1)?);
            Some((start, start.checked_add_months(Months::new(12))?))
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_counts_and_angles() {
        let focus = at(2026, 5, 14, 9, 30);
        for zoom in ZoomLevel::ALL {
            let slices = generate_slices_at(focus, zoom, focus);
            assert_eq!(slices.len(), zoom.slice_count(), "{zoom}");
            assert_eq!(slices[0].angle, 0.0);
            for pair in slices.windows(2) {
                let delta = pair[1].angle - pair[0].angle;
                assert!((delta - zoom.step()).abs() < 1e-9, "{zoom}: delta {delta}");
            }
            assert!(slices.iter().all(|s| (0.0..360.0).contains(&s.angle)));
        }
    }

    #[test]
    fn test_screen_angle_starts_at_north() {
        let t = at(2026, 5, 14, 0, 0);
        let slices = generate_slices_at(t, ZoomLevel::Month, t);
        assert_eq!(slices[0].screen_angle(), -90.0);
        assert_eq!(slices[3].screen_angle(), 0.0);
    }

    #[test]
    fn test_hour_slices() {
        let focus = at(2026, 5, 14, 9, 30);
        let slices = generate_slices_at(focus, ZoomLevel::Hour, at(2026, 5, 14, 17, 5));
        assert_eq!(slices[0].instant, at(2026, 5, 14, 0, 0));
        assert_eq!(slices[23].instant, at(2026, 5, 14, 23, 0));
        let active: Vec<usize> = slices.iter().filter(|s| s.is_active).map(|s| s.index).collect();
        assert_eq!(active, vec![9]);
        let current: Vec<usize> = slices.iter().filter(|s| s.is_current).map(|s| s.index).collect();
        assert_eq!(current, vec![17]);
    }

    #[test]
    fn test_day_slices_start_sunday() {
        // 2026-05-14 is a Thursday
        let focus = at(2026, 5, 14, 9, 30);
        let slices = generate_slices_at(focus, ZoomLevel::Day, focus);
        assert_eq!(slices[0].instant, at(2026, 5, 10, 0, 0));
        assert_eq!(slices[6].instant, at(2026, 5, 16, 0, 0));
        assert!(slices[4].is_active);
        assert!(slices[4].is_current);
    }

    #[test]
    fn test_week_slices_are_five_blocks_of_seven_days() {
        let focus = at(2026, 2, 20, 12, 0);
        let slices = generate_slices_at(focus, ZoomLevel::Week, focus);
        assert_eq!(slices[0].instant, at(2026, 2, 1, 0, 0));
        // February 2026 has 28 days, so the fifth block spills into March.
        assert_eq!(slices[4].instant, at(2026, 3, 1, 0, 0));
        // Feb 20 lies in days 15..22 → block 2
        let active: Vec<usize> = slices.iter().filter(|s| s.is_active).map(|s| s.index).collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn test_month_and_year_slices() {
        let focus = at(2026, 7, 4, 12, 0);
        let months = generate_slices_at(focus, ZoomLevel::Month, focus);
        assert_eq!(months[0].instant, at(2026, 1, 1, 0, 0));
        assert_eq!(months[11].instant, at(2026, 12, 1, 0, 0));
        assert!(months[6].is_active && months[6].is_current);

        let years = generate_slices_at(focus, ZoomLevel::Year, focus);
        assert_eq!(years[0].instant, at(2024, 1, 1, 0, 0));
        assert_eq!(years[4].instant, at(2028, 1, 1, 0, 0));
        assert!(years[2].is_active && years[2].is_current);
    }

    #[test]
    fn test_current_independent_of_focus() {
        let now = at(2026, 10, 19, 8, 0);
        // Focus in another year: nothing on the month wheel is current.
        let slices = generate_slices_at(at(2020, 3, 1, 0, 0), ZoomLevel::Month, now);
        assert!(slices.iter().all(|s| !s.is_current));
        assert!(slices[2].is_active);

        // Same year: October is current even though March is focused.
        let slices = generate_slices_at(at(2026, 3, 1, 0, 0), ZoomLevel::Month, now);
        let current: Vec<usize> = slices.iter().filter(|s| s.is_current).map(|s| s.index).collect();
        assert_eq!(current, vec![9]);
        assert!(slices[2].is_active);
    }

    #[test]
    fn test_ids_change_between_generations() {
        let focus = at(2026, 5, 14, 9, 30);
        let a = SliceSet::generate_at(focus, ZoomLevel::Day, focus);
        let b = SliceSet::generate_at(focus, ZoomLevel::Day, focus);
        assert_ne!(a.generation, b.generation);
        assert_ne!(a.slices[0].id, b.slices[0].id);
        assert_eq!(a.slices[0].instant, b.slices[0].instant);
        assert_eq!(a.current().map(|s| s.index), Some(4));
    }
}
