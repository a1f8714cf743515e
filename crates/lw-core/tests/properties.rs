//! Property tests for the slicer and now-pointer.

use chrono::{DateTime, TimeZone, Utc};
use lw_core::{ZoomLevel, generate_slices_at, now_angle_at};
use proptest::prelude::*;

// 1971-01-01 .. 2099-12-31
const MIN_SECS: i64 = 31_536_000;
const MAX_SECS: i64 = 4_102_358_400;

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_SECS..MAX_SECS).prop_map(|s| Utc.timestamp_opt(s, 0).unwrap())
}

fn zoom() -> impl Strategy<Value = ZoomLevel> {
    prop::sample::select(ZoomLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn slice_count_and_steps(focus in instant(), now in instant(), z in zoom()) {
        let slices = generate_slices_at(focus, z, now);
        prop_assert_eq!(slices.len(), z.slice_count());
        for (i, s) in slices.iter().enumerate() {
            prop_assert!((s.angle - i as f64 * z.step()).abs() < 1e-9);
            prop_assert!((0.0..360.0).contains(&s.angle));
        }
        for pair in slices.windows(2) {
            prop_assert!(pair[0].instant < pair[1].instant);
        }
    }

    #[test]
    fn at_most_one_current(focus in instant(), now in instant(), z in zoom()) {
        let slices = generate_slices_at(focus, z, now);
        let current: Vec<_> = slices.iter().filter(|s| s.is_current).collect();
        prop_assert!(current.len() <= 1);
        if let Some(c) = current.first() {
            prop_assert!(c.instant <= now);
        }
    }

    #[test]
    fn focused_slice_is_current_when_focus_is_now(now in instant(), z in zoom()) {
        let slices = generate_slices_at(now, z, now);
        let current: Vec<_> = slices.iter().filter(|s| s.is_current).map(|s| s.index).collect();
        let active: Vec<_> = slices.iter().filter(|s| s.is_active).map(|s| s.index).collect();
        prop_assert_eq!(current.len(), 1);
        prop_assert_eq!(current, active);
    }

    #[test]
    fn now_angle_is_normalized(t in instant(), z in zoom()) {
        let a = now_angle_at(z, t);
        prop_assert!((0.0..360.0).contains(&a));
    }
}
