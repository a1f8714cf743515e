/// Full turn of the wheel in degrees.
pub const FULL_TURN: f64 = 360.0;

/// Offset applied when converting a north-zero angle to screen space,
/// where 0° points east.
pub const SCREEN_OFFSET: f64 = -90.0;

/// Slices per zoom level.
pub const HOUR_SLICES: usize = 24;
pub const DAY_SLICES: usize = 7;
/// ceil(30 / 7): every month is treated as five weeks.
pub const WEEK_SLICES: usize = 5;
pub const MONTH_SLICES: usize = 12;
pub const YEAR_SLICES: usize = 5;

/// Years shown before the focus year at year zoom.
pub const YEARS_BEFORE_FOCUS: i32 = 2;

/// Binder tolerance between a sample timestamp and a slice instant (seconds).
pub const BIND_TOLERANCE_SECS: i64 = 60 * 60;

/// Default correlation threshold.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Default maximum distance between two matched slices (days).
pub const DEFAULT_MAX_DISTANCE_DAYS: f64 = 365.0;

/// History windows.
pub const WEEKS_WINDOW_DAYS: i64 = 28;
pub const MONTHS_WINDOW_MONTHS: u32 = 6;
pub const ALL_WINDOW_MONTHS: u32 = 24;

/// Sleep duration delta (hours) that saturates the sleep distance.
pub const SLEEP_DURATION_SPAN: f64 = 12.0;

/// Mobility duration delta (hours) that saturates the mobility distance.
pub const MOBILITY_DURATION_SPAN: f64 = 10.0;

/// Bucket boundary for unit-interval fields in narrative labels.
pub const HIGH_UNIT: f64 = 0.5;

/// Bucket boundary for sleep duration in narrative labels (hours).
pub const LONG_SLEEP_HOURS: f64 = 7.0;

/// Bucket boundary for mobility duration in narrative labels (hours).
pub const LONG_MOBILITY_HOURS: f64 = 5.0;

/// Now-pointer refresh cadence while in use (seconds).
pub const NOW_REFRESH_SECS: i64 = 60;
