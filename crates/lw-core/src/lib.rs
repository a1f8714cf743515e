//! Radial temporal indexing and cross-layer correlation engine.
//!
//! Maps calendar time onto a wheel of slices at a chosen zoom level, binds
//! independently arriving life-metric samples (mood, sleep, weather,
//! mobility, plans) onto those slices, and ranks pairs of slices that look
//! alike along one layer.
//!
//! Zero I/O — pure computation over an explicitly passed slice collection.
//! The caller owns the cadence of every recomputation.

pub mod binder;
pub mod constants;
pub mod correlate;
pub mod error;
pub mod layers;
pub mod now;
pub mod sample;
pub mod slice;
pub mod timeline;
pub mod wire;
pub mod zoom;

pub use binder::{BindReport, bind, bind_raw};
pub use correlate::{
    CorrelationConfig, DataContext, HistoryWindow, LayerFilter, SliceMatch,
    find_recurring_slices, find_recurring_slices_at, find_recurring_slices_with,
};
pub use error::{ConfigError, WireError};
pub use layers::{LayerRegistry, LayerScorer, MobilityScorer, MoodScorer, SleepScorer};
pub use now::{NowPointer, now_angle, now_angle_at};
pub use sample::{Layer, RawSample, Sample};
pub use slice::{SliceId, SliceSet, TimeSlice, generate_slices, generate_slices_at};
pub use timeline::Timeline;
pub use wire::{WireDocument, to_json_pretty};
pub use zoom::ZoomLevel;
