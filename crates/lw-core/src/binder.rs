//! Layer data binder: attach per-layer samples to the nearest slice.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BIND_TOLERANCE_SECS;
use crate::sample::{Layer, RawSample, Sample};
use crate::slice::TimeSlice;

/// Side-channel counts from one bind call. Dropped samples are never errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindReport {
    pub bound: usize,
    /// Parsed samples with no slice within tolerance.
    pub unmatched: usize,
    /// Raw samples whose timestamp could not be parsed.
    pub unparsable: usize,
}

impl BindReport {
    pub fn dropped(&self) -> usize {
        self.unmatched + self.unparsable
    }

    pub fn merge(&mut self, other: BindReport) {
        self.bound += other.bound;
        self.unmatched += other.unmatched;
        self.unparsable += other.unparsable;
    }
}

/// Bind `samples` onto `slices` under `layer`.
///
/// Each sample goes to the slice whose instant is nearest its timestamp,
/// provided the gap is at most one hour; equal gaps go to the lower index.
/// A slice keeps one sample per layer, the last one bound.
pub fn bind(slices: &mut [TimeSlice], layer: Layer, samples: &[Sample]) -> BindReport {
    let tolerance = Duration::seconds(BIND_TOLERANCE_SECS);
    let mut report = BindReport::default();

    for sample in samples {
        match nearest_slice(slices, sample.timestamp, tolerance) {
            Some(idx) => {
                slices[idx].data.insert(layer, sample.clone());
                report.bound += 1;
            }
            None => report.unmatched += 1,
        }
    }

    if report.unmatched > 0 {
        tracing::debug!(
            "{layer}: {} of {} samples had no slice within tolerance",
            report.unmatched,
            samples.len()
        );
    }
    report
}

/// Parse and bind wire samples. Unparsable timestamps are dropped and counted.
pub fn bind_raw(slices: &mut [TimeSlice], layer: Layer, raw: &[RawSample]) -> BindReport {
    let parsed: Vec<Sample> = raw.iter().filter_map(RawSample::parse).collect();
    let unparsable = raw.len() - parsed.len();
    if unparsable > 0 {
        tracing::debug!("{layer}: dropped {unparsable} samples with unparsable timestamps");
    }

    let mut report = bind(slices, layer, &parsed);
    report.unparsable = unparsable;
    report
}

fn nearest_slice(
    slices: &[TimeSlice],
    timestamp: DateTime<Utc>,
    tolerance: Duration,
) -> Option<usize> {
    let mut best: Option<(usize, Duration)> = None;
    for (idx, slice) in slices.iter().enumerate() {
        let gap = (timestamp - slice.instant).abs();
        if gap > tolerance {
            continue;
        }
        match best {
            Some((_, best_gap)) if best_gap <= gap => {}
            _ => best = Some((idx, gap)),
        }
    }
    best.map(|(idx, _)| idx)
}
