//! JSON document format for feeding the engine from files.
//!
//! ```json
//! {
//!   "focus": "2026-05-14T12:00:00Z",
//!   "zoom": "hour",
//!   "layers": { "mood": [ { "timestamp": "...", "valence": 0.7 } ] },
//!   "correlation": { "matchThreshold": 0.8 }
//! }
//! ```
//!
//! Unknown layer names are skipped, an unknown zoom falls back to month,
//! and a missing focus means "now".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::binder::BindReport;
use crate::correlate::CorrelationConfig;
use crate::error::WireError;
use crate::sample::{Layer, RawSample};
use crate::timeline::Timeline;
use crate::zoom::ZoomLevel;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    #[serde(default)]
    pub focus: Option<DateTime<Utc>>,
    #[serde(default)]
    pub zoom: ZoomLevel,
    #[serde(default)]
    pub layers: BTreeMap<String, Vec<RawSample>>,
    #[serde(default)]
    pub correlation: Option<CorrelationConfig>,
}

impl WireDocument {
    pub fn from_json(s: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Layers with a recognized name, in name order.
    pub fn known_layers(&self) -> Vec<(Layer, &[RawSample])> {
        self.layers
            .iter()
            .filter_map(|(name, samples)| match Layer::from_name(name) {
                Some(layer) => Some((layer, samples.as_slice())),
                None => {
                    tracing::debug!("skipping unknown layer '{name}' ({} samples)", samples.len());
                    None
                }
            })
            .collect()
    }

    /// Build a timeline for this document and bind every known layer.
    pub fn into_timeline_at(&self, now: DateTime<Utc>) -> (Timeline, BTreeMap<Layer, BindReport>) {
        let focus = self.focus.unwrap_or(now);
        let mut timeline = Timeline::new_at(focus, self.zoom, now);
        let mut reports: BTreeMap<Layer, BindReport> = BTreeMap::new();
        for (layer, samples) in self.known_layers() {
            let report = timeline.bind_raw(layer, samples);
            reports.entry(layer).or_default().merge(report);
        }
        (timeline, reports)
    }
}

/// Pretty JSON for any engine output.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(value)?)
}
