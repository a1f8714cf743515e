use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::binder::{self, BindReport};
use crate::correlate::{CorrelationConfig, SliceMatch, find_recurring_slices_with};
use crate::error::Result;
use crate::layers::LayerRegistry;
use crate::now::NowPointer;
use crate::sample::{Layer, RawSample, Sample};
use crate::slice::{SliceSet, TimeSlice};
use crate::zoom::ZoomLevel;

/// Explicit owner of the live slice collection.
///
/// Nothing recomputes implicitly: the caller decides when to regenerate
/// slices, bind samples, correlate and refresh the now-pointer. A
/// regeneration builds the complete new [`SliceSet`] before swapping it in,
/// so binders only ever see a whole generation.
pub struct Timeline {
    set: SliceSet,
    registry: LayerRegistry,
}

impl Timeline {
    pub fn new(focus: DateTime<Utc>, zoom: ZoomLevel) -> Self {
        Self::new_at(focus, zoom, Utc::now())
    }

    pub fn new_at(focus: DateTime<Utc>, zoom: ZoomLevel, now: DateTime<Utc>) -> Self {
        Self {
            set: SliceSet::generate_at(focus, zoom, now),
            registry: LayerRegistry::default(),
        }
    }

    /// Swap in a custom scorer registry.
    pub fn with_registry(mut self, registry: LayerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.set.zoom
    }

    pub fn focus(&self) -> DateTime<Utc> {
        self.set.focus
    }

    /// Identifies the current generation. Slice ids from an older
    /// generation are not valid against this one.
    pub fn generation(&self) -> Uuid {
        self.set.generation
    }

    pub fn slices(&self) -> &[TimeSlice] {
        &self.set.slices
    }

    pub fn slice_set(&self) -> &SliceSet {
        &self.set
    }

    /// Owned copy of the slice collection, safe to hand to another thread
    /// while this timeline keeps binding.
    pub fn snapshot(&self) -> Vec<TimeSlice> {
        self.set.slices.clone()
    }

    /// Regenerate slices for a new focus/zoom. Bound data is discarded.
    pub fn recompute_slices(&mut self, focus: DateTime<Utc>, zoom: ZoomLevel) {
        self.recompute_slices_at(focus, zoom, Utc::now());
    }

    pub fn recompute_slices_at(
        &mut self,
        focus: DateTime<Utc>,
        zoom: ZoomLevel,
        now: DateTime<Utc>,
    ) {
        let next = SliceSet::generate_at(focus, zoom, now);
        tracing::debug!(
            "regenerated {} {} slices (generation {})",
            next.len(),
            zoom,
            next.generation
        );
        self.set = next;
    }

    /// Recompute only if focus or zoom actually changed. Returns whether a
    /// new generation was produced.
    pub fn navigate_at(
        &mut self,
        focus: DateTime<Utc>,
        zoom: ZoomLevel,
        now: DateTime<Utc>,
    ) -> bool {
        if focus == self.set.focus && zoom == self.set.zoom {
            return false;
        }
        self.recompute_slices_at(focus, zoom, now);
        true
    }

    pub fn bind(&mut self, layer: Layer, samples: &[Sample]) -> BindReport {
        binder::bind(&mut self.set.slices, layer, samples)
    }

    pub fn bind_raw(&mut self, layer: Layer, samples: &[RawSample]) -> BindReport {
        binder::bind_raw(&mut self.set.slices, layer, samples)
    }

    pub fn correlate(&self, config: &CorrelationConfig) -> Result<Vec<SliceMatch>> {
        self.correlate_at(config, Utc::now())
    }

    pub fn correlate_at(
        &self,
        config: &CorrelationConfig,
        now: DateTime<Utc>,
    ) -> Result<Vec<SliceMatch>> {
        find_recurring_slices_with(&self.registry, &self.set.slices, config, now)
    }

    pub fn now_pointer(&self) -> NowPointer {
        NowPointer::compute(self.set.zoom)
    }

    pub fn now_pointer_at(&self, now: DateTime<Utc>) -> NowPointer {
        NowPointer::compute_at(self.set.zoom, now)
    }
}
