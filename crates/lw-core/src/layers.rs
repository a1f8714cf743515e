//! Per-layer similarity and narrative labels.
//!
//! Each scorable layer is a [`LayerScorer`]. The [`LayerRegistry`] holds them
//! in priority order; the correlation pass walks the registry and never
//! branches on a concrete layer, so new layers plug in by registration.

use crate::constants::{
    HIGH_UNIT, LONG_MOBILITY_HOURS, LONG_SLEEP_HOURS, MOBILITY_DURATION_SPAN,
    SLEEP_DURATION_SPAN,
};
use crate::sample::{Layer, Sample};

/// Distance and label strategy for one layer.
pub trait LayerScorer: Send + Sync {
    fn layer(&self) -> Layer;

    /// Similarity in [0, 1]; 1 means identical on every scored field.
    fn similarity(&self, a: &Sample, b: &Sample) -> f64;

    /// Fixed narrative label for a matched pair.
    fn label(&self, a: &Sample, b: &Sample) -> &'static str;
}

/// Ordered set of scorers. Registration order is the tie-break priority:
/// when two layers score equally, the one registered first wins.
pub struct LayerRegistry {
    scorers: Vec<Box<dyn LayerScorer>>,
}

impl LayerRegistry {
    pub fn empty() -> Self {
        Self {
            scorers: Vec::new(),
        }
    }

    /// Append a scorer at the lowest priority. Replaces any scorer already
    /// registered for the same layer, keeping that scorer's position.
    pub fn register(&mut self, scorer: Box<dyn LayerScorer>) {
        match self.scorers.iter().position(|s| s.layer() == scorer.layer()) {
            Some(idx) => self.scorers[idx] = scorer,
            None => self.scorers.push(scorer),
        }
    }

    pub fn get(&self, layer: Layer) -> Option<&dyn LayerScorer> {
        self.scorers
            .iter()
            .find(|s| s.layer() == layer)
            .map(|s| s.as_ref())
    }

    /// Scorers in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn LayerScorer> {
        self.scorers.iter().map(|s| s.as_ref())
    }

    /// Layers in priority order.
    pub fn priority(&self) -> Vec<Layer> {
        self.scorers.iter().map(|s| s.layer()).collect()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

impl Default for LayerRegistry {
    /// mood > sleep > mobility.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MoodScorer));
        registry.register(Box::new(SleepScorer));
        registry.register(Box::new(MobilityScorer));
        registry
    }
}

/// `1 - max(|Δvalence|, |Δenergy|)`
pub struct MoodScorer;

impl LayerScorer for MoodScorer {
    fn layer(&self) -> Layer {
        Layer::Mood
    }

    fn similarity(&self, a: &Sample, b: &Sample) -> f64 {
        let dv = delta(a, b, "valence");
        let de = delta(a, b, "energy");
        unit(1.0 - dv.max(de))
    }

    fn label(&self, a: &Sample, b: &Sample) -> &'static str {
        let valence = mean(a, b, "valence") >= HIGH_UNIT;
        let energy = mean(a, b, "energy") >= HIGH_UNIT;
        match (valence, energy) {
            (true, true) => "Moments of bright energy",
            (true, false) => "Calm contentment",
            (false, true) => "Restless tension",
            (false, false) => "Quiet reflection",
        }
    }
}

/// `1 - max(|Δquality|, min(|Δduration| / 12, 1))`
pub struct SleepScorer;

impl LayerScorer for SleepScorer {
    fn layer(&self) -> Layer {
        Layer::Sleep
    }

    fn similarity(&self, a: &Sample, b: &Sample) -> f64 {
        let dq = delta(a, b, "quality");
        let dd = (delta(a, b, "duration") / SLEEP_DURATION_SPAN).min(1.0);
        unit(1.0 - dq.max(dd))
    }

    fn label(&self, a: &Sample, b: &Sample) -> &'static str {
        let sound = mean(a, b, "quality") >= HIGH_UNIT;
        let long = mean(a, b, "duration") >= LONG_SLEEP_HOURS;
        match (sound, long) {
            (true, true) => "Deeply restful nights",
            (true, false) => "Short but sound sleep",
            (false, true) => "Long, uneasy nights",
            (false, false) => "Restless nights",
        }
    }
}

/// `1 - max(|Δintensity|, min(|Δduration| / 10, 1))`
pub struct MobilityScorer;

impl LayerScorer for MobilityScorer {
    fn layer(&self) -> Layer {
        Layer::Mobility
    }

    fn similarity(&self, a: &Sample, b: &Sample) -> f64 {
        let di = delta(a, b, "intensity");
        let dd = (delta(a, b, "duration") / MOBILITY_DURATION_SPAN).min(1.0);
        unit(1.0 - di.max(dd))
    }

    fn label(&self, a: &Sample, b: &Sample) -> &'static str {
        let intense = mean(a, b, "intensity") >= HIGH_UNIT;
        let long = mean(a, b, "duration") >= LONG_MOBILITY_HOURS;
        match (intense, long) {
            (true, true) => "Days of wide wandering",
            (true, false) => "Brief bursts of movement",
            (false, true) => "Slow, steady roaming",
            (false, false) => "Staying close to home",
        }
    }
}

fn delta(a: &Sample, b: &Sample, key: &str) -> f64 {
    (a.number(key) - b.number(key)).abs()
}

fn mean(a: &Sample, b: &Sample, key: &str) -> f64 {
    (a.number(key) + b.number(key)) / 2.0
}

fn unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn sample() -> Sample {
        Sample::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_default_priority() {
        let registry = LayerRegistry::default();
        assert_eq!(
            registry.priority(),
            vec![Layer::Mood, Layer::Sleep, Layer::Mobility]
        );
        assert!(registry.get(Layer::Weather).is_none());
    }

    #[test]
    fn test_mood_similarity() {
        let a = sample().with("valence", 0.8).with("energy", 0.75);
        let b = sample().with("valence", 0.82).with("energy", 0.7);
        assert_abs_diff_eq!(MoodScorer.similarity(&a, &b), 0.95, epsilon = 1e-9);
        assert_eq!(MoodScorer.label(&a, &b), "Moments of bright energy");
    }

    #[test]
    fn test_mood_labels() {
        let low = sample().with("valence", 0.2).with("energy", 0.1);
        assert_eq!(MoodScorer.label(&low, &low), "Quiet reflection");
        let calm = sample().with("valence", 0.9).with("energy", 0.2);
        assert_eq!(MoodScorer.label(&calm, &calm), "Calm contentment");
        let tense = sample().with("valence", 0.1).with("energy", 0.9);
        assert_eq!(MoodScorer.label(&tense, &tense), "Restless tension");
    }

    #[test]
    fn test_sleep_duration_saturates() {
        let a = sample().with("quality", 0.5).with("duration", 2.0);
        let b = sample().with("quality", 0.5).with("duration", 20.0);
        assert_eq!(SleepScorer.similarity(&a, &b), 0.0);

        let c = sample().with("quality", 0.9).with("duration", 8.0);
        let d = sample().with("quality", 0.85).with("duration", 7.0);
        // max(0.05, 1/12)
        assert_abs_diff_eq!(SleepScorer.similarity(&c, &d), 1.0 - 1.0 / 12.0, epsilon = 1e-9);
        assert_eq!(SleepScorer.label(&c, &d), "Deeply restful nights");
    }

    #[test]
    fn test_mobility_similarity_and_label() {
        let a = sample().with("intensity", 0.3).with("duration", 1.0);
        let b = sample().with("intensity", 0.2).with("duration", 3.0);
        assert_abs_diff_eq!(MobilityScorer.similarity(&a, &b), 0.8, epsilon = 1e-9);
        assert_eq!(MobilityScorer.label(&a, &b), "Staying close to home");
    }

    #[test]
    fn test_missing_fields_score_as_zero() {
        let empty = sample();
        let full = sample().with("valence", 0.1).with("energy", 0.05);
        assert_abs_diff_eq!(MoodScorer.similarity(&empty, &full), 0.9, epsilon = 1e-9);
        assert_eq!(MoodScorer.similarity(&empty, &empty), 1.0);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let a = sample().with("valence", -3.0);
        let b = sample().with("valence", 4.0);
        assert_eq!(MoodScorer.similarity(&a, &b), 0.0);
    }

    struct LoudMood;

    impl LayerScorer for LoudMood {
        fn layer(&self) -> Layer {
            Layer::Mood
        }
        fn similarity(&self, _: &Sample, _: &Sample) -> f64 {
            1.0
        }
        fn label(&self, _: &Sample, _: &Sample) -> &'static str {
            "always"
        }
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = LayerRegistry::default();
        registry.register(Box::new(LoudMood));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.priority()[0], Layer::Mood);
        let s = sample();
        assert_eq!(registry.get(Layer::Mood).unwrap().label(&s, &s), "always");
    }
}
