//! Correlation engine: find historically recurring slices.
//!
//! Pairwise O(n²) over the slices inside the history window. Windows are
//! bounded (at most two years of slices), which keeps the pass small.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ALL_WINDOW_MONTHS, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_DISTANCE_DAYS, MONTHS_WINDOW_MONTHS,
    WEEKS_WINDOW_DAYS,
};
use crate::error::{ConfigError, Result};
use crate::layers::{LayerRegistry, LayerScorer};
use crate::sample::{Layer, Sample};
use crate::slice::{SliceId, TimeSlice};

/// Which layers a correlation pass scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerFilter {
    Mood,
    Sleep,
    Mobility,
    #[default]
    All,
}

impl LayerFilter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mood" => Some(LayerFilter::Mood),
            "sleep" => Some(LayerFilter::Sleep),
            "mobility" => Some(LayerFilter::Mobility),
            "all" => Some(LayerFilter::All),
            _ => None,
        }
    }

    /// Scorers in scope, in registry priority order.
    fn select<'r>(&self, registry: &'r LayerRegistry) -> Vec<&'r dyn LayerScorer> {
        let only = match self {
            LayerFilter::All => return registry.iter().collect(),
            LayerFilter::Mood => Layer::Mood,
            LayerFilter::Sleep => Layer::Sleep,
            LayerFilter::Mobility => Layer::Mobility,
        };
        registry.get(only).into_iter().collect()
    }
}

/// How far back from now slices are considered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryWindow {
    /// 28 days.
    Weeks,
    /// Six calendar months.
    Months,
    /// Two calendar years.
    #[default]
    All,
}

impl HistoryWindow {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "weeks" => Some(HistoryWindow::Weeks),
            "months" => Some(HistoryWindow::Months),
            "all" => Some(HistoryWindow::All),
            _ => None,
        }
    }

    /// Earliest instant inside the window. `None` means unbounded.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            HistoryWindow::Weeks => now.checked_sub_signed(Duration::days(WEEKS_WINDOW_DAYS)),
            HistoryWindow::Months => now.checked_sub_months(Months::new(MONTHS_WINDOW_MONTHS)),
            HistoryWindow::All => now.checked_sub_months(Months::new(ALL_WINDOW_MONTHS)),
        }
    }
}

/// Correlation pass settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CorrelationConfig {
    #[serde(alias = "layer_filter")]
    pub layer_filter: LayerFilter,
    /// Inclusive lower bound on a layer's similarity.
    #[serde(alias = "match_threshold")]
    pub match_threshold: f64,
    #[serde(alias = "history_window")]
    pub history_window: HistoryWindow,
    /// Inclusive upper bound on the gap between two matched slices.
    #[serde(alias = "max_distance_days")]
    pub max_distance_days: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            layer_filter: LayerFilter::All,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            history_window: HistoryWindow::All,
            max_distance_days: DEFAULT_MAX_DISTANCE_DAYS,
        }
    }
}

impl CorrelationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.match_threshold));
        }
        if self.max_distance_days.is_nan() || self.max_distance_days < 0.0 {
            return Err(ConfigError::NegativeDistance(self.max_distance_days));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML config. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// The two samples a match was scored on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataContext {
    pub first: Sample,
    pub second: Sample,
}

/// A scored, labeled recurrence between two slices along one layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceMatch {
    pub slice_id1: SliceId,
    pub slice_id2: SliceId,
    pub correlation_score: f64,
    pub layer_type: Layer,
    pub data_context: DataContext,
    pub narrative_label: String,
    pub time_difference_days: i64,
}

/// Ranked recurring slices, windowed against the real clock.
pub fn find_recurring_slices(
    slices: &[TimeSlice],
    config: &CorrelationConfig,
) -> Result<Vec<SliceMatch>> {
    find_recurring_slices_at(slices, config, Utc::now())
}

/// Ranked recurring slices with an explicit present instant.
pub fn find_recurring_slices_at(
    slices: &[TimeSlice],
    config: &CorrelationConfig,
    now: DateTime<Utc>,
) -> Result<Vec<SliceMatch>> {
    find_recurring_slices_with(&LayerRegistry::default(), slices, config, now)
}

/// Full correlation pass over a caller-supplied registry.
///
/// 1. Keep slices inside the history window (`window start ≤ instant ≤ now`).
/// 2. For each pair i < j within `max_distance_days`, score every layer in
///    scope that both slices carry.
/// 3. Keep the best layer scoring at least the threshold; equal scores go
///    to the layer registered first.
/// 4. Stable sort by score, descending.
pub fn find_recurring_slices_with(
    registry: &LayerRegistry,
    slices: &[TimeSlice],
    config: &CorrelationConfig,
    now: DateTime<Utc>,
) -> Result<Vec<SliceMatch>> {
    config.validate()?;

    let window_start = config.history_window.start(now);
    let history: Vec<&TimeSlice> = slices
        .iter()
        .filter(|s| s.instant <= now && window_start.is_none_or(|start| s.instant >= start))
        .collect();
    if history.len() < 2 {
        return Ok(Vec::new());
    }

    let scorers = config.layer_filter.select(registry);
    let mut matches = Vec::new();
    let mut pairs = 0usize;

    for (i, a) in history.iter().enumerate() {
        for b in &history[i + 1..] {
            let days = (b.instant - a.instant).num_days().abs();
            if days as f64 > config.max_distance_days {
                continue;
            }
            pairs += 1;

            let mut best: Option<(f64, &dyn LayerScorer, &Sample, &Sample)> = None;
            for scorer in &scorers {
                let layer = scorer.layer();
                let (Some(sa), Some(sb)) = (a.sample(layer), b.sample(layer)) else {
                    continue;
                };
                let score = scorer.similarity(sa, sb);
                if score.is_nan() || score < config.match_threshold {
                    continue;
                }
                if best.is_none_or(|(top, ..)| score > top) {
                    best = Some((score, *scorer, sa, sb));
                }
            }

            if let Some((score, scorer, sa, sb)) = best {
                matches.push(SliceMatch {
                    slice_id1: a.id,
                    slice_id2: b.id,
                    correlation_score: score,
                    layer_type: scorer.layer(),
                    data_context: DataContext {
                        first: sa.clone(),
                        second: sb.clone(),
                    },
                    narrative_label: scorer.label(sa, sb).to_string(),
                    time_difference_days: days,
                });
            }
        }
    }

    // sort_by is stable: equal scores keep pair-generation order.
    matches.sort_by(|x, y| y.correlation_score.total_cmp(&x.correlation_score));

    tracing::debug!(
        "correlation: {} slices in window, {pairs} pairs compared, {} matches",
        history.len(),
        matches.len()
    );
    Ok(matches)
}
