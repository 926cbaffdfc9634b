use log::debug;

use super::{
    collapse_q_metrics, CorrectedIntensityMetric, ErrorMetric, ExtractionMetric, IndexMetric,
    MetricSet, QCollapsedMetric, QMetric, TileMetric,
};

/// One metric set per file family of a run
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    /// Tile metrics
    pub tile: MetricSet<TileMetric>,
    /// Error metrics
    pub error: MetricSet<ErrorMetric>,
    /// Extraction metrics
    pub extraction: MetricSet<ExtractionMetric>,
    /// Q-score metrics
    pub q: MetricSet<QMetric>,
    /// Collapsed q-score metrics; derived from `q` when absent
    pub q_collapsed: MetricSet<QCollapsedMetric>,
    /// Corrected intensity metrics
    pub corrected_intensity: MetricSet<CorrectedIntensityMetric>,
    /// Index metrics
    pub index: MetricSet<IndexMetric>,
}

impl RunMetrics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no set holds any record
    pub fn is_empty(&self) -> bool {
        self.tile.is_empty()
            && self.error.is_empty()
            && self.extraction.is_empty()
            && self.q.is_empty()
            && self.q_collapsed.is_empty()
            && self.corrected_intensity.is_empty()
            && self.index.is_empty()
    }

    /// Collapsed q-score set, deriving it from the q-score set on first use
    pub fn q_collapsed_or_derive(&mut self) -> &MetricSet<QCollapsedMetric> {
        if self.q_collapsed.is_empty() && !self.q.is_empty() {
            debug!(
                "Deriving {} collapsed q-score records from q-score metrics",
                self.q.len()
            );
            self.q_collapsed = collapse_q_metrics(&self.q);
        }
        &self.q_collapsed
    }

    /// Distinct tiles observed for a lane in each set, largest count wins
    pub fn max_tile_count_for_lane(&self, lane: u16) -> usize {
        [
            self.tile.tile_numbers_for_lane(lane).len(),
            self.error.tile_numbers_for_lane(lane).len(),
            self.extraction.tile_numbers_for_lane(lane).len(),
            self.q.tile_numbers_for_lane(lane).len(),
            self.q_collapsed.tile_numbers_for_lane(lane).len(),
            self.corrected_intensity.tile_numbers_for_lane(lane).len(),
            self.index.tile_numbers_for_lane(lane).len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}
