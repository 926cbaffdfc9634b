use serde::{Deserialize, Serialize};

use super::{MetricRecord, MetricSet, QMetric};
use crate::constants::MetricGroup;

/// Q20/Q30 base counts of one tile at one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QCollapsedMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Absolute cycle (1-based)
    pub cycle: u16,
    /// Bases at or above Q20
    pub q20: u32,
    /// Bases at or above Q30
    pub q30: u32,
    /// Total number of bases
    pub total: u32,
    /// Q-score of the median base
    pub median_qscore: u32,
}

impl QCollapsedMetric {
    /// Create a collapsed q-score metric
    pub fn new(lane: u16, tile: u32, cycle: u16, q20: u32, q30: u32, total: u32, median_qscore: u32) -> Self {
        Self {
            lane,
            tile,
            cycle,
            q20,
            q30,
            total,
            median_qscore,
        }
    }

    /// Percentage of bases at or above Q20
    pub fn percent_over_q20(&self) -> Option<f32> {
        percent(self.q20, self.total)
    }

    /// Percentage of bases at or above Q30
    pub fn percent_over_q30(&self) -> Option<f32> {
        percent(self.q30, self.total)
    }
}

fn percent(count: u32, total: u32) -> Option<f32> {
    if total == 0 {
        None
    } else {
        Some((count as f64 / total as f64 * 100.0) as f32)
    }
}

impl MetricRecord for QCollapsedMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::QCollapsed;

    fn lane(&self) -> u16 {
        self.lane
    }

    fn tile(&self) -> u32 {
        self.tile
    }

    fn cycle(&self) -> u16 {
        self.cycle
    }
}

impl QCollapsedMetric {
    /// Collapse one q-score histogram using the binning of its set
    pub fn from_q_metric(metric: &QMetric, header: &super::QScoreHeader) -> Self {
        let clamp = |v: u64| v.min(u32::MAX as u64) as u32;
        Self::new(
            metric.lane,
            metric.tile,
            metric.cycle,
            clamp(metric.count_at_or_above(20, header)),
            clamp(metric.count_at_or_above(30, header)),
            clamp(metric.total()),
            metric.median_qscore(header),
        )
    }
}

/// Derive collapsed q-score records from a full q-score set
///
/// Records keep the order of the source set. The derived set carries version
/// 2, the collapsed layout this crate writes.
pub fn collapse_q_metrics(q_metrics: &MetricSet<QMetric>) -> MetricSet<QCollapsedMetric> {
    let header = q_metrics.header();
    MetricSet::from_records(
        2,
        (),
        q_metrics
            .iter()
            .map(|metric| QCollapsedMetric::from_q_metric(metric, header)),
    )
}
