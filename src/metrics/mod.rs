//! # Metric record model
//!
//! One record type per metric file family. Every record is keyed by lane and
//! tile; cycle-scoped records add the absolute cycle, and index records add
//! the read number. Records of one type are collected in a [`MetricSet`], and
//! [`RunMetrics`] bundles one set per family.

mod corrected_intensity;
mod error_metric;
mod extraction;
mod index;
mod metric_set;
mod q;
mod q_collapsed;
mod run_metrics;
mod tile;

use std::fmt;

pub use corrected_intensity::CorrectedIntensityMetric;
pub use error_metric::ErrorMetric;
pub use extraction::ExtractionMetric;
pub use index::{IndexInfo, IndexMetric};
pub use metric_set::MetricSet;
pub use q::{QMetric, QScoreBin, QScoreHeader, MAX_Q_BINS};
pub use q_collapsed::{collapse_q_metrics, QCollapsedMetric};
pub use run_metrics::RunMetrics;
pub use tile::{TileMetric, TileReadMetric};

use crate::constants::MetricGroup;

/// Composite key of a record: lane, tile and cycle (or read)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Cycle (or read) number, 0 for tile-scoped records
    pub cycle: u16,
}

impl MetricId {
    /// Create a metric id
    pub fn new(lane: u16, tile: u32, cycle: u16) -> Self {
        Self { lane, tile, cycle }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {} tile {} cycle {}", self.lane, self.tile, self.cycle)
    }
}

/// Common view of every metric record
pub trait MetricRecord: Clone + fmt::Debug {
    /// Per-file header shared by every record of the set
    type Header: Clone + Default + fmt::Debug + PartialEq;

    /// File family the record belongs to
    const GROUP: MetricGroup;

    /// Lane number (1-based)
    fn lane(&self) -> u16;

    /// Tile number
    fn tile(&self) -> u32;

    /// Absolute cycle (or read number); 0 for tile-scoped records
    fn cycle(&self) -> u16 {
        0
    }

    /// Composite key
    fn id(&self) -> MetricId {
        MetricId::new(self.lane(), self.tile(), self.cycle())
    }
}
