use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InteropError, Result};
use crate::run::ReadInfo;
use crate::stats::{mean, median, standard_deviation};

/// Mean, standard deviation and median of per-tile values
///
/// Every field is NaN when no tile reported a value; `median` is also NaN
/// when median computation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStat {
    /// Arithmetic mean
    pub mean: f32,
    /// Sample standard deviation
    pub stddev: f32,
    /// Median
    pub median: f32,
}

impl Default for MetricStat {
    fn default() -> Self {
        Self {
            mean: f32::NAN,
            stddev: f32::NAN,
            median: f32::NAN,
        }
    }
}

impl MetricStat {
    /// Summarize `values`, which are reordered when the median is computed
    pub fn from_values(values: &mut [f32], skip_median: bool) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            mean: mean(values.iter().copied()).unwrap_or(f32::NAN),
            stddev: standard_deviation(values.iter().copied()).unwrap_or(f32::NAN),
            median: if skip_median {
                f32::NAN
            } else {
                median(values).unwrap_or(f32::NAN)
            },
        }
    }

    /// True if no value contributed
    pub fn is_empty(&self) -> bool {
        self.mean.is_nan()
    }
}

/// Inclusive range of absolute cycles; starts empty and only ever widens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    first: u16,
    last: u16,
}

impl Default for CycleRange {
    fn default() -> Self {
        Self {
            first: u16::MAX,
            last: 0,
        }
    }
}

impl CycleRange {
    /// Widen the range to include `cycle`
    pub fn update(&mut self, cycle: u16) {
        self.first = self.first.min(cycle);
        self.last = self.last.max(cycle);
    }

    /// True until the first update
    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    /// First cycle, `None` while empty
    pub fn first_cycle(&self) -> Option<u16> {
        (!self.is_empty()).then_some(self.first)
    }

    /// Last cycle, `None` while empty
    pub fn last_cycle(&self) -> Option<u16> {
        (!self.is_empty()).then_some(self.last)
    }
}

impl fmt::Display for CycleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first_cycle(), self.last_cycle()) {
            (Some(first), Some(last)) => write!(f, "{}-{}", first, last),
            _ => f.write_str("-"),
        }
    }
}

/// How far each processing stage got, per lane and read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleStateSummary {
    /// Cycles with error metrics
    pub error_cycle_range: CycleRange,
    /// Cycles with extraction metrics
    pub extracted_cycle_range: CycleRange,
    /// Cycles with q-score metrics
    pub qscored_cycle_range: CycleRange,
    /// Cycles with corrected intensity (base call) metrics
    pub called_cycle_range: CycleRange,
}

/// Statistics for one lane in one read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSummary {
    /// Lane number (1-based)
    pub lane: u16,
    /// Number of tiles reporting any metric in this lane
    pub tile_count: usize,
    /// Cluster density (K/mm²)
    pub density: MetricStat,
    /// Cluster density passing filter
    pub density_pf: MetricStat,
    /// Cluster count
    pub cluster_count: MetricStat,
    /// Cluster count passing filter
    pub cluster_count_pf: MetricStat,
    /// Percentage of clusters passing filter
    pub percent_pf: MetricStat,
    /// Percent phasing
    pub phasing: MetricStat,
    /// Percent prephasing
    pub prephasing: MetricStat,
    /// Percent aligned
    pub percent_aligned: MetricStat,
    /// Error rate over the whole read
    pub error_rate: MetricStat,
    /// Error rate over the first 35 cycles of the read
    pub error_rate_35: MetricStat,
    /// Error rate over the first 50 cycles of the read
    pub error_rate_50: MetricStat,
    /// Error rate over the first 75 cycles of the read
    pub error_rate_75: MetricStat,
    /// Error rate over the first 100 cycles of the read
    pub error_rate_100: MetricStat,
    /// Intensity of the first cycle of the read
    pub first_cycle_intensity: MetricStat,
    /// Percentage of bases at or above Q30
    pub percent_gt_q30: f32,
    /// Yield in gigabases
    pub yield_g: f32,
    /// Yield expected once every cycle of the read is scored
    pub projected_yield_g: f32,
    /// Processing progress
    pub cycle_state: CycleStateSummary,
}

impl LaneSummary {
    /// Create an empty lane summary
    pub fn new(lane: u16) -> Self {
        Self {
            lane,
            tile_count: 0,
            density: MetricStat::default(),
            density_pf: MetricStat::default(),
            cluster_count: MetricStat::default(),
            cluster_count_pf: MetricStat::default(),
            percent_pf: MetricStat::default(),
            phasing: MetricStat::default(),
            prephasing: MetricStat::default(),
            percent_aligned: MetricStat::default(),
            error_rate: MetricStat::default(),
            error_rate_35: MetricStat::default(),
            error_rate_50: MetricStat::default(),
            error_rate_75: MetricStat::default(),
            error_rate_100: MetricStat::default(),
            first_cycle_intensity: MetricStat::default(),
            percent_gt_q30: f32::NAN,
            yield_g: 0.0,
            projected_yield_g: 0.0,
            cycle_state: CycleStateSummary::default(),
        }
    }
}

/// Lane-level figures folded into one row per read
///
/// Rates are means over lanes that reported them; yields are sums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadTotals {
    /// Mean lane error rate
    pub error_rate: f32,
    /// Mean lane percent aligned
    pub percent_aligned: f32,
    /// Mean lane first-cycle intensity
    pub first_cycle_intensity: f32,
    /// Mean lane percentage at or above Q30
    pub percent_gt_q30: f32,
    /// Total yield in gigabases
    pub yield_g: f32,
    /// Total projected yield in gigabases
    pub projected_yield_g: f32,
}

impl Default for ReadTotals {
    fn default() -> Self {
        Self {
            error_rate: f32::NAN,
            percent_aligned: f32::NAN,
            first_cycle_intensity: f32::NAN,
            percent_gt_q30: f32::NAN,
            yield_g: 0.0,
            projected_yield_g: 0.0,
        }
    }
}

/// Lane summaries of one read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadSummary {
    /// The read being summarized
    pub read: ReadInfo,
    /// Lane summaries, sorted by lane
    pub lanes: Vec<LaneSummary>,
    /// Figures over all lanes
    pub totals: ReadTotals,
}

impl ReadSummary {
    /// Create a read summary with one empty entry per lane
    pub fn new(read: ReadInfo, lane_count: usize) -> Self {
        Self {
            read,
            lanes: (1..=lane_count).map(|lane| LaneSummary::new(lane as u16)).collect(),
            totals: ReadTotals::default(),
        }
    }

    /// Lane summary at a position
    pub fn lane(&self, index: usize) -> Result<&LaneSummary> {
        self.lanes.get(index).ok_or(InteropError::IndexOutOfRange {
            kind: "lane",
            index,
            limit: self.lanes.len(),
        })
    }

    /// Number of lane summaries
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// True if no lane is summarized
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Per-read, per-lane run quality summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// One entry per read, in run order
    pub reads: Vec<ReadSummary>,
    /// Number of lanes in the widest read
    pub lane_count: usize,
}

impl RunSummary {
    /// Allocate a `reads x lane_count` table of empty summaries
    pub fn new(reads: &[ReadInfo], lane_count: usize) -> Self {
        Self {
            reads: reads.iter().map(|r| ReadSummary::new(*r, lane_count)).collect(),
            lane_count,
        }
    }

    /// Number of reads
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    /// True if the summary has no reads
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Read summary at a position
    pub fn read(&self, index: usize) -> Result<&ReadSummary> {
        self.reads.get(index).ok_or(InteropError::IndexOutOfRange {
            kind: "read",
            index,
            limit: self.reads.len(),
        })
    }

    /// Lane summary at a read and lane position
    pub fn lane(&self, read: usize, lane: usize) -> Result<&LaneSummary> {
        self.read(read)?.lane(lane)
    }

    /// Total yield over non-index reads, in gigabases
    pub fn total_yield_g(&self) -> f32 {
        self.reads
            .iter()
            .filter(|r| !r.read.is_index)
            .map(|r| r.totals.yield_g)
            .sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:>5} {:>6} {:>12} {:>10} {:>9} {:>9} {:>8} {:>10} {:>10}",
            "Read", "Lane", "Tiles", "Density", "%PF", "%Aligned", "Error", "%>=Q30", "Yield(G)", "Intensity"
        )?;
        for read in &self.reads {
            let label = if read.read.is_index {
                format!("{} (I)", read.read.number)
            } else {
                read.read.number.to_string()
            };
            for lane in &read.lanes {
                writeln!(
                    f,
                    "{:<6} {:>5} {:>6} {:>12.2} {:>10.2} {:>9.2} {:>9.2} {:>8.2} {:>10.2} {:>10.0}",
                    label,
                    lane.lane,
                    lane.tile_count,
                    lane.density.mean,
                    lane.percent_pf.mean,
                    lane.percent_aligned.mean,
                    lane.error_rate.mean,
                    lane.percent_gt_q30,
                    lane.yield_g,
                    lane.first_cycle_intensity.mean,
                )?;
            }
            writeln!(
                f,
                "{:<6} {:>5} {:>6} {:>12} {:>10} {:>9.2} {:>9.2} {:>8.2} {:>10.2} {:>10.0}",
                label,
                "Total",
                "",
                "",
                "",
                read.totals.percent_aligned,
                read.totals.error_rate,
                read.totals.percent_gt_q30,
                read.totals.yield_g,
                read.totals.first_cycle_intensity,
            )?;
        }
        write!(f, "Total yield: {:.2} G", self.total_yield_g())
    }
}
