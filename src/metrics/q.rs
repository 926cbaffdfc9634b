use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::MetricGroup;

/// Number of histogram slots in an unbinned q-score record
pub const MAX_Q_BINS: usize = 50;

/// One q-score bin: scores in `lower..=upper` are reported as `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QScoreBin {
    /// Lowest q-score in the bin
    pub lower: u8,
    /// Highest q-score in the bin
    pub upper: u8,
    /// Q-score every base in the bin is reported as
    pub value: u8,
}

impl QScoreBin {
    /// Create a q-score bin
    pub fn new(lower: u8, upper: u8, value: u8) -> Self {
        Self {
            lower,
            upper,
            value,
        }
    }
}

/// Header of a q-score metric file: the binning, empty when unbinned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QScoreHeader {
    /// Bins in ascending order
    pub bins: Vec<QScoreBin>,
}

impl QScoreHeader {
    /// Header for binned data
    pub fn binned(bins: Vec<QScoreBin>) -> Self {
        Self { bins }
    }

    /// True when the histogram is reported per bin
    pub fn is_binned(&self) -> bool {
        !self.bins.is_empty()
    }

    /// Q-score represented by a histogram slot
    ///
    /// A histogram compressed to one slot per bin uses the bin's value; a
    /// full-length histogram uses slot `i` for Q`i + 1`.
    pub fn qscore_at(&self, slot: usize, histogram_len: usize) -> u32 {
        if self.is_binned() && histogram_len == self.bins.len() {
            self.bins[slot].value as u32
        } else {
            slot as u32 + 1
        }
    }
}

/// Q-score histogram of one tile at one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Absolute cycle (1-based)
    pub cycle: u16,
    /// Base counts per histogram slot
    pub histogram: Vec<u32>,
}

impl QMetric {
    /// Create a q-score metric
    pub fn new(lane: u16, tile: u32, cycle: u16, histogram: Vec<u32>) -> Self {
        Self {
            lane,
            tile,
            cycle,
            histogram,
        }
    }

    /// Total number of bases
    pub fn total(&self) -> u64 {
        self.histogram.iter().map(|&c| c as u64).sum()
    }

    /// Number of bases with a q-score of at least `qscore`
    pub fn count_at_or_above(&self, qscore: u32, header: &QScoreHeader) -> u64 {
        let len = self.histogram.len();
        self.histogram
            .iter()
            .enumerate()
            .filter(|(slot, _)| header.qscore_at(*slot, len) >= qscore)
            .map(|(_, &c)| c as u64)
            .sum()
    }

    /// Percentage of bases with a q-score of at least `qscore`
    pub fn percent_over_qscore(&self, qscore: u32, header: &QScoreHeader) -> Option<f32> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some((self.count_at_or_above(qscore, header) as f64 / total as f64 * 100.0) as f32)
    }

    /// Q-score of the median base, 0 when the histogram is empty
    pub fn median_qscore(&self, header: &QScoreHeader) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let len = self.histogram.len();
        let mut cumulative = 0u64;
        for (slot, &count) in self.histogram.iter().enumerate() {
            cumulative += count as u64;
            if cumulative * 2 >= total {
                return header.qscore_at(slot, len);
            }
        }
        header.qscore_at(len - 1, len)
    }
}

impl MetricRecord for QMetric {
    type Header = QScoreHeader;
    const GROUP: MetricGroup = MetricGroup::Q;

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
