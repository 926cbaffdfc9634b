use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::MetricGroup;

/// Number of mismatch buckets (reads with 0, 1, 2, 3 and 4 errors)
pub const MAX_MISMATCH: usize = 5;

/// Alignment error rate of one tile at one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Absolute cycle (1-based)
    pub cycle: u16,
    /// Percentage of mismatched bases against the control
    pub error_rate: f32,
    /// Number of perfect reads, reads with one error, ... four errors
    pub mismatch_counts: [u32; MAX_MISMATCH],
}

impl ErrorMetric {
    /// Create an error metric
    pub fn new(
        lane: u16,
        tile: u32,
        cycle: u16,
        error_rate: f32,
        mismatch_counts: [u32; MAX_MISMATCH],
    ) -> Self {
        Self {
            lane,
            tile,
            cycle,
            error_rate,
            mismatch_counts,
        }
    }
}

impl MetricRecord for ErrorMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::Error;

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
