use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::{DnaBase, MetricGroup, NUM_OF_BASES, NUM_OF_BASES_AND_NC};

/// Intensities after cross-talk and phasing correction, one tile at one cycle
///
/// `called_counts` is indexed no-call first, then A, C, G, T.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectedIntensityMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Absolute cycle (1-based)
    pub cycle: u16,
    /// Average intensity over all channels
    pub average_cycle_intensity: u16,
    /// Average corrected intensity per base, over all clusters
    pub corrected_int_all: [u16; NUM_OF_BASES],
    /// Average corrected intensity per base, over clusters called as that base
    pub corrected_int_called: [u16; NUM_OF_BASES],
    /// Number of clusters called as no-call, A, C, G, T
    pub called_counts: [u32; NUM_OF_BASES_AND_NC],
    /// Signal to noise ratio
    pub signal_to_noise: f32,
}

impl CorrectedIntensityMetric {
    /// Create a record carrying only the called intensities and counts
    pub fn new(
        lane: u16,
        tile: u32,
        cycle: u16,
        corrected_int_called: [u16; NUM_OF_BASES],
        called_counts: [u32; NUM_OF_BASES_AND_NC],
    ) -> Self {
        Self {
            lane,
            tile,
            cycle,
            corrected_int_called,
            called_counts,
            ..Self::default()
        }
    }

    /// Number of clusters called as `base`
    pub fn called_count(&self, base: DnaBase) -> Option<u32> {
        let slot = base.code() as i16 + 1;
        if slot < 0 {
            return None;
        }
        self.called_counts.get(slot as usize).copied()
    }

    /// Total number of clusters, calls and no-calls
    pub fn total_calls(&self) -> u64 {
        self.called_counts.iter().map(|&c| c as u64).sum()
    }

    /// Percentage of called clusters (no-calls excluded) called as `base`
    pub fn percent_base(&self, base: DnaBase) -> Option<f32> {
        if base == DnaBase::NoCall {
            return None;
        }
        let called: u64 = self.called_counts[1..].iter().map(|&c| c as u64).sum();
        if called == 0 {
            return None;
        }
        self.called_count(base)
            .map(|count| (count as f64 / called as f64 * 100.0) as f32)
    }

    /// Percentage of clusters that were not called
    pub fn percent_nocall(&self) -> Option<f32> {
        let total = self.total_calls();
        if total == 0 {
            None
        } else {
            Some((self.called_counts[0] as f64 / total as f64 * 100.0) as f32)
        }
    }
}

impl MetricRecord for CorrectedIntensityMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::CorrectedInt;

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
