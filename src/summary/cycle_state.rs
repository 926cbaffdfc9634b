use std::collections::{BTreeMap, HashSet};

use super::{lane_index, CycleRange, CycleStateSummary, CycleToRead, RunSummary};
use crate::error::Result;
use crate::metrics::{MetricRecord, MetricSet, TileMetric};

/// Processing stage tracked by a [`CycleStateSummary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    /// Error metrics
    Error,
    /// Extraction metrics
    Extracted,
    /// Q-score metrics
    Qscored,
    /// Corrected intensity metrics
    Called,
}

impl CycleStateSummary {
    /// Range tracked for a stage
    pub fn range(&self, stage: CycleStage) -> &CycleRange {
        match stage {
            CycleStage::Error => &self.error_cycle_range,
            CycleStage::Extracted => &self.extracted_cycle_range,
            CycleStage::Qscored => &self.qscored_cycle_range,
            CycleStage::Called => &self.called_cycle_range,
        }
    }

    fn range_mut(&mut self, stage: CycleStage) -> &mut CycleRange {
        match stage {
            CycleStage::Error => &mut self.error_cycle_range,
            CycleStage::Extracted => &mut self.extracted_cycle_range,
            CycleStage::Qscored => &mut self.qscored_cycle_range,
            CycleStage::Called => &mut self.called_cycle_range,
        }
    }
}

/// Widen one stage's cycle range for every read and lane
///
/// Each tile contributes its first and last cycle within the read. The lane
/// range runs from the earliest first cycle to the earliest last cycle, i.e.
/// the cycles every tile has reached. Only tiles listed in the tile metrics
/// count, unless the tile metrics have nothing for the lane.
pub(super) fn summarize_cycle_state<T: MetricRecord>(
    tiles: &MetricSet<TileMetric>,
    set: &MetricSet<T>,
    cycle_to_read: &CycleToRead,
    stage: CycleStage,
    summary: &mut RunSummary,
) -> Result<()> {
    let lane_count = summary.lane_count;
    let known_tiles: Vec<HashSet<u32>> = (1..=lane_count)
        .map(|lane| tiles.tile_numbers_for_lane(lane as u16).into_iter().collect())
        .collect();

    let mut by_tile: BTreeMap<(usize, usize, u32), (u16, u16)> = BTreeMap::new();
    for metric in set {
        let lane = lane_index(metric.lane(), lane_count)?;
        let tile = metric.tile();
        if !known_tiles[lane].is_empty() && !known_tiles[lane].contains(&tile) {
            continue;
        }
        let cycle = metric.cycle();
        let Some(position) = cycle_to_read.get(cycle) else {
            continue;
        };
        let extent = by_tile
            .entry((position.read_index, lane, tile))
            .or_insert((u16::MAX, 0));
        extent.0 = extent.0.min(cycle);
        extent.1 = extent.1.max(cycle);
    }

    let mut by_lane: BTreeMap<(usize, usize), (u16, u16)> = BTreeMap::new();
    for ((read, lane, _tile), (first, last)) in by_tile {
        let extent = by_lane.entry((read, lane)).or_insert((u16::MAX, u16::MAX));
        extent.0 = extent.0.min(first);
        extent.1 = extent.1.min(last);
    }

    for ((read, lane), (first, last)) in by_lane {
        let range = summary.reads[read].lanes[lane].cycle_state.range_mut(stage);
        range.update(first);
        range.update(last);
    }
    Ok(())
}
