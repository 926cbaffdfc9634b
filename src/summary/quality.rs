use std::collections::BTreeMap;

use super::{lane_index, CycleToRead, RunSummary};
use crate::error::Result;
use crate::metrics::{MetricSet, QCollapsedMetric};

const BASES_PER_GIGABASE: f64 = 1e9;

#[derive(Debug, Default)]
struct QualityTotals {
    q30: u64,
    total: u64,
    max_cycle: u16,
}

/// % >= Q30, yield and projected yield for each read and lane
///
/// The projection scales the yield by the ratio of the read's cycle count to
/// the last cycle scored so far.
pub(super) fn summarize_collapsed_quality_metrics(
    collapsed: &MetricSet<QCollapsedMetric>,
    cycle_to_read: &CycleToRead,
    summary: &mut RunSummary,
) -> Result<()> {
    let lane_count = summary.lane_count;
    let mut by_lane: BTreeMap<(usize, usize), QualityTotals> = BTreeMap::new();
    for metric in collapsed {
        let lane = lane_index(metric.lane, lane_count)?;
        let Some(position) = cycle_to_read.get(metric.cycle) else {
            continue;
        };
        let totals = by_lane.entry((position.read_index, lane)).or_default();
        totals.q30 += metric.q30 as u64;
        totals.total += metric.total as u64;
        totals.max_cycle = totals.max_cycle.max(position.cycle_within_read);
    }

    for ((read, lane), totals) in by_lane {
        let read_cycles = summary.reads[read].read.total_cycles() as f64;
        let lane = &mut summary.reads[read].lanes[lane];
        let yield_g = totals.total as f64 / BASES_PER_GIGABASE;
        lane.yield_g = yield_g as f32;
        if totals.total > 0 {
            lane.percent_gt_q30 = (totals.q30 as f64 / totals.total as f64 * 100.0) as f32;
        }
        if totals.max_cycle > 0 {
            lane.projected_yield_g = (yield_g * read_cycles / totals.max_cycle as f64) as f32;
        }
    }
    Ok(())
}
