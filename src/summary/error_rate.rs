use std::collections::BTreeMap;

use super::{lane_index, CycleToRead, MetricStat, RunSummary};
use crate::error::Result;
use crate::metrics::{ErrorMetric, MetricSet};
use crate::stats::mean;

/// Cycle limits of the "error rate over the first N cycles" figures
pub const ERROR_CYCLE_LIMITS: [u16; 4] = [35, 50, 75, 100];

/// Mean error rate per tile over each read, and over the first 35, 50, 75
/// and 100 cycles of the read for tiles that reached that cycle
pub(super) fn summarize_error_metrics(
    errors: &MetricSet<ErrorMetric>,
    cycle_to_read: &CycleToRead,
    summary: &mut RunSummary,
    skip_median: bool,
) -> Result<()> {
    let lane_count = summary.lane_count;
    let mut by_tile: BTreeMap<(usize, usize, u32), Vec<(u16, f32)>> = BTreeMap::new();
    for metric in errors {
        let lane = lane_index(metric.lane, lane_count)?;
        let Some(position) = cycle_to_read.get(metric.cycle) else {
            continue;
        };
        by_tile
            .entry((position.read_index, lane, metric.tile))
            .or_default()
            .push((position.cycle_within_read, metric.error_rate));
    }

    let mut by_lane: BTreeMap<(usize, usize), [Vec<f32>; 5]> = BTreeMap::new();
    for ((read, lane, _tile), cycles) in by_tile {
        let max_cycle = cycles.iter().map(|(cycle, _)| *cycle).max().unwrap_or(0);
        let rates = by_lane.entry((read, lane)).or_default();
        rates[0].extend(mean(cycles.iter().map(|(_, rate)| *rate)));
        for (slot, &limit) in ERROR_CYCLE_LIMITS.iter().enumerate() {
            if max_cycle >= limit {
                rates[slot + 1].extend(mean(
                    cycles
                        .iter()
                        .filter(|(cycle, _)| *cycle <= limit)
                        .map(|(_, rate)| *rate),
                ));
            }
        }
    }

    for ((read, lane), mut rates) in by_lane {
        let lane = &mut summary.reads[read].lanes[lane];
        lane.error_rate = MetricStat::from_values(&mut rates[0], skip_median);
        lane.error_rate_35 = MetricStat::from_values(&mut rates[1], skip_median);
        lane.error_rate_50 = MetricStat::from_values(&mut rates[2], skip_median);
        lane.error_rate_75 = MetricStat::from_values(&mut rates[3], skip_median);
        lane.error_rate_100 = MetricStat::from_values(&mut rates[4], skip_median);
    }
    Ok(())
}
