use std::collections::BTreeMap;

use super::{lane_index, CycleToRead, MetricStat, RunSummary};
use crate::error::{InteropError, Result};
use crate::metrics::{ExtractionMetric, MetricSet};

/// Intensity of `channel` at the first cycle of each read
pub(super) fn summarize_extraction_metrics(
    extraction: &MetricSet<ExtractionMetric>,
    cycle_to_read: &CycleToRead,
    channel: usize,
    summary: &mut RunSummary,
    skip_median: bool,
) -> Result<()> {
    let lane_count = summary.lane_count;
    let mut by_lane: BTreeMap<(usize, usize), Vec<f32>> = BTreeMap::new();
    for metric in extraction {
        let lane = lane_index(metric.lane, lane_count)?;
        let Some(position) = cycle_to_read.get(metric.cycle) else {
            continue;
        };
        if position.cycle_within_read != 1 {
            continue;
        }
        let intensity = metric.intensity(channel).ok_or_else(|| {
            InteropError::InvalidChannelConfiguration(format!(
                "intensity channel {} is outside the extraction record",
                channel
            ))
        })?;
        by_lane
            .entry((position.read_index, lane))
            .or_default()
            .push(intensity as f32);
    }

    for ((read, lane), mut values) in by_lane {
        summary.reads[read].lanes[lane].first_cycle_intensity = MetricStat::from_values(&mut values, skip_median);
    }
    Ok(())
}
