use super::{lane_index, MetricStat, RunSummary};
use crate::error::Result;
use crate::metrics::{MetricSet, TileMetric};

/// Densities are reported in K/mm²
const DENSITY_SCALE: f32 = 1_000.0;

#[derive(Debug, Default)]
struct LaneValues {
    density: Vec<f32>,
    density_pf: Vec<f32>,
    cluster_count: Vec<f32>,
    cluster_count_pf: Vec<f32>,
    percent_pf: Vec<f32>,
}

#[derive(Debug, Default, Clone)]
struct ReadValues {
    phasing: Vec<f32>,
    prephasing: Vec<f32>,
    percent_aligned: Vec<f32>,
}

/// Density, cluster counts and % PF for every read of each lane, plus the
/// per-read phasing, prephasing and % aligned figures
pub(super) fn summarize_tile_metrics(
    tiles: &MetricSet<TileMetric>,
    summary: &mut RunSummary,
    skip_median: bool,
) -> Result<()> {
    let lane_count = summary.lane_count;
    let mut lanes: Vec<LaneValues> = (0..lane_count).map(|_| LaneValues::default()).collect();
    let mut reads = vec![vec![ReadValues::default(); lane_count]; summary.len()];

    for metric in tiles {
        let lane = lane_index(metric.lane, lane_count)?;
        let values = &mut lanes[lane];
        values.density.extend(metric.cluster_density.map(|d| d / DENSITY_SCALE));
        values.density_pf.extend(metric.cluster_density_pf.map(|d| d / DENSITY_SCALE));
        values.cluster_count.extend(metric.cluster_count);
        values.cluster_count_pf.extend(metric.cluster_count_pf);
        values.percent_pf.extend(metric.percent_pf());

        for read in &metric.reads {
            // Reads missing from the layout are not summarized
            let Some(read_index) = summary.reads.iter().position(|r| r.read.number == read.read) else {
                continue;
            };
            let values = &mut reads[read_index][lane];
            values.phasing.extend(read.percent_phasing);
            values.prephasing.extend(read.percent_prephasing);
            values.percent_aligned.extend(read.percent_aligned);
        }
    }

    for (read, read_values) in summary.reads.iter_mut().zip(reads.iter_mut()) {
        for ((lane, values), per_read) in read.lanes.iter_mut().zip(lanes.iter_mut()).zip(read_values.iter_mut()) {
            lane.density = MetricStat::from_values(&mut values.density, skip_median);
            lane.density_pf = MetricStat::from_values(&mut values.density_pf, skip_median);
            lane.cluster_count = MetricStat::from_values(&mut values.cluster_count, skip_median);
            lane.cluster_count_pf = MetricStat::from_values(&mut values.cluster_count_pf, skip_median);
            lane.percent_pf = MetricStat::from_values(&mut values.percent_pf, skip_median);
            lane.phasing = MetricStat::from_values(&mut per_read.phasing, skip_median);
            lane.prephasing = MetricStat::from_values(&mut per_read.prephasing, skip_median);
            lane.percent_aligned = MetricStat::from_values(&mut per_read.percent_aligned, skip_median);
        }
    }
    Ok(())
}
