//! Candle sticks of per-tile values in each lane

use std::collections::BTreeMap;

use log::debug;

use super::{plot_candle_stick, CandleStickPoint, FilterOptions, PlotData, Series};
use crate::constants::{MetricGroup, MetricType};
use crate::error::Result;
use crate::metrics::{RunMetrics, TileMetric};

/// Tile-level value plotted for a metric type, in display units
///
/// Densities are shown in K/mm², cluster and aligned read counts in millions.
pub(super) fn tile_values(metric: &TileMetric, metric_type: MetricType, read: Option<u16>) -> Vec<f32> {
    let scaled = |value: Option<f32>, scale: f32| -> Vec<f32> { value.map(|v| v / scale).into_iter().collect() };
    match metric_type {
        MetricType::Clusters => scaled(metric.cluster_density, 1_000.0),
        MetricType::ClustersPf => scaled(metric.cluster_density_pf, 1_000.0),
        MetricType::ClusterCount => scaled(metric.cluster_count, 1_000_000.0),
        MetricType::ClusterCountPf => scaled(metric.cluster_count_pf, 1_000_000.0),
        MetricType::AlignedReadCount => metric
            .reads
            .iter()
            .filter(|r| read.map_or(true, |n| r.read == n))
            .filter_map(|r| metric.aligned_read_count(r.read))
            .map(|count| count / 1_000_000.0)
            .collect(),
        MetricType::PercentPhasing | MetricType::PercentPrephasing | MetricType::PercentAligned => metric
            .reads
            .iter()
            .filter(|r| read.map_or(true, |n| r.read == n))
            .filter_map(|r| match metric_type {
                MetricType::PercentPhasing => r.percent_phasing,
                MetricType::PercentPrephasing => r.percent_prephasing,
                _ => r.percent_aligned,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Plot a tile-level metric type against lane
///
/// Produces a single series with one point per lane that has data. Metric
/// types reported per cycle produce an empty chart.
pub fn plot_by_lane(
    metrics: &RunMetrics,
    metric_type: MetricType,
    options: &FilterOptions,
) -> Result<PlotData<CandleStickPoint>> {
    options.validate(metric_type, 0)?;
    let mut data = PlotData::default();
    if metric_type.group() != MetricGroup::Tile {
        debug!("{} ({} metrics) cannot be plotted by lane", metric_type, metric_type.group());
        return Ok(data);
    }

    let mut by_lane: BTreeMap<u16, Vec<f32>> = BTreeMap::new();
    for metric in metrics.tile.iter() {
        if options.accepts_tile(metric.lane, metric.tile) {
            by_lane
                .entry(metric.lane)
                .or_default()
                .extend(tile_values(metric, metric_type, options.read));
        }
    }

    let mut line = Series::new(metric_type.name());
    let mut outliers = Vec::with_capacity(16);
    for (lane, mut values) in by_lane {
        if !values.is_empty() {
            line.points
                .push(plot_candle_stick(&mut values, lane as f32, &mut outliers));
        }
    }
    data.series.push(line);
    data.fit_axes("Lane", metric_type.name());
    Ok(data)
}
