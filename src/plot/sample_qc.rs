//! Share of passing-filter reads assigned to each sample of a lane

use std::collections::BTreeMap;

use log::debug;

use super::{Axis, BarPoint, PlotData, Series};
use crate::error::Result;
use crate::metrics::RunMetrics;

/// Lowest top of the y axis, in percent
const MIN_Y_MAX: f32 = 5.0;

/// Bar chart of the percentage of passing-filter clusters identified as
/// each sample in `lane`
///
/// Samples are keyed by sample id and index sequence, and numbered from 1 in
/// that order. The denominator is the sum of passing-filter cluster counts
/// over the lane's tiles; without it every bar is zero.
pub fn plot_sample_qc(metrics: &RunMetrics, lane: u16) -> Result<PlotData<BarPoint>> {
    let mut samples: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for metric in metrics.index.iter().filter(|m| m.lane == lane) {
        for info in &metric.indices {
            *samples
                .entry((info.sample_id.as_str(), info.index_sequence.as_str()))
                .or_default() += info.cluster_count as u64;
        }
    }
    let pf_clusters: f64 = metrics
        .tile
        .iter()
        .filter(|m| m.lane == lane)
        .filter_map(|m| m.cluster_count_pf)
        .map(f64::from)
        .sum();

    let mut bars = Series::new("% reads");
    for (number, clusters) in samples.values().enumerate() {
        let percent = if pf_clusters > 0.0 {
            (*clusters as f64 / pf_clusters * 100.0) as f32
        } else {
            0.0
        };
        bars.points.push(BarPoint::new((number + 1) as f32, percent, 1.0));
    }
    debug!("Sample QC for lane {}: {} samples", lane, bars.points.len());

    let x_max = if bars.points.is_empty() {
        0.0
    } else {
        bars.points.len() as f32 + 1.0
    };
    let y_max = bars.points.iter().map(|b| b.y * 1.1).fold(MIN_Y_MAX, f32::max);
    Ok(PlotData {
        title: String::new(),
        x_axis: Axis::new("Index Number", 0.0, x_max),
        y_axis: Axis::new("% Reads Identified (PF)", 0.0, y_max),
        series: vec![bars],
    })
}
