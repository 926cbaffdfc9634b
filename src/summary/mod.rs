//! # Run summary aggregation
//!
//! Reduces the metric sets of a run into a [`RunSummary`]: one
//! [`ReadSummary`] per read, each holding one [`LaneSummary`] per lane that
//! reported any tile.
//!
//! ```rust
//! use interop::metrics::{ErrorMetric, RunMetrics, TileMetric};
//! use interop::run::{FlowcellLayout, ReadInfo, RunLayout};
//! use interop::summary::summarize_run_metrics;
//!
//! let layout = RunLayout::new(
//!     vec![ReadInfo::new(1, 1, 26), ReadInfo::new(2, 27, 76)],
//!     FlowcellLayout::new(2, 2, 1, 1),
//! );
//! let mut metrics = RunMetrics::new();
//! metrics.tile.push(TileMetric::new(1, 1101, 150_000.0, 140_000.0, 1.0e6, 0.9e6));
//! metrics.error.push(ErrorMetric::new(1, 1101, 1, 0.25, [0; 5]));
//!
//! let summary = summarize_run_metrics(&mut metrics, &layout, false)?;
//! assert_eq!(summary.lane_count, 1);
//! assert_eq!(summary.reads[0].lanes[0].error_rate.mean, 0.25);
//! # Ok::<(), interop::InteropError>(())
//! ```

mod cycle_map;
mod cycle_state;
mod error_rate;
mod extraction;
mod quality;
mod tile;
mod types;


use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{InteropError, Result};
use crate::metrics::RunMetrics;
use crate::run::RunLayout;

pub use cycle_map::{CycleToRead, ReadCycle};
pub use cycle_state::CycleStage;
pub use error_rate::ERROR_CYCLE_LIMITS;
pub use types::{CycleRange, CycleStateSummary, LaneSummary, MetricStat, ReadSummary, ReadTotals, RunSummary};

use cycle_state::summarize_cycle_state;
use error_rate::summarize_error_metrics;
use extraction::summarize_extraction_metrics;
use quality::summarize_collapsed_quality_metrics;
use tile::summarize_tile_metrics;

/// Options for [`summarize_run_metrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Skip median computation; medians are reported as NaN
    pub skip_median: bool,
}

/// Position of a 1-based lane number in a table of `lane_count` lanes
fn lane_index(lane: u16, lane_count: usize) -> Result<usize> {
    if lane == 0 || lane as usize > lane_count {
        return Err(InteropError::IndexOutOfRange {
            kind: "lane",
            index: lane as usize,
            limit: lane_count,
        });
    }
    Ok(lane as usize - 1)
}

/// Summarize every metric set of a run
///
/// The collapsed q-score set is derived from the q-score set when it is
/// empty, which is why `metrics` is borrowed mutably. Fails without a
/// partial result when a record names a lane outside the layout, when reads
/// overlap, or when the layout's channels cannot be mapped.
pub fn summarize_run_metrics(metrics: &mut RunMetrics, layout: &RunLayout, skip_median: bool) -> Result<RunSummary> {
    if metrics.is_empty() {
        info!("No metrics loaded, nothing to summarize");
        return Ok(RunSummary::default());
    }

    let lane_count = layout.lane_count();
    info!(
        "Summarizing {} reads across {} lanes (skip median: {})",
        layout.reads.len(),
        lane_count,
        skip_median
    );
    let mut summary = RunSummary::new(&layout.reads, lane_count);
    let cycle_to_read = CycleToRead::new(&layout.reads)?;

    summarize_tile_metrics(&metrics.tile, &mut summary, skip_median)?;
    summarize_error_metrics(&metrics.error, &cycle_to_read, &mut summary, skip_median)?;

    let intensity_channel = layout
        .expected_to_actual_channels()?
        .first()
        .copied()
        .ok_or_else(|| InteropError::InvalidChannelConfiguration("no channels configured".to_string()))?;
    debug!("First-cycle intensity read from channel {}", intensity_channel);
    summarize_extraction_metrics(
        &metrics.extraction,
        &cycle_to_read,
        intensity_channel,
        &mut summary,
        skip_median,
    )?;

    let collapsed = metrics.q_collapsed_or_derive();
    summarize_collapsed_quality_metrics(collapsed, &cycle_to_read, &mut summary)?;

    summarize_tile_count(metrics, &mut summary);

    summarize_cycle_state(&metrics.tile, &metrics.error, &cycle_to_read, CycleStage::Error, &mut summary)?;
    summarize_cycle_state(
        &metrics.tile,
        &metrics.extraction,
        &cycle_to_read,
        CycleStage::Extracted,
        &mut summary,
    )?;
    summarize_cycle_state(&metrics.tile, &metrics.q, &cycle_to_read, CycleStage::Qscored, &mut summary)?;
    summarize_cycle_state(
        &metrics.tile,
        &metrics.corrected_intensity,
        &cycle_to_read,
        CycleStage::Called,
        &mut summary,
    )?;

    prune_empty_lanes(&mut summary);
    summarize_read_totals(&mut summary);

    info!(
        "Summary complete: {} reads, {} lanes, {:.2} G total yield",
        summary.len(),
        summary.lane_count,
        summary.total_yield_g()
    );
    Ok(summary)
}

/// Set every lane's tile count to the most tiles any metric set reports for it
fn summarize_tile_count(metrics: &RunMetrics, summary: &mut RunSummary) {
    for lane in 0..summary.lane_count {
        let tile_count = metrics.max_tile_count_for_lane(lane as u16 + 1);
        for read in &mut summary.reads {
            read.lanes[lane].tile_count = tile_count;
        }
    }
}

/// Drop lanes without tiles, sort the rest and recount lanes
fn prune_empty_lanes(summary: &mut RunSummary) {
    let mut lane_count = 0;
    for read in &mut summary.reads {
        let before = read.lanes.len();
        read.lanes.retain(|lane| lane.tile_count > 0);
        read.lanes.sort_by_key(|lane| lane.lane);
        if read.lanes.len() < before {
            debug!(
                "Read {}: dropped {} lanes without tiles",
                read.read.number,
                before - read.lanes.len()
            );
        }
        lane_count = lane_count.max(read.lanes.len());
    }
    summary.lane_count = lane_count;
}

/// Mean of the values that are not NaN
fn mean_reported(values: impl Iterator<Item = f32>) -> f32 {
    crate::stats::mean(values.filter(|v| !v.is_nan())).unwrap_or(f32::NAN)
}

/// Fold lane figures into per-read totals: rates averaged, yields summed
fn summarize_read_totals(summary: &mut RunSummary) {
    for read in &mut summary.reads {
        let lanes = &read.lanes;
        read.totals = ReadTotals {
            error_rate: mean_reported(lanes.iter().map(|l| l.error_rate.mean)),
            percent_aligned: mean_reported(lanes.iter().map(|l| l.percent_aligned.mean)),
            first_cycle_intensity: mean_reported(lanes.iter().map(|l| l.first_cycle_intensity.mean)),
            percent_gt_q30: mean_reported(lanes.iter().map(|l| l.percent_gt_q30)),
            yield_g: lanes.iter().map(|l| l.yield_g).sum(),
            projected_yield_g: lanes.iter().map(|l| l.projected_yield_g).sum(),
        };
    }
}
