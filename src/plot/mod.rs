//! # Chart data preparation
//!
//! Turns metric sets into plot-ready data. Line charts are series of
//! [`CandleStickPoint`]s, each summarizing the per-tile values observed at
//! one x position (a cycle or a lane). Q-score histograms and sample QC are
//! bar charts of [`BarPoint`]s; the q-score heatmap and the flow cell map are
//! grids. Rendering is left to the caller; every type here serializes with
//! serde so it can be handed to a charting front end as JSON.
//!
//! ```rust
//! use interop::constants::MetricType;
//! use interop::metrics::{ErrorMetric, RunMetrics};
//! use interop::plot::{plot_by_cycle, FilterOptions};
//! use interop::run::{FlowcellLayout, ReadInfo, RunLayout};
//!
//! let layout = RunLayout::new(vec![ReadInfo::new(1, 1, 10)], FlowcellLayout::new(1, 2, 1, 2));
//! let mut metrics = RunMetrics::new();
//! metrics.error.push(ErrorMetric::new(1, 1101, 1, 0.4, [0; 5]));
//! metrics.error.push(ErrorMetric::new(1, 1102, 1, 0.6, [0; 5]));
//!
//! let data = plot_by_cycle(&metrics, &layout, MetricType::ErrorRate, &FilterOptions::default())?;
//! assert_eq!(data.len(), 1);
//! assert_eq!(data[0].points[0].count, 2);
//! # Ok::<(), interop::InteropError>(())
//! ```

mod by_cycle;
mod by_lane;
pub mod candle_stick;
mod flowcell;
mod qscore;
mod sample_qc;

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::constants::{DnaBase, MetricType, SurfaceType};
use crate::error::{InteropError, Result};

pub use by_cycle::plot_by_cycle;
pub use by_lane::plot_by_lane;
pub use candle_stick::{plot_candle_stick, CandleStickPoint};
pub use flowcell::{plot_flowcell_map, FlowcellData};
pub use qscore::{plot_qscore_heatmap, plot_qscore_histogram, HeatmapData};
pub use sample_qc::plot_sample_qc;

/// Label and value range of one chart axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Axis {
    /// Axis label
    pub label: String,
    /// Smallest value shown
    pub min: f32,
    /// Largest value shown
    pub max: f32,
}

impl Axis {
    /// Create an axis
    pub fn new(label: impl Into<String>, min: f32, max: f32) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }
}

/// One bar of a bar chart, starting at `x` and spanning `width`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarPoint {
    /// Left edge
    pub x: f32,
    /// Height
    pub y: f32,
    /// Width along x
    pub width: f32,
}

impl BarPoint {
    /// Create a bar
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, width }
    }
}

/// One named line of points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series<P> {
    /// Legend title
    pub title: String,
    /// Points sorted by x
    pub points: Vec<P>,
}

impl<P> Series<P> {
    /// Create an empty series
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            points: Vec::new(),
        }
    }
}

/// A chart: title, axes and series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotData<P> {
    /// Chart title
    pub title: String,
    /// X axis
    pub x_axis: Axis,
    /// Y axis
    pub y_axis: Axis,
    /// Series in legend order
    pub series: Vec<Series<P>>,
}

impl<P> PlotData<P> {
    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True if the chart has no series
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<P> Index<usize> for PlotData<P> {
    type Output = Series<P>;

    fn index(&self, index: usize) -> &Series<P> {
        &self.series[index]
    }
}

impl PlotData<CandleStickPoint> {
    /// Set both axes from the points: x from 0 to one past the last x, y
    /// from 0 (or the lowest value) to 10% above the highest value
    fn fit_axes(&mut self, x_label: &str, y_label: &str) {
        let points = || self.series.iter().flat_map(|s| s.points.iter());
        let x_max = points().map(|p| p.x).fold(0.0f32, f32::max);
        let y_low = points()
            .map(|p| p.outliers.first().copied().unwrap_or(p.p25).min(p.p25))
            .fold(0.0f32, f32::min);
        let y_high = points()
            .map(|p| p.outliers.last().copied().unwrap_or(p.p75).max(p.p75))
            .fold(f32::MIN, f32::max);
        let y_high = if y_high == f32::MIN { 0.0 } else { y_high };
        self.x_axis = Axis::new(x_label, 0.0, x_max + 1.0);
        self.y_axis = Axis::new(y_label, y_low, y_high * 1.1);
    }
}

/// Restricts which records feed a chart; `None` means "all"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Only this lane
    pub lane: Option<u16>,
    /// Only this imaging channel (channel metrics)
    pub channel: Option<usize>,
    /// Only this base (base metrics)
    pub base: Option<DnaBase>,
    /// Only cycles of this read number
    pub read: Option<u16>,
    /// Only tiles on this surface
    pub surface: Option<SurfaceType>,
    /// Only this cycle (flow cell map)
    #[serde(default)]
    pub cycle: Option<u16>,
}

impl FilterOptions {
    /// Restrict to one lane
    pub fn lane(mut self, lane: u16) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Restrict to one channel
    pub fn channel(mut self, channel: usize) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Restrict to one base
    pub fn base(mut self, base: DnaBase) -> Self {
        self.base = Some(base);
        self
    }

    /// Restrict to one read
    pub fn read(mut self, read: u16) -> Self {
        self.read = Some(read);
        self
    }

    /// Restrict to one surface
    pub fn surface(mut self, surface: SurfaceType) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Restrict to one cycle
    pub fn cycle(mut self, cycle: u16) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Check that channel and base filters make sense for `metric_type`
    pub fn validate(&self, metric_type: MetricType, channel_count: usize) -> Result<()> {
        if let Some(channel) = self.channel {
            if !metric_type.is_channel_metric() {
                return Err(InteropError::InvalidChannelConfiguration(format!(
                    "{} is not reported per channel",
                    metric_type
                )));
            }
            if channel >= channel_count {
                return Err(InteropError::InvalidChannelConfiguration(format!(
                    "channel {} requested, run has {} channels",
                    channel, channel_count
                )));
            }
        }
        if let Some(base) = self.base {
            if !metric_type.is_base_metric() {
                return Err(InteropError::InvalidChannelConfiguration(format!(
                    "{} is not reported per base",
                    metric_type
                )));
            }
            if !DnaBase::CALLED.contains(&base) {
                return Err(InteropError::InvalidChannelConfiguration(format!(
                    "base {} has no intensity",
                    base.name()
                )));
            }
        }
        Ok(())
    }

    /// True if a record at `lane`/`tile` passes the lane and surface filters
    pub fn accepts_tile(&self, lane: u16, tile: u32) -> bool {
        self.lane.map_or(true, |l| l == lane)
            && self
                .surface
                .map_or(true, |s| SurfaceType::from_tile(tile) == s)
    }

    /// Bases to plot, in A, C, G, T order
    fn bases(&self) -> Vec<DnaBase> {
        match self.base {
            Some(base) => vec![base],
            None => DnaBase::CALLED.to_vec(),
        }
    }

    /// "Lane 2" or "All Lanes"
    fn lane_title(&self) -> String {
        match self.lane {
            Some(lane) => format!("Lane {}", lane),
            None => "All Lanes".to_string(),
        }
    }

    /// Chart title describing the filters, e.g. "Lane 2 All Channels All Surfaces"
    fn title(&self, metric_type: MetricType, channels: &[String]) -> String {
        let mut parts = vec![self.lane_title()];
        if metric_type.is_channel_metric() {
            parts.push(match self.channel.and_then(|c| channels.get(c)) {
                Some(name) => format!("{} Channel", name),
                None => "All Channels".to_string(),
            });
        }
        if metric_type.is_base_metric() {
            parts.push(match self.base {
                Some(base) => format!("{} Base", base.name()),
                None => "All Bases".to_string(),
            });
        }
        parts.push(match self.surface {
            Some(SurfaceType::Top) => "Top Surface".to_string(),
            Some(SurfaceType::Bottom) => "Bottom Surface".to_string(),
            _ => "All Surfaces".to_string(),
        });
        parts.join(" ")
    }
}
