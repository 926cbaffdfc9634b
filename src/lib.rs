//! # interop - Sequencing Run-Quality Metrics
//!
//! `interop` reads the binary metric files a sequencing instrument writes
//! while a run progresses (tile, error, extraction, q-score, corrected
//! intensity and index metrics) and reduces them into a per-read, per-lane
//! run-quality summary and plot-ready chart data.
//!
//! ## Key Features
//!
//! - **Versioned binary codec**: Decodes and encodes every supported format
//!   version of each metric family, all-or-nothing, with explicit
//!   little-endian field layouts.
//!
//! - **Run summary engine**: Synchronizes metric streams by lane, tile, cycle
//!   and read, and reports mean, standard deviation and median of every
//!   tile-level figure, plus yield, % >= Q30 and cycle progress.
//!
//! - **Chart data**: Candle-stick (box plot) series by cycle or by lane,
//!   filtered by lane, channel, base, read or surface; q-score histogram
//!   and heatmap; a per-tile flow cell map; per-sample index QC.
//!
//! - **Legacy timestamps**: Exact conversion of the instrument's 64-bit
//!   tick timestamps to and from Unix seconds.
//!
//! ## Quick Start
//!
//! ```rust
//! use interop::io::{read_metrics, write_metrics};
//! use interop::metrics::{ErrorMetric, MetricSet, RunMetrics};
//! use interop::run::{FlowcellLayout, ReadInfo, RunLayout};
//! use interop::summary::summarize_run_metrics;
//!
//! // Bytes as they would be read from ErrorMetricsOut.bin
//! let set = MetricSet::from_records(3, (), vec![
//!     ErrorMetric::new(1, 1101, 1, 0.30, [90, 10, 0, 0, 0]),
//!     ErrorMetric::new(1, 1102, 1, 0.50, [80, 20, 0, 0, 0]),
//! ]);
//! let bytes = write_metrics(&set, 3)?;
//!
//! let mut metrics = RunMetrics::new();
//! read_metrics(&bytes, &mut metrics.error)?;
//!
//! let layout = RunLayout::new(vec![ReadInfo::new(1, 1, 151)], FlowcellLayout::new(1, 2, 2, 14));
//! let summary = summarize_run_metrics(&mut metrics, &layout, false)?;
//! assert_eq!(summary.reads[0].lanes[0].tile_count, 2);
//! # Ok::<(), interop::InteropError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`time`]: Legacy tick timestamp conversion
//! - [`constants`]: Metric type, metric group, DNA base and surface enumerations
//! - [`metrics`]: Record types, [`metrics::MetricSet`] and [`metrics::RunMetrics`]
//! - [`io`]: Binary codec for every metric file family
//! - [`stats`]: Percentile, mean, standard deviation and Tukey outliers
//! - [`run`]: Run layout (reads, flow cell geometry, channels)
//! - [`summary`]: Run summary aggregation engine
//! - [`plot`]: Chart data (candle sticks, q-score histogram and heatmap, flow cell map, sample QC)

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod constants;
pub mod error;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod run;
pub mod stats;
pub mod summary;
pub mod time;

pub use error::{InteropError, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::constants::{DnaBase, MetricGroup, MetricType, SurfaceType};
    pub use crate::error::{InteropError, Result};
    pub use crate::io::{decode_metrics, read_metrics, write_metrics, write_metrics_default, MetricFormat};
    pub use crate::metrics::{
        CorrectedIntensityMetric, ErrorMetric, ExtractionMetric, IndexInfo, IndexMetric, MetricId, MetricRecord,
        MetricSet, QCollapsedMetric, QMetric, QScoreHeader, RunMetrics, TileMetric,
    };
    pub use crate::plot::{
        plot_by_cycle, plot_by_lane, plot_candle_stick, plot_flowcell_map, plot_qscore_heatmap, plot_qscore_histogram,
        plot_sample_qc, BarPoint, CandleStickPoint, FilterOptions, FlowcellData, HeatmapData, PlotData,
    };
    pub use crate::run::{FlowcellLayout, ReadInfo, RunLayout};
    pub use crate::summary::{summarize_run_metrics, LaneSummary, ReadSummary, RunSummary, SummaryOptions};
    pub use crate::time::LegacyTimestamp;
}
