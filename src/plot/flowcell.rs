//! Flow cell map: one value per tile, laid out lane by lane

use log::debug;
use serde::{Deserialize, Serialize};

use super::by_lane::tile_values;
use super::{Axis, FilterOptions};
use crate::constants::{DnaBase, MetricGroup, MetricType};
use crate::error::{InteropError, Result};
use crate::metrics::{collapse_q_metrics, MetricRecord, MetricSet, RunMetrics};
use crate::run::RunLayout;

/// Per-tile values arranged as one row per lane
///
/// Within a row, tiles are ordered by surface, then swath, then tile number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowcellData {
    /// Chart title
    pub title: String,
    /// Label and range of the plotted values
    pub value_axis: Axis,
    /// Number of rows, one per lane
    pub rows: usize,
    /// Number of columns, one per tile position in a lane
    pub columns: usize,
    /// Row-major cell values; `None` where no tile reported
    pub values: Vec<Option<f32>>,
    /// Tile number of each cell
    pub tile_ids: Vec<Option<u32>>,
}

impl FlowcellData {
    fn new(title: &str, rows: usize, columns: usize) -> Self {
        Self {
            title: title.to_string(),
            value_axis: Axis::new(title, 0.0, 0.0),
            rows,
            columns,
            values: vec![None; rows * columns],
            tile_ids: vec![None; rows * columns],
        }
    }

    /// Value of one cell
    pub fn value(&self, row: usize, column: usize) -> Option<f32> {
        if column >= self.columns {
            return None;
        }
        self.values.get(row * self.columns + column).copied().flatten()
    }

    /// Tile shown in one cell
    pub fn tile_id(&self, row: usize, column: usize) -> Option<u32> {
        if column >= self.columns {
            return None;
        }
        self.tile_ids.get(row * self.columns + column).copied().flatten()
    }
}

/// Records passing the tile filters at the chosen cycle, or at the latest
/// cycle among them when no cycle is chosen
fn at_cycle<'m, T: MetricRecord>(set: &'m MetricSet<T>, options: &FilterOptions) -> Vec<&'m T> {
    let accepted: Vec<&T> = set
        .iter()
        .filter(|m| options.accepts_tile(m.lane(), m.tile()))
        .collect();
    let cycle = options.cycle.or_else(|| accepted.iter().map(|m| m.cycle()).max());
    accepted.into_iter().filter(|m| Some(m.cycle()) == cycle).collect()
}

/// (lane, tile, value) for every tile that reports `metric_type`
fn tile_points(
    metrics: &RunMetrics,
    metric_type: MetricType,
    options: &FilterOptions,
) -> Option<Vec<(u16, u32, f32)>> {
    let points = match metric_type.group() {
        MetricGroup::Tile => metrics
            .tile
            .iter()
            .filter(|m| options.accepts_tile(m.lane, m.tile))
            .filter_map(|m| {
                tile_values(m, metric_type, options.read)
                    .first()
                    .map(|&v| (m.lane, m.tile, v))
            })
            .collect(),
        MetricGroup::Extraction => {
            let channel = options.channel.unwrap_or(0);
            at_cycle(&metrics.extraction, options)
                .into_iter()
                .filter_map(|m| {
                    let value = match metric_type {
                        MetricType::Fwhm => m.focus(channel),
                        _ => m.intensity(channel).map(f32::from),
                    };
                    value.map(|v| (m.lane, m.tile, v))
                })
                .collect()
        }
        MetricGroup::Error => at_cycle(&metrics.error, options)
            .into_iter()
            .map(|m| (m.lane, m.tile, m.error_rate))
            .collect(),
        MetricGroup::Q => {
            if matches!(metric_type, MetricType::AccumPercentQ20 | MetricType::AccumPercentQ30) {
                return None;
            }
            let derived;
            let collapsed = if metrics.q_collapsed.is_empty() {
                derived = collapse_q_metrics(&metrics.q);
                &derived
            } else {
                &metrics.q_collapsed
            };
            at_cycle(collapsed, options)
                .into_iter()
                .filter_map(|m| {
                    let value = match metric_type {
                        MetricType::PercentQ20 => m.percent_over_q20(),
                        MetricType::PercentQ30 => m.percent_over_q30(),
                        _ => Some(m.median_qscore as f32),
                    };
                    value.map(|v| (m.lane, m.tile, v))
                })
                .collect()
        }
        MetricGroup::CorrectedInt => {
            let base = options.base.unwrap_or(DnaBase::A);
            let slot = base.code() as usize;
            at_cycle(&metrics.corrected_intensity, options)
                .into_iter()
                .filter_map(|m| {
                    let value = match metric_type {
                        MetricType::CorrectedIntensity => Some(m.corrected_int_all[slot] as f32),
                        MetricType::CalledIntensity => Some(m.corrected_int_called[slot] as f32),
                        MetricType::SignalToNoise => Some(m.signal_to_noise),
                        _ => m.percent_base(base),
                    };
                    value.map(|v| (m.lane, m.tile, v))
                })
                .collect()
        }
        _ => return None,
    };
    Some(points)
}

/// Lay out one metric type over the flow cell
///
/// Cycle-scoped metric types are shown at `options.cycle`, defaulting to the
/// latest cycle reported. Channel metrics default to the first channel, base
/// metrics to A, and per-read tile figures to the lowest read unless a read
/// is chosen. Accumulated q-score types and metric types without a tile
/// value give an empty map.
pub fn plot_flowcell_map(
    metrics: &RunMetrics,
    layout: &RunLayout,
    metric_type: MetricType,
    options: &FilterOptions,
) -> Result<FlowcellData> {
    options.validate(metric_type, layout.channels.len())?;
    let flowcell = &layout.flowcell;
    let rows = flowcell.lane_count as usize;
    let columns = flowcell.tiles_per_lane();
    let mut data = FlowcellData::new(metric_type.name(), rows, columns);

    let Some(points) = tile_points(metrics, metric_type, options) else {
        debug!("{} ({} metrics) has no flow cell map", metric_type, metric_type.group());
        return Ok(data);
    };

    let (mut low, mut high) = (f32::MAX, f32::MIN);
    for (lane, tile, value) in points {
        if lane == 0 || lane as usize > rows {
            return Err(InteropError::IndexOutOfRange {
                kind: "lane",
                index: lane as usize,
                limit: rows,
            });
        }
        let column = flowcell.tile_slot(tile).ok_or(InteropError::IndexOutOfRange {
            kind: "tile",
            index: tile as usize,
            limit: columns,
        })?;
        let cell = (lane as usize - 1) * columns + column;
        data.values[cell] = Some(value);
        data.tile_ids[cell] = Some(tile);
        low = low.min(value);
        high = high.max(value);
    }
    if low <= high {
        data.value_axis.min = low;
        data.value_axis.max = high;
    }
    debug!(
        "Flow cell map of {}: {} of {} tiles",
        metric_type,
        data.values.iter().filter(|v| v.is_some()).count(),
        rows * columns
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{ErrorMetric, ExtractionMetric, QMetric, QScoreHeader, TileMetric, TileReadMetric};
    use crate::run::{FlowcellLayout, ReadInfo};

    fn layout() -> RunLayout {
        RunLayout::new(
            vec![ReadInfo::new(1, 1, 26), ReadInfo::new(2, 27, 76)],
            FlowcellLayout::new(8, 2, 2, 36),
        )
    }

    fn extraction() -> RunMetrics {
        let mut metrics = RunMetrics::new();
        for lane in 1..=2u16 {
            for (i, tile) in [1101u32, 1102, 2236].into_iter().enumerate() {
                for cycle in 1..=3u16 {
                    let a = 300 + lane * 10 + i as u16 + cycle;
                    metrics.extraction.push(ExtractionMetric::new(
                        lane,
                        tile,
                        cycle,
                        [2.5, 2.6, 2.7, 2.8],
                        [a, a + 100, a + 200, a + 300],
                        0,
                    ));
                }
            }
        }
        metrics
    }

    #[test]
    fn test_intensity_map() {
        let options = FilterOptions::default().channel(0).cycle(1);
        let data = plot_flowcell_map(&extraction(), &layout(), MetricType::Intensity, &options).unwrap();
        assert_eq!(data.rows, 8);
        assert_eq!(data.columns, 144);
        assert_eq!(data.title, "Intensity");
        assert_eq!(data.value_axis.label, "Intensity");
        assert_eq!(data.value_axis.min, 311.0);
        assert_eq!(data.value_axis.max, 323.0);

        assert_eq!(data.value(0, 0), Some(311.0));
        assert_eq!(data.tile_id(0, 0), Some(1101));
        assert_eq!(data.value(1, 1), Some(322.0));
        assert_eq!(data.value(1, 143), Some(323.0));
        assert_eq!(data.tile_id(1, 143), Some(2236));
        assert_eq!(data.value(0, 2), None);
        assert_eq!(data.value(7, 0), None);
        assert_eq!(data.value(8, 0), None);
    }

    #[test]
    fn test_latest_cycle_and_channel_default() {
        let data = plot_flowcell_map(&extraction(), &layout(), MetricType::Intensity, &FilterOptions::default())
            .unwrap();
        assert_eq!(data.value(0, 0), Some(313.0));

        let options = FilterOptions::default().channel(2).lane(2);
        let data = plot_flowcell_map(&extraction(), &layout(), MetricType::Intensity, &options).unwrap();
        assert_eq!(data.value(0, 0), None);
        assert_eq!(data.value(1, 0), Some(523.0));
    }

    #[test]
    fn test_tile_metric_map() {
        let mut metrics = RunMetrics::new();
        metrics.tile.push(
            TileMetric::new(3, 1201, 150_000.0, 140_000.0, 2_000_000.0, 1_800_000.0).with_read(TileReadMetric {
                read: 2,
                percent_aligned: Some(1.5),
                ..TileReadMetric::default()
            }),
        );
        let data = plot_flowcell_map(&metrics, &layout(), MetricType::ClusterCountPf, &FilterOptions::default())
            .unwrap();
        assert_eq!(data.value(2, 36), Some(1.8));
        assert_eq!(data.tile_id(2, 36), Some(1201));

        let aligned = plot_flowcell_map(&metrics, &layout(), MetricType::PercentAligned, &FilterOptions::default())
            .unwrap();
        assert_eq!(aligned.value(2, 36), Some(1.5));
        let first_read =
            plot_flowcell_map(&metrics, &layout(), MetricType::PercentAligned, &FilterOptions::default().read(1))
                .unwrap();
        assert_eq!(first_read.value(2, 36), None);
    }

    #[test]
    fn test_error_and_q_maps() {
        let mut metrics = RunMetrics::new();
        metrics.error.push(ErrorMetric::new(1, 1101, 4, 0.3, [0; 5]));
        metrics.error.push(ErrorMetric::new(1, 1101, 5, 0.5, [0; 5]));
        let data = plot_flowcell_map(&metrics, &layout(), MetricType::ErrorRate, &FilterOptions::default()).unwrap();
        assert_eq!(data.value(0, 0), Some(0.5));

        let mut histogram = vec![0u32; 50];
        histogram[29] = 75;
        histogram[9] = 25;
        metrics.q = MetricSet::from_records(5, QScoreHeader::default(), vec![QMetric::new(1, 1102, 1, histogram)]);
        let data = plot_flowcell_map(&metrics, &layout(), MetricType::PercentQ30, &FilterOptions::default()).unwrap();
        assert_eq!(data.value(0, 1), Some(75.0));

        let accum = plot_flowcell_map(&metrics, &layout(), MetricType::AccumPercentQ30, &FilterOptions::default())
            .unwrap();
        assert!(accum.values.iter().all(Option::is_none));
    }

    #[test]
    fn test_tile_outside_flowcell() {
        let mut metrics = RunMetrics::new();
        metrics.error.push(ErrorMetric::new(1, 1137, 1, 0.3, [0; 5]));
        assert!(matches!(
            plot_flowcell_map(&metrics, &layout(), MetricType::ErrorRate, &FilterOptions::default()),
            Err(InteropError::IndexOutOfRange { kind: "tile", index: 1137, .. })
        ));

        let mut metrics = RunMetrics::new();
        metrics.error.push(ErrorMetric::new(9, 1101, 1, 0.3, [0; 5]));
        assert!(matches!(
            plot_flowcell_map(&metrics, &layout(), MetricType::ErrorRate, &FilterOptions::default()),
            Err(InteropError::IndexOutOfRange { kind: "lane", index: 9, .. })
        ));
    }
}
