//! Q-score histogram and heatmap

use log::debug;
use serde::{Deserialize, Serialize};

use super::by_cycle::CycleFilter;
use super::{Axis, BarPoint, FilterOptions, PlotData, Series};
use crate::error::Result;
use crate::metrics::{MetricSet, QMetric, QScoreHeader};
use crate::run::RunLayout;

/// Grid of values, one row per cycle and one column per q-score
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeatmapData {
    /// Chart title
    pub title: String,
    /// Cycle axis
    pub x_axis: Axis,
    /// Q-score axis
    pub y_axis: Axis,
    /// Number of rows; row `r` holds cycle `r + 1`
    pub rows: usize,
    /// Number of columns; column `c` holds Q`c + 1`
    pub columns: usize,
    /// Row-major cell values
    pub values: Vec<f32>,
}

impl HeatmapData {
    /// Value of one cell, `None` outside the grid
    pub fn value(&self, row: usize, column: usize) -> Option<f32> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.values.get(row * self.columns + column).copied()
    }

    /// True if the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Q-score range `(lower, upper)` counted by each histogram slot
fn slot_ranges(header: &QScoreHeader, histogram_len: usize) -> Vec<(u32, u32)> {
    if header.is_binned() && histogram_len == header.bins.len() {
        header
            .bins
            .iter()
            .map(|bin| (bin.lower as u32, bin.upper as u32))
            .collect()
    } else {
        (1..=histogram_len as u32).map(|q| (q, q)).collect()
    }
}

fn accepted_records<'m>(
    metrics: &'m MetricSet<QMetric>,
    options: &FilterOptions,
    cycles: &CycleFilter<'_>,
) -> Vec<&'m QMetric> {
    metrics
        .iter()
        .filter(|m| options.accepts_tile(m.lane, m.tile) && cycles.accepts(m.cycle))
        .collect()
}

/// Bar chart of base counts (in millions) per q-score bin
///
/// Histograms compressed to one slot per bin give one bar per bin spanning
/// its q-score range; full-length histograms give one bar per q-score up to
/// the highest one observed.
pub fn plot_qscore_histogram(
    metrics: &MetricSet<QMetric>,
    layout: &RunLayout,
    options: &FilterOptions,
) -> Result<PlotData<BarPoint>> {
    let cycles = CycleFilter::new(layout, options.read)?;
    let mut counts: Vec<u64> = Vec::new();
    for metric in accepted_records(metrics, options, &cycles) {
        if counts.len() < metric.histogram.len() {
            counts.resize(metric.histogram.len(), 0);
        }
        for (total, &count) in counts.iter_mut().zip(&metric.histogram) {
            *total += count as u64;
        }
    }

    let header = metrics.header();
    let compressed = header.is_binned() && counts.len() == header.bins.len();
    let used = if compressed {
        counts.len()
    } else {
        counts.iter().rposition(|&c| c > 0).map_or(0, |last| last + 1)
    };

    let mut bars = Series::new("Q Score");
    for ((lower, upper), &count) in slot_ranges(header, counts.len()).into_iter().zip(&counts).take(used) {
        bars.points.push(BarPoint::new(
            lower as f32,
            (count as f64 / 1_000_000.0) as f32,
            (upper - lower + 1) as f32,
        ));
    }

    let x_max = bars.points.iter().map(|b| b.x + b.width).fold(1.0f32, f32::max);
    let y_max = bars.points.iter().map(|b| b.y).fold(0.0f32, f32::max);
    debug!("Q-score histogram: {} bars", bars.points.len());
    Ok(PlotData {
        title: options.lane_title(),
        x_axis: Axis::new("Q Score", 1.0, x_max * 1.1),
        y_axis: Axis::new("Total (million)", 0.0, y_max * 1.1),
        series: vec![bars],
    })
}

/// Heatmap of base counts per cycle and q-score, as a percentage of the
/// fullest cell
///
/// A binned count fills every q-score of its bin.
pub fn plot_qscore_heatmap(
    metrics: &MetricSet<QMetric>,
    layout: &RunLayout,
    options: &FilterOptions,
) -> Result<HeatmapData> {
    let cycles = CycleFilter::new(layout, options.read)?;
    let records = accepted_records(metrics, options, &cycles);
    let header = metrics.header();

    let rows = records.iter().map(|m| m.cycle as usize).max().unwrap_or(0);
    let columns = records
        .iter()
        .flat_map(|m| slot_ranges(header, m.histogram.len()).into_iter().map(|(_, upper)| upper))
        .max()
        .unwrap_or(0) as usize;

    let mut values = vec![0.0f64; rows * columns];
    for metric in &records {
        if metric.cycle == 0 {
            continue;
        }
        let row = (metric.cycle - 1) as usize;
        let ranges = slot_ranges(header, metric.histogram.len());
        for ((lower, upper), &count) in ranges.into_iter().zip(&metric.histogram) {
            for q in lower.max(1)..=upper {
                values[row * columns + q as usize - 1] += count as f64;
            }
        }
    }

    let max = values.iter().copied().fold(0.0f64, f64::max);
    let values = values
        .into_iter()
        .map(|v| if max > 0.0 { (v / max * 100.0) as f32 } else { 0.0 })
        .collect();
    debug!("Q-score heatmap: {} cycles x {} q-scores", rows, columns);
    Ok(HeatmapData {
        title: options.lane_title(),
        x_axis: Axis::new("Cycle", 0.0, rows as f32 + 1.0),
        y_axis: Axis::new("Q Score", 0.0, columns as f32),
        rows,
        columns,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InteropError;
    use crate::metrics::{QScoreBin, MAX_Q_BINS};
    use crate::run::{FlowcellLayout, ReadInfo};

    fn layout() -> RunLayout {
        RunLayout::new(
            vec![ReadInfo::new(1, 1, 26), ReadInfo::new(2, 27, 76)],
            FlowcellLayout::new(8, 2, 2, 16),
        )
    }

    /// Seven-bin histograms of lane 7 tile 1114 over three cycles
    fn binned() -> MetricSet<QMetric> {
        let header = QScoreHeader::binned(vec![
            QScoreBin::new(2, 9, 2),
            QScoreBin::new(10, 19, 14),
            QScoreBin::new(20, 24, 21),
            QScoreBin::new(25, 29, 27),
            QScoreBin::new(30, 34, 32),
            QScoreBin::new(35, 39, 36),
            QScoreBin::new(40, 40, 40),
        ]);
        MetricSet::from_records(
            6,
            header,
            vec![
                QMetric::new(7, 1114, 1, vec![0, 267962, 118703, 4284, 2796110, 0, 0]),
                QMetric::new(7, 1114, 2, vec![0, 241483, 44960, 1100, 2899568, 0, 0]),
                QMetric::new(7, 1114, 3, vec![0, 212144, 53942, 427, 2920598, 0, 0]),
            ],
        )
    }

    // ==================== Histogram ====================

    #[test]
    fn test_binned_histogram() {
        let data = plot_qscore_histogram(&binned(), &layout(), &FilterOptions::default()).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.title, "All Lanes");
        assert_eq!(data.x_axis.label, "Q Score");
        assert_eq!(data.y_axis.label, "Total (million)");
        assert_eq!(data.x_axis.min, 1.0);
        assert_eq!(data.y_axis.min, 0.0);
        assert!((data.x_axis.max - 45.1).abs() < 1e-3);
        assert!((data.y_axis.max - 9.478).abs() < 1e-3);

        let bars = &data[0].points;
        assert_eq!(bars.len(), 7);
        assert_eq!(bars[4].x, 30.0);
        assert_eq!(bars[4].width, 5.0);
        assert!((bars[4].y - 8.616276).abs() < 1e-4);
        assert_eq!(bars[6].width, 1.0);
    }

    #[test]
    fn test_unbinned_histogram_stops_at_highest_qscore() {
        let mut histogram = vec![0u32; MAX_Q_BINS];
        histogram[29] = 100;
        histogram[19] = 50;
        let set = MetricSet::from_records(5, QScoreHeader::default(), vec![QMetric::new(1, 1101, 1, histogram)]);
        let data = plot_qscore_histogram(&set, &layout(), &FilterOptions::default()).unwrap();
        let bars = &data[0].points;
        assert_eq!(bars.len(), 30);
        assert_eq!(bars[29].x, 30.0);
        assert_eq!(bars[29].width, 1.0);
        assert!((bars[29].y - 0.0001).abs() < 1e-7);
        assert!((data.x_axis.max - 34.1).abs() < 1e-3);
    }

    #[test]
    fn test_histogram_filters() {
        let other_lane = plot_qscore_histogram(&binned(), &layout(), &FilterOptions::default().lane(1)).unwrap();
        assert_eq!(other_lane.title, "Lane 1");
        assert!(other_lane[0].points.is_empty());
        assert_eq!(other_lane.y_axis.max, 0.0);

        let second_read = plot_qscore_histogram(&binned(), &layout(), &FilterOptions::default().read(2)).unwrap();
        assert!(second_read[0].points.is_empty());

        assert!(matches!(
            plot_qscore_histogram(&binned(), &layout(), &FilterOptions::default().read(3)),
            Err(InteropError::IndexOutOfRange { kind: "read", .. })
        ));
    }

    // ==================== Heatmap ====================

    #[test]
    fn test_binned_heatmap() {
        let data = plot_qscore_heatmap(&binned(), &layout(), &FilterOptions::default()).unwrap();
        assert_eq!(data.title, "All Lanes");
        assert_eq!(data.rows, 3);
        assert_eq!(data.columns, 40);
        assert_eq!(data.x_axis.label, "Cycle");
        assert_eq!(data.y_axis.label, "Q Score");
        assert_eq!(data.x_axis.min, 0.0);
        assert_eq!(data.x_axis.max, 4.0);
        assert_eq!(data.y_axis.min, 0.0);
        assert_eq!(data.y_axis.max, 40.0);

        // The fullest cells are Q30 to Q34 at cycle 3
        for column in 29..34 {
            assert_eq!(data.value(2, column), Some(100.0));
        }
        let q30_cycle1 = data.value(0, 29).unwrap();
        assert!((q30_cycle1 - 2796110.0 / 2920598.0 * 100.0).abs() < 1e-3);
        let q10_cycle1 = data.value(0, 9).unwrap();
        assert!((q10_cycle1 - 267962.0 / 2920598.0 * 100.0).abs() < 1e-3);
        assert_eq!(data.value(0, 0), Some(0.0));
        assert_eq!(data.value(3, 0), None);
        assert_eq!(data.value(0, 40), None);
    }

    #[test]
    fn test_heatmap_without_records() {
        let data = plot_qscore_heatmap(&binned(), &layout(), &FilterOptions::default().lane(2)).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.rows, 0);
        assert_eq!(data.title, "Lane 2");
    }
}
