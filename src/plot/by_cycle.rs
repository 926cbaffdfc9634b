//! Candle sticks of per-tile values at each cycle

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::{plot_candle_stick, CandleStickPoint, FilterOptions, PlotData, Series};
use crate::constants::{DnaBase, MetricGroup, MetricType};
use crate::error::{InteropError, Result};
use crate::metrics::{collapse_q_metrics, MetricSet, QCollapsedMetric, RunMetrics};
use crate::run::{ReadInfo, RunLayout};

/// Values observed at each cycle for one series
type CycleValues = BTreeMap<u16, Vec<f32>>;

/// Cycles admitted by the read filter
pub(super) struct CycleFilter<'a> {
    reads: &'a [ReadInfo],
    only: Option<ReadInfo>,
}

impl<'a> CycleFilter<'a> {
    pub(super) fn new(layout: &'a RunLayout, read: Option<u16>) -> Result<Self> {
        let only = match read {
            Some(number) => Some(
                layout
                    .reads
                    .iter()
                    .find(|r| r.number == number)
                    .copied()
                    .ok_or(InteropError::IndexOutOfRange {
                        kind: "read",
                        index: number as usize,
                        limit: layout.reads.len(),
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            reads: &layout.reads,
            only,
        })
    }

    pub(super) fn accepts(&self, cycle: u16) -> bool {
        match &self.only {
            Some(read) => read.contains(cycle),
            None => true,
        }
    }

    fn read_of(&self, cycle: u16) -> Option<&ReadInfo> {
        self.reads.iter().find(|r| r.contains(cycle))
    }
}

/// Plot one metric type against cycle
///
/// Channel metrics give one series per imaging channel, base metrics one per
/// called base, everything else a single series. Tile-level metric types have
/// no cycle and produce an empty chart.
pub fn plot_by_cycle(
    metrics: &RunMetrics,
    layout: &RunLayout,
    metric_type: MetricType,
    options: &FilterOptions,
) -> Result<PlotData<CandleStickPoint>> {
    options.validate(metric_type, layout.channels.len())?;
    let cycles = CycleFilter::new(layout, options.read)?;
    let mut data = PlotData {
        title: options.title(metric_type, &layout.channels),
        ..PlotData::default()
    };

    let series = match metric_type.group() {
        MetricGroup::Extraction => extraction_series(metrics, layout, metric_type, options, &cycles)?,
        MetricGroup::Error => vec![(metric_type.name().to_string(), error_values(metrics, options, &cycles))],
        MetricGroup::Q => {
            let derived;
            let collapsed = if metrics.q_collapsed.is_empty() {
                derived = collapse_q_metrics(&metrics.q);
                &derived
            } else {
                &metrics.q_collapsed
            };
            vec![(
                metric_type.name().to_string(),
                q_values(collapsed, metric_type, options, &cycles),
            )]
        }
        MetricGroup::CorrectedInt => corrected_series(metrics, metric_type, options, &cycles),
        group => {
            debug!("{} ({} metrics) cannot be plotted by cycle", metric_type, group);
            return Ok(data);
        }
    };

    let mut outliers = Vec::with_capacity(16);
    for (title, values) in series {
        let mut line = Series::new(title);
        for (cycle, mut values) in values {
            if !values.is_empty() {
                line.points
                    .push(plot_candle_stick(&mut values, cycle as f32, &mut outliers));
            }
        }
        data.series.push(line);
    }
    data.fit_axes("Cycle", metric_type.name());
    debug!("Plotted {} by cycle: {} series", metric_type, data.len());
    Ok(data)
}

fn extraction_series(
    metrics: &RunMetrics,
    layout: &RunLayout,
    metric_type: MetricType,
    options: &FilterOptions,
    cycles: &CycleFilter<'_>,
) -> Result<Vec<(String, CycleValues)>> {
    let channels: Vec<usize> = match options.channel {
        Some(channel) => vec![channel],
        None => (0..layout.channels.len()).collect(),
    };
    let mut series = Vec::with_capacity(channels.len());
    for channel in channels {
        let mut values = CycleValues::new();
        for metric in metrics.extraction.iter() {
            if !options.accepts_tile(metric.lane, metric.tile) || !cycles.accepts(metric.cycle) {
                continue;
            }
            let value = match metric_type {
                MetricType::Fwhm => metric.focus(channel),
                _ => metric.intensity(channel).map(f32::from),
            };
            let value = value.ok_or_else(|| {
                InteropError::InvalidChannelConfiguration(format!(
                    "channel {} is outside the extraction record",
                    channel
                ))
            })?;
            values.entry(metric.cycle).or_default().push(value);
        }
        series.push((layout.channels[channel].clone(), values));
    }
    Ok(series)
}

fn error_values(metrics: &RunMetrics, options: &FilterOptions, cycles: &CycleFilter<'_>) -> CycleValues {
    let mut values = CycleValues::new();
    for metric in metrics.error.iter() {
        if options.accepts_tile(metric.lane, metric.tile) && cycles.accepts(metric.cycle) {
            values.entry(metric.cycle).or_default().push(metric.error_rate);
        }
    }
    values
}

fn q_values(
    collapsed: &MetricSet<QCollapsedMetric>,
    metric_type: MetricType,
    options: &FilterOptions,
    cycles: &CycleFilter<'_>,
) -> CycleValues {
    let mut values = CycleValues::new();
    let records: Vec<&QCollapsedMetric> = collapsed
        .iter()
        .filter(|m| options.accepts_tile(m.lane, m.tile))
        .collect();

    if matches!(metric_type, MetricType::AccumPercentQ20 | MetricType::AccumPercentQ30) {
        // Running totals per tile, restarting at the first cycle of each read
        let mut by_tile: HashMap<(u16, u32), Vec<&QCollapsedMetric>> = HashMap::new();
        for metric in records {
            by_tile.entry((metric.lane, metric.tile)).or_default().push(metric);
        }
        for tile_records in by_tile.values_mut() {
            tile_records.sort_by_key(|m| m.cycle);
            let mut read_start = None;
            let (mut above, mut total) = (0u64, 0u64);
            for metric in tile_records.iter() {
                let Some(read) = cycles.read_of(metric.cycle) else {
                    continue;
                };
                if read_start != Some(read.first_cycle) {
                    read_start = Some(read.first_cycle);
                    above = 0;
                    total = 0;
                }
                above += match metric_type {
                    MetricType::AccumPercentQ20 => metric.q20 as u64,
                    _ => metric.q30 as u64,
                };
                total += metric.total as u64;
                if total > 0 && cycles.accepts(metric.cycle) {
                    let percent = (above as f64 / total as f64 * 100.0) as f32;
                    values.entry(metric.cycle).or_default().push(percent);
                }
            }
        }
        return values;
    }

    for metric in records {
        if !cycles.accepts(metric.cycle) {
            continue;
        }
        let value = match metric_type {
            MetricType::PercentQ20 => metric.percent_over_q20(),
            MetricType::PercentQ30 => metric.percent_over_q30(),
            _ => Some(metric.median_qscore as f32),
        };
        if let Some(value) = value {
            values.entry(metric.cycle).or_default().push(value);
        }
    }
    values
}

fn corrected_series(
    metrics: &RunMetrics,
    metric_type: MetricType,
    options: &FilterOptions,
    cycles: &CycleFilter<'_>,
) -> Vec<(String, CycleValues)> {
    let accepted = move || {
        metrics
            .corrected_intensity
            .iter()
            .filter(move |m| options.accepts_tile(m.lane, m.tile) && cycles.accepts(m.cycle))
    };

    if metric_type == MetricType::SignalToNoise {
        let mut values = CycleValues::new();
        for metric in accepted() {
            values.entry(metric.cycle).or_default().push(metric.signal_to_noise);
        }
        return vec![(metric_type.name().to_string(), values)];
    }

    options
        .bases()
        .into_iter()
        .map(|base: DnaBase| {
            let slot = base.code() as usize;
            let mut values = CycleValues::new();
            for metric in accepted() {
                let value = match metric_type {
                    MetricType::CorrectedIntensity => Some(metric.corrected_int_all[slot] as f32),
                    MetricType::CalledIntensity => Some(metric.corrected_int_called[slot] as f32),
                    _ => metric.percent_base(base),
                };
                if let Some(value) = value {
                    values.entry(metric.cycle).or_default().push(value);
                }
            }
            (base.name().to_string(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{read_metrics, write_metrics};
    use crate::metrics::{CorrectedIntensityMetric, ErrorMetric, ExtractionMetric, QCollapsedMetric, TileMetric};
    use crate::run::FlowcellLayout;

    fn two_read_layout() -> RunLayout {
        RunLayout::new(
            vec![ReadInfo::new(1, 1, 26), ReadInfo::new(2, 27, 76)],
            FlowcellLayout::new(2, 2, 2, 16),
        )
    }

    #[test]
    fn test_intensity_by_cycle() {
        let mut records = Vec::new();
        for lane in 1..=2u16 {
            for tile in [1101u32, 1102] {
                for cycle in 1..=4u16 {
                    let base = 300 + cycle * 10 + lane;
                    records.push(ExtractionMetric::new(
                        lane,
                        tile,
                        cycle,
                        [2.5, 2.6, 2.7, 2.8],
                        [base, base + 1, base + 2, base + 3],
                        1_452_729_600,
                    ));
                }
            }
        }
        let bytes = write_metrics(&MetricSet::from_records(2, (), records), 2).unwrap();
        let mut metrics = RunMetrics::new();
        read_metrics(&bytes, &mut metrics.extraction).unwrap();

        let data = plot_by_cycle(
            &metrics,
            &two_read_layout(),
            MetricType::Intensity,
            &FilterOptions::default(),
        )
        .unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data.title, "All Lanes All Channels All Surfaces");
        assert_eq!(data.x_axis.label, "Cycle");
        assert_eq!(data.y_axis.label, "Intensity");
        assert_eq!(data.x_axis.min, 0.0);
        assert_eq!(data.y_axis.min, 0.0);
        for channel in 0..4 {
            let xs: Vec<f32> = data[channel].points.iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
            assert!(data[channel].points.iter().all(|p| p.count == 4));
        }
        assert_eq!(data[0].title, "A");
        // Cycle 1, channel A: two tiles each at 311 (lane 1) and 312 (lane 2)
        assert_eq!(data[0].points[0].p50, 311.5);
    }

    #[test]
    fn test_channel_and_read_filters() {
        let mut metrics = RunMetrics::new();
        for cycle in [1u16, 30] {
            metrics
                .extraction
                .push(ExtractionMetric::new(1, 1101, cycle, [1.0, 2.0, 3.0, 4.0], [10, 20, 30, 40], 0));
        }
        let options = FilterOptions::default().channel(2).read(2);
        let data = plot_by_cycle(&metrics, &two_read_layout(), MetricType::Fwhm, &options).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].title, "G");
        assert_eq!(data[0].points.len(), 1);
        assert_eq!(data[0].points[0].x, 30.0);
        assert_eq!(data[0].points[0].p50, 3.0);

        let missing = FilterOptions::default().read(3);
        assert!(matches!(
            plot_by_cycle(&metrics, &two_read_layout(), MetricType::Fwhm, &missing),
            Err(InteropError::IndexOutOfRange { kind: "read", .. })
        ));
    }

    #[test]
    fn test_two_channel_run_rejects_third_channel() {
        let layout = two_read_layout().with_channels(["Red", "Green"]);
        let options = FilterOptions::default().channel(2);
        assert!(matches!(
            plot_by_cycle(&RunMetrics::new(), &layout, MetricType::Intensity, &options),
            Err(InteropError::InvalidChannelConfiguration(_))
        ));
    }

    #[test]
    fn test_error_rate_and_surface_filter() {
        let mut metrics = RunMetrics::new();
        metrics.error.push(ErrorMetric::new(1, 1101, 1, 0.2, [0; 5]));
        metrics.error.push(ErrorMetric::new(1, 2101, 1, 0.8, [0; 5]));
        metrics.error.push(ErrorMetric::new(2, 1101, 2, 0.4, [0; 5]));

        let all = plot_by_cycle(&metrics, &two_read_layout(), MetricType::ErrorRate, &FilterOptions::default())
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].points.len(), 2);
        assert_eq!(all[0].points[0].count, 2);

        let top = FilterOptions::default().surface(crate::constants::SurfaceType::Top);
        let data = plot_by_cycle(&metrics, &two_read_layout(), MetricType::ErrorRate, &top).unwrap();
        assert_eq!(data[0].points[0].count, 1);
        assert_eq!(data[0].points[0].p50, 0.2);
    }

    #[test]
    fn test_q30_and_accumulated_q30() {
        let mut metrics = RunMetrics::new();
        metrics.q_collapsed.push(QCollapsedMetric::new(1, 1101, 1, 90, 80, 100, 35));
        metrics.q_collapsed.push(QCollapsedMetric::new(1, 1101, 2, 70, 60, 100, 30));
        metrics.q_collapsed.push(QCollapsedMetric::new(1, 1101, 27, 50, 40, 100, 25));

        let layout = two_read_layout();
        let q30 = plot_by_cycle(&metrics, &layout, MetricType::PercentQ30, &FilterOptions::default()).unwrap();
        let p50: Vec<f32> = q30[0].points.iter().map(|p| p.p50).collect();
        assert_eq!(p50, vec![80.0, 60.0, 40.0]);

        let accum =
            plot_by_cycle(&metrics, &layout, MetricType::AccumPercentQ30, &FilterOptions::default()).unwrap();
        let p50: Vec<f32> = accum[0].points.iter().map(|p| p.p50).collect();
        // Cycle 27 starts read 2, so the running total restarts
        assert_eq!(p50, vec![80.0, 70.0, 40.0]);
    }

    #[test]
    fn test_called_intensity_per_base() {
        let mut metrics = RunMetrics::new();
        metrics.corrected_intensity.push(CorrectedIntensityMetric::new(
            1,
            1101,
            1,
            [100, 200, 300, 400],
            [0, 10, 10, 10, 10],
        ));
        let data =
            plot_by_cycle(&metrics, &two_read_layout(), MetricType::CalledIntensity, &FilterOptions::default())
                .unwrap();
        let titles: Vec<&str> = data.series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "G", "T"]);
        assert_eq!(data[3].points[0].p50, 400.0);

        let only_c = FilterOptions::default().base(DnaBase::C);
        let data = plot_by_cycle(&metrics, &two_read_layout(), MetricType::PercentBase, &only_c).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].points[0].p50, 25.0);
    }

    #[test]
    fn test_tile_metric_gives_empty_plot() {
        let mut metrics = RunMetrics::new();
        metrics.tile.push(TileMetric::new(1, 1101, 100.0, 90.0, 1000.0, 900.0));
        let data =
            plot_by_cycle(&metrics, &two_read_layout(), MetricType::ClusterCount, &FilterOptions::default())
                .unwrap();
        assert!(data.is_empty());
    }
}
