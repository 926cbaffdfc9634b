use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use interop::constants::MetricType;
use interop::metrics::{ErrorMetric, ExtractionMetric, QCollapsedMetric, RunMetrics, TileMetric};
use interop::plot::{plot_by_cycle, FilterOptions};
use interop::run::{FlowcellLayout, ReadInfo, RunLayout};
use interop::summary::summarize_run_metrics;

const LANES: u16 = 4;
const TILES_PER_LANE: u32 = 64;

fn layout(cycles: u16) -> RunLayout {
    let half = cycles / 2;
    RunLayout::new(
        vec![ReadInfo::new(1, 1, half), ReadInfo::new(2, half + 1, cycles)],
        FlowcellLayout::new(LANES, 2, 2, 16),
    )
}

/// Synthetic run with tile, error, extraction and collapsed q-score records
fn run_metrics(cycles: u16) -> RunMetrics {
    let mut metrics = RunMetrics::new();
    for lane in 1..=LANES {
        for t in 0..TILES_PER_LANE {
            let tile = 1101 + t;
            let jitter = (t % 13) as f32;
            metrics.tile.push(TileMetric::new(
                lane,
                tile,
                240_000.0 + jitter * 1000.0,
                210_000.0 + jitter * 900.0,
                650_000.0,
                590_000.0,
            ));
            for cycle in 1..=cycles {
                metrics.error.push(ErrorMetric::new(
                    lane,
                    tile,
                    cycle,
                    0.2 + jitter * 0.01,
                    [900, 80, 15, 4, 1],
                ));
                metrics.extraction.push(ExtractionMetric::new(
                    lane,
                    tile,
                    cycle,
                    [2.5; 4],
                    [300 + t as u16, 280, 310, 295],
                    1_500_000_000 + cycle as i64 * 300,
                ));
                metrics.q_collapsed.push(QCollapsedMetric::new(
                    lane,
                    tile,
                    cycle,
                    95_000,
                    90_000 - t * 10,
                    100_000,
                    35,
                ));
            }
        }
    }
    metrics
}

/// Benchmark the full run summary
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_run_metrics");
    group.sample_size(20);

    for cycles in [50u16, 150] {
        let layout = layout(cycles);
        let metrics = run_metrics(cycles);
        group.throughput(Throughput::Elements(LANES as u64 * TILES_PER_LANE as u64 * cycles as u64));

        for skip_median in [false, true] {
            let id = format!("{}cycles{}", cycles, if skip_median { "_skip_median" } else { "" });
            group.bench_with_input(BenchmarkId::from_parameter(id), &metrics, |b, metrics| {
                b.iter(|| {
                    let mut metrics = metrics.clone();
                    let summary = summarize_run_metrics(&mut metrics, &layout, black_box(skip_median)).unwrap();
                    black_box(summary);
                });
            });
        }
    }

    group.finish();
}

/// Benchmark candle-stick chart data by cycle
fn bench_plot_by_cycle(c: &mut Criterion) {
    let layout = layout(150);
    let metrics = run_metrics(150);
    let mut group = c.benchmark_group("plot_by_cycle");

    for metric in [MetricType::Intensity, MetricType::ErrorRate, MetricType::PercentQ30] {
        group.bench_function(BenchmarkId::from_parameter(metric.to_string()), |b| {
            b.iter(|| {
                let plot = plot_by_cycle(&metrics, &layout, black_box(metric), &FilterOptions::default()).unwrap();
                black_box(plot);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_plot_by_cycle);
criterion_main!(benches);
