use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use interop::io::{decode_metrics, write_metrics};
use interop::metrics::{ErrorMetric, ExtractionMetric, MetricSet, QMetric, QScoreBin, QScoreHeader, TileMetric};

const LANES: u16 = 8;
const TILES_PER_LANE: u32 = 112;

fn tile_numbers() -> impl Iterator<Item = (u16, u32)> {
    (1..=LANES).flat_map(|lane| (0..TILES_PER_LANE).map(move |t| (lane, 1101 + t)))
}

/// Encoded error metrics for `cycles` cycles of a full flow cell
fn error_file(cycles: u16) -> Vec<u8> {
    let records = tile_numbers().flat_map(|(lane, tile)| {
        (1..=cycles).map(move |cycle| {
            ErrorMetric::new(lane, tile, cycle, 0.1 + (cycle % 7) as f32 * 0.05, [900, 80, 15, 4, 1])
        })
    });
    write_metrics(&MetricSet::from_records(3, (), records), 3).unwrap()
}

fn extraction_file(cycles: u16) -> Vec<u8> {
    let records = tile_numbers().flat_map(|(lane, tile)| {
        (1..=cycles).map(move |cycle| {
            ExtractionMetric::new(
                lane,
                tile,
                cycle,
                [2.5, 2.6, 2.4, 2.7],
                [300 + cycle, 280, 310, 295],
                1_500_000_000 + cycle as i64 * 300,
            )
        })
    });
    write_metrics(&MetricSet::from_records(2, (), records), 2).unwrap()
}

fn binned_q_file(cycles: u16) -> Vec<u8> {
    let header = QScoreHeader::binned(vec![
        QScoreBin::new(1, 9, 7),
        QScoreBin::new(10, 19, 16),
        QScoreBin::new(20, 24, 22),
        QScoreBin::new(25, 29, 27),
        QScoreBin::new(30, 34, 32),
        QScoreBin::new(35, 39, 37),
        QScoreBin::new(40, 41, 40),
    ]);
    let records = tile_numbers().flat_map(|(lane, tile)| {
        (1..=cycles).map(move |cycle| QMetric::new(lane, tile, cycle, vec![0, 1200, 5400, 800, 90000, 4000, 0]))
    });
    write_metrics(&MetricSet::from_records(6, header, records), 6).unwrap()
}

fn tile_file() -> Vec<u8> {
    let records =
        tile_numbers().map(|(lane, tile)| TileMetric::new(lane, tile, 250_000.0, 225_000.0, 700_000.0, 630_000.0));
    write_metrics(&MetricSet::from_records(2, (), records), 2).unwrap()
}

/// Benchmark decoding fixed-size records
fn bench_decode_by_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_by_cycle");

    for cycles in [25u16, 100, 300] {
        let records = LANES as u64 * TILES_PER_LANE as u64 * cycles as u64;
        group.throughput(Throughput::Elements(records));

        let error = error_file(cycles);
        group.bench_with_input(BenchmarkId::new("error", cycles), &error, |b, bytes| {
            b.iter(|| {
                let set: MetricSet<ErrorMetric> = decode_metrics(black_box(bytes)).unwrap();
                black_box(set);
            });
        });

        let extraction = extraction_file(cycles);
        group.bench_with_input(BenchmarkId::new("extraction", cycles), &extraction, |b, bytes| {
            b.iter(|| {
                let set: MetricSet<ExtractionMetric> = decode_metrics(black_box(bytes)).unwrap();
                black_box(set);
            });
        });

        let q = binned_q_file(cycles);
        group.bench_with_input(BenchmarkId::new("q_binned", cycles), &q, |b, bytes| {
            b.iter(|| {
                let set: MetricSet<QMetric> = decode_metrics(black_box(bytes)).unwrap();
                black_box(set);
            });
        });
    }

    group.finish();
}

/// Benchmark decoding tile metrics, which merges several entries per tile
fn bench_decode_tile(c: &mut Criterion) {
    let bytes = tile_file();
    let mut group = c.benchmark_group("decode_tile");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("merge_entries", |b| {
        b.iter(|| {
            let set: MetricSet<TileMetric> = decode_metrics(black_box(&bytes)).unwrap();
            black_box(set);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_decode_by_cycle, bench_decode_tile);
criterion_main!(benches);
