//! Integration tests for interop
//!
//! These tests write metric files to disk, load them back and run the
//! summary and chart pipelines over them.

use interop::constants::MetricType;
use interop::io::{read_metrics, write_metrics, MetricFormat};
use interop::metrics::{
    ErrorMetric, ExtractionMetric, MetricSet, QMetric, QScoreHeader, RunMetrics, TileMetric, MAX_Q_BINS,
};
use interop::plot::{plot_by_cycle, FilterOptions};
use interop::run::RunLayout;
use interop::summary::{summarize_run_metrics, CycleStage};
use interop::InteropError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const TILES: [u32; 2] = [1101, 1102];

const LAYOUT_TOML: &str = r#"
    channels = ["A", "C", "G", "T"]
    flowcell = { lane_count = 1, surface_count = 2, swath_count = 1, tile_count = 1 }

    [[reads]]
    number = 1
    first_cycle = 1
    last_cycle = 3

    [[reads]]
    number = 2
    first_cycle = 4
    last_cycle = 5
    is_index = true
"#;

fn layout() -> RunLayout {
    toml::from_str(LAYOUT_TOML).unwrap()
}

fn write_file<T: MetricFormat>(dir: &Path, set: &MetricSet<T>, version: u8) -> std::path::PathBuf {
    let path = dir.join(format!("{}.bin", T::NAME));
    fs::write(&path, write_metrics(set, version).unwrap()).unwrap();
    path
}

fn load_file<T: MetricFormat>(path: &Path) -> MetricSet<T> {
    let bytes = fs::read(path).unwrap();
    let mut set = MetricSet::new();
    read_metrics(&bytes, &mut set).unwrap();
    set
}

/// Q35 for every base of every tile and cycle
fn q_set() -> MetricSet<QMetric> {
    let mut histogram = vec![0u32; MAX_Q_BINS];
    histogram[34] = 100;
    let records = TILES
        .iter()
        .flat_map(|&tile| (1..=5).map(move |cycle| (tile, cycle)))
        .map(|(tile, cycle)| QMetric::new(1, tile, cycle, histogram.clone()));
    MetricSet::from_records(5, QScoreHeader::default(), records.collect::<Vec<_>>())
}

fn extraction_set() -> MetricSet<ExtractionMetric> {
    let records = TILES.iter().flat_map(|&tile| {
        (1..=5).map(move |cycle| {
            ExtractionMetric::new(
                1,
                tile,
                cycle,
                [2.0, 2.1, 2.2, 2.3],
                [400 + cycle, 300, 200, 100],
                1_600_000_000 + cycle as i64 * 600,
            )
        })
    });
    MetricSet::from_records(2, (), records.collect::<Vec<_>>())
}

fn write_run(dir: &Path) -> RunMetrics {
    let tile = MetricSet::from_records(
        2,
        (),
        vec![
            TileMetric::new(1, 1101, 200_000.0, 180_000.0, 1_000.0, 900.0),
            TileMetric::new(1, 1102, 300_000.0, 240_000.0, 1_500.0, 1_200.0),
        ],
    );
    let error = MetricSet::from_records(
        3,
        (),
        TILES
            .iter()
            .flat_map(|&tile| (1..=5).map(move |cycle| ErrorMetric::new(1, tile, cycle, 0.5, [99, 1, 0, 0, 0])))
            .collect::<Vec<_>>(),
    );

    let tile_path = write_file(dir, &tile, 2);
    let error_path = write_file(dir, &error, 3);
    let extraction_path = write_file(dir, &extraction_set(), 2);
    let q_path = write_file(dir, &q_set(), 5);

    let mut metrics = RunMetrics::new();
    metrics.tile = load_file(&tile_path);
    metrics.error = load_file(&error_path);
    metrics.extraction = load_file(&extraction_path);
    metrics.q = load_file(&q_path);
    metrics
}

// ==================== Run Summary ====================

#[test]
fn test_summary_from_metric_files() {
    let dir = tempdir().unwrap();
    let mut metrics = write_run(dir.path());
    assert_eq!(metrics.tile.len(), 2);
    assert_eq!(metrics.q.len(), 10);

    let summary = summarize_run_metrics(&mut metrics, &layout(), false).unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.lane_count, 1);

    let first = summary.lane(0, 0).unwrap();
    assert_eq!(first.lane, 1);
    assert_eq!(first.tile_count, 2);
    assert!((first.density.mean - 250.0).abs() < 1e-3);
    assert!((first.error_rate.mean - 0.5).abs() < 1e-6);
    assert!((first.percent_gt_q30 - 100.0).abs() < 1e-4);
    // Every cycle of the read is scored, so the projection equals the yield
    assert!((first.projected_yield_g - first.yield_g).abs() < 1e-12);
    assert!((first.first_cycle_intensity.mean - 401.0).abs() < 1e-3);
    assert_eq!(first.cycle_state.range(CycleStage::Qscored).to_string(), "1-3");
    assert_eq!(first.cycle_state.range(CycleStage::Error).to_string(), "1-3");
    assert_eq!(first.cycle_state.range(CycleStage::Called).to_string(), "-");

    let index_read = summary.lane(1, 0).unwrap();
    assert!(summary.reads[1].read.is_index);
    assert_eq!(index_read.cycle_state.range(CycleStage::Extracted).to_string(), "4-5");
    assert!((index_read.first_cycle_intensity.mean - 404.0).abs() < 1e-3);
}

#[test]
fn test_summary_serializes_to_json() {
    let dir = tempdir().unwrap();
    let mut metrics = write_run(dir.path());
    let summary = summarize_run_metrics(&mut metrics, &layout(), true).unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    let reads = value["reads"].as_array().unwrap();
    assert_eq!(reads.len(), 2);
    assert_eq!(reads[0]["lanes"][0]["lane"], 1);
    // Medians were skipped and serialize as null
    assert!(reads[0]["lanes"][0]["density"]["median"].is_null());
}

#[test]
fn test_summary_text_table() {
    let dir = tempdir().unwrap();
    let mut metrics = write_run(dir.path());
    let summary = summarize_run_metrics(&mut metrics, &layout(), false).unwrap();

    let text = summary.to_string();
    assert!(text.starts_with("Read"));
    assert!(text.contains("2 (I)"));
    assert!(text.contains("Total"));
}

#[test]
fn test_lane_outside_layout_fails() {
    let dir = tempdir().unwrap();
    let mut metrics = write_run(dir.path());
    metrics.error.push(ErrorMetric::new(3, 1101, 1, 0.5, [0; 5]));

    let err = summarize_run_metrics(&mut metrics, &layout(), false).unwrap_err();
    assert!(matches!(err, InteropError::IndexOutOfRange { kind: "lane", .. }));
}

// ==================== File Handling ====================

#[test]
fn test_truncated_file_leaves_set_untouched() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), &extraction_set(), 2);
    let mut bytes = fs::read(&path).unwrap();
    bytes.pop();
    fs::write(&path, &bytes).unwrap();

    let mut set = extraction_set();
    let before = set.clone();
    let err = read_metrics(&fs::read(&path).unwrap(), &mut set).unwrap_err();
    assert!(matches!(err, InteropError::MalformedRecord { .. }));
    assert_eq!(set, before);
}

#[test]
fn test_wrong_family_is_rejected() {
    let dir = tempdir().unwrap();
    // Extraction v2 files carry a version byte no error metric layout accepts
    let path = write_file(dir.path(), &extraction_set(), 2);
    let mut set = MetricSet::<ErrorMetric>::new();
    let err = read_metrics(&fs::read(&path).unwrap(), &mut set).unwrap_err();
    assert!(matches!(err, InteropError::UnsupportedFormatVersion { version: 2, .. }));
    assert!(set.is_empty());
}

#[test]
fn test_extraction_timestamps_survive_disk() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), &extraction_set(), 2);
    let set: MetricSet<ExtractionMetric> = load_file(&path);

    let first = set.iter().find(|m| m.cycle == 1).unwrap();
    assert_eq!(first.date_time_unix(), 1_600_000_600);
    assert_eq!(first.date_time.to_string(), "2020-09-13 12:36:40");
}

// ==================== Chart Data ====================

#[test]
fn test_intensity_plot_from_files() {
    let dir = tempdir().unwrap();
    let metrics = write_run(dir.path());

    let plot = plot_by_cycle(&metrics, &layout(), MetricType::Intensity, &FilterOptions::default()).unwrap();
    assert_eq!(plot.len(), 4);
    assert_eq!(plot[0].points.len(), 5);
    assert_eq!(plot[0].points[0].x, 1.0);
    assert_eq!(plot[0].points[0].p50, 401.0);
    assert_eq!(plot[3].points[4].p50, 100.0);
}
