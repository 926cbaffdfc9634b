use anyhow::{Context, Result};
use interop::io::{decode_metrics, MetricFormat};
use interop::metrics::{
    CorrectedIntensityMetric, ErrorMetric, ExtractionMetric, IndexMetric, MetricRecord, MetricSet,
    QCollapsedMetric, QMetric, TileMetric,
};
use std::path::{Path, PathBuf};

use super::MetricKind;

/// Display information about a metric file
pub fn run(kind: MetricKind, file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }
    let bytes = std::fs::read(&file).context("Failed to read metric file")?;

    match kind {
        MetricKind::Tile => {
            describe(&file, &decode::<TileMetric>(&bytes)?);
        }
        MetricKind::Error => {
            describe(&file, &decode::<ErrorMetric>(&bytes)?);
        }
        MetricKind::Extraction => {
            let set = decode::<ExtractionMetric>(&bytes)?;
            describe(&file, &set);
            describe_extraction_times(&set);
        }
        MetricKind::Q => {
            let set = decode::<QMetric>(&bytes)?;
            describe(&file, &set);
            describe_q_bins(&set);
        }
        MetricKind::QCollapsed => {
            describe(&file, &decode::<QCollapsedMetric>(&bytes)?);
        }
        MetricKind::CorrectedIntensity => {
            describe(&file, &decode::<CorrectedIntensityMetric>(&bytes)?);
        }
        MetricKind::Index => {
            let set = decode::<IndexMetric>(&bytes)?;
            describe(&file, &set);
            describe_index(&set);
        }
    }

    Ok(())
}

fn decode<T: MetricFormat>(bytes: &[u8]) -> Result<MetricSet<T>> {
    decode_metrics(bytes).with_context(|| format!("Failed to decode {}", T::NAME))
}

fn describe<T: MetricFormat>(file: &Path, set: &MetricSet<T>) {
    let title = format!("{} ({})", T::NAME, T::GROUP);
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!("File: {}", file.display());
    println!();

    println!("File Statistics:");
    println!("  Version: {}", set.version());
    println!("  Records: {}", set.len());
    if set.max_cycle() > 0 {
        println!("  Max cycle: {}", set.max_cycle());
    }
    println!();

    println!("Lanes:");
    for lane in set.lanes() {
        let tiles = set.tile_numbers_for_lane(lane);
        let records = set.iter().filter(|r| r.lane() == lane).count();
        match (tiles.first(), tiles.last()) {
            (Some(first), Some(last)) => println!(
                "  {:3}. {} tiles ({}..{}), {} records",
                lane,
                tiles.len(),
                first,
                last,
                records
            ),
            _ => println!("  {:3}. no tiles", lane),
        }
    }
}

fn describe_extraction_times(set: &MetricSet<ExtractionMetric>) {
    let first = set.iter().min_by_key(|m| m.date_time_unix());
    let last = set.iter().max_by_key(|m| m.date_time_unix());
    if let (Some(first), Some(last)) = (first, last) {
        println!();
        println!("Extraction Times:");
        println!("  First: {} (cycle {})", first.date_time, first.cycle);
        println!("  Last:  {} (cycle {})", last.date_time, last.cycle);
    }
}

fn describe_q_bins(set: &MetricSet<QMetric>) {
    let header = set.header();
    println!();
    if !header.is_binned() {
        println!("Q-score Bins: none (one slot per q-score)");
        return;
    }
    println!("Q-score Bins:");
    for (i, bin) in header.bins.iter().enumerate() {
        println!("  {:3}. Q{}-Q{} reported as Q{}", i + 1, bin.lower, bin.upper, bin.value);
    }
}

fn describe_index(set: &MetricSet<IndexMetric>) {
    use std::collections::BTreeMap;

    let mut clusters: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for metric in set {
        for info in &metric.indices {
            *clusters
                .entry((info.sample_id.as_str(), info.index_sequence.as_str()))
                .or_default() += info.cluster_count as u64;
        }
    }
    if clusters.is_empty() {
        return;
    }
    println!();
    println!("Samples:");
    for ((sample, sequence), count) in clusters {
        println!("  {} [{}]: {} clusters", sample, sequence, count);
    }
}
