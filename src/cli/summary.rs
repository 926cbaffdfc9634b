use anyhow::{Context, Result};
use interop::io::{read_metrics, MetricFormat};
use interop::metrics::{MetricSet, RunMetrics};
use interop::summary::summarize_run_metrics;
use log::{info, warn};
use std::path::{Path, PathBuf};

use super::config::Config;
use super::MetricFiles;

/// Load the metric files given on the command line and print the run summary
pub fn run(layout: PathBuf, files: MetricFiles, skip_median: bool, json: bool) -> Result<()> {
    let config = Config::from_file(&layout)?;
    let skip_median = skip_median || config.summary.skip_median;

    let mut metrics = load_run_metrics(&files)?;
    if metrics.is_empty() {
        warn!("No metric records loaded; the summary will be empty");
    }

    let summary = summarize_run_metrics(&mut metrics, &config.run, skip_median)
        .context("Failed to summarize run metrics")?;

    if json {
        let text = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", text);
    } else {
        println!("Run Summary");
        println!("===========");
        println!("Layout: {}", layout.display());
        println!("Total yield: {:.2} G", summary.total_yield_g());
        println!();
        print!("{}", summary);
    }

    Ok(())
}

/// Decode every metric file that was supplied into one [`RunMetrics`]
fn load_run_metrics(files: &MetricFiles) -> Result<RunMetrics> {
    let mut metrics = RunMetrics::new();
    load(files.tile.as_deref(), &mut metrics.tile)?;
    load(files.error.as_deref(), &mut metrics.error)?;
    load(files.extraction.as_deref(), &mut metrics.extraction)?;
    load(files.q.as_deref(), &mut metrics.q)?;
    load(files.q_collapsed.as_deref(), &mut metrics.q_collapsed)?;
    load(files.corrected_intensity.as_deref(), &mut metrics.corrected_intensity)?;
    load(files.index.as_deref(), &mut metrics.index)?;
    Ok(metrics)
}

fn load<T: MetricFormat>(path: Option<&Path>, set: &mut MetricSet<T>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read metric file: {}", path.display()))?;
    read_metrics(&bytes, set).with_context(|| format!("Failed to decode {}: {}", T::NAME, path.display()))?;
    info!("Loaded {} {} records from {}", set.len(), T::NAME, path.display());
    Ok(())
}
