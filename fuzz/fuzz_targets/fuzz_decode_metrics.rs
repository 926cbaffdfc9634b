#![no_main]

use interop::io::{decode_metrics, write_metrics_default, MetricFormat};
use interop::metrics::{
    CorrectedIntensityMetric, ErrorMetric, ExtractionMetric, IndexMetric, QCollapsedMetric, QMetric,
    TileMetric,
};
use libfuzzer_sys::fuzz_target;

/// Decoding must never panic; anything that decodes must encode again
fn check<T: MetricFormat>(data: &[u8]) {
    if let Ok(set) = decode_metrics::<T>(data) {
        let _ = write_metrics_default::<T>(&set);
    }
}

fuzz_target!(|data: &[u8]| {
    check::<TileMetric>(data);
    check::<ErrorMetric>(data);
    check::<ExtractionMetric>(data);
    check::<QMetric>(data);
    check::<QCollapsedMetric>(data);
    check::<CorrectedIntensityMetric>(data);
    check::<IndexMetric>(data);
});
