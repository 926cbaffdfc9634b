use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::MetricGroup;
use crate::time::LegacyTimestamp;

/// Number of channels stored in an extraction record
pub const EXTRACTION_CHANNELS: usize = 4;

/// Image extraction figures of one tile at one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Absolute cycle (1-based)
    pub cycle: u16,
    /// Focus score (full width at half maximum) per channel
    pub fwhm: [f32; EXTRACTION_CHANNELS],
    /// 90th percentile intensity per channel
    pub max_intensity: [u16; EXTRACTION_CHANNELS],
    /// Acquisition time in the legacy tick encoding
    pub date_time: LegacyTimestamp,
}

impl ExtractionMetric {
    /// Create an extraction metric stamped with a Unix acquisition time
    pub fn new(
        lane: u16,
        tile: u32,
        cycle: u16,
        fwhm: [f32; EXTRACTION_CHANNELS],
        max_intensity: [u16; EXTRACTION_CHANNELS],
        unix_seconds: i64,
    ) -> Self {
        Self {
            lane,
            tile,
            cycle,
            fwhm,
            max_intensity,
            date_time: LegacyTimestamp::from_unix(unix_seconds),
        }
    }

    /// Acquisition time in seconds since the Unix epoch
    pub fn date_time_unix(&self) -> i64 {
        self.date_time.to_unix()
    }

    /// Intensity of one channel, `None` past the stored channels
    pub fn intensity(&self, channel: usize) -> Option<u16> {
        self.max_intensity.get(channel).copied()
    }

    /// FWHM of one channel, `None` past the stored channels
    pub fn focus(&self, channel: usize) -> Option<f32> {
        self.fwhm.get(channel).copied()
    }
}

impl MetricRecord for ExtractionMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::Extraction;

    fn lane(&self) -> u16 {
        self.lane
    }

    fn tile(&self) -> u32 {
        self.tile
    }

    fn cycle(&self) -> u16 {
        self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time_round_trip() {
        let metric = ExtractionMetric::new(1, 1101, 1, [2.0; 4], [300; 4], 1_460_000_000);
        assert_eq!(metric.date_time_unix(), 1_460_000_000);
        assert!(metric.date_time.raw() & 0x8000_0000_0000_0000 != 0);
        assert_eq!(metric.intensity(4), None);
    }
}
