//! Tile metrics: one on-disk record per (lane, tile, code), merged per tile
//!
//! Version 2 record (10 bytes): lane u16, tile u16, code u16, value f32.
//!
//! | Code | Measurement |
//! |------|-------------|
//! | 100 | cluster density |
//! | 101 | cluster density PF |
//! | 102 | cluster count |
//! | 103 | cluster count PF |
//! | 200 + 2(r-1) | phasing for read r |
//! | 201 + 2(r-1) | prephasing for read r |
//! | 300 + (r-1) | percent aligned for read r |

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use super::{narrow_tile, MetricFormat};
use crate::metrics::{MetricSet, TileMetric};

const CLUSTER_DENSITY: u16 = 100;
const CLUSTER_DENSITY_PF: u16 = 101;
const CLUSTER_COUNT: u16 = 102;
const CLUSTER_COUNT_PF: u16 = 103;
const PHASING_BASE: u16 = 200;
const ALIGNED_BASE: u16 = 300;
const ALIGNED_END: u16 = 400;

fn write_entry(out: &mut Vec<u8>, lane: u16, tile: u16, code: u16, value: f32) -> io::Result<()> {
    out.write_u16::<LittleEndian>(lane)?;
    out.write_u16::<LittleEndian>(tile)?;
    out.write_u16::<LittleEndian>(code)?;
    out.write_f32::<LittleEndian>(value)
}

impl MetricFormat for TileMetric {
    const NAME: &'static str = "TileMetricsOut";
    const VERSIONS: &'static [u8] = &[2];
    const LATEST_VERSION: u8 = 2;

    fn record_size(_version: u8, _header: &()) -> Option<usize> {
        Some(10)
    }

    fn decode_record(_version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let lane = cursor.read_u16::<LittleEndian>()?;
        let tile = cursor.read_u16::<LittleEndian>()? as u32;
        let code = cursor.read_u16::<LittleEndian>()?;
        let value = cursor.read_f32::<LittleEndian>()?;

        let mut metric = TileMetric::empty(lane, tile);
        match code {
            CLUSTER_DENSITY => metric.cluster_density = Some(value),
            CLUSTER_DENSITY_PF => metric.cluster_density_pf = Some(value),
            CLUSTER_COUNT => metric.cluster_count = Some(value),
            CLUSTER_COUNT_PF => metric.cluster_count_pf = Some(value),
            PHASING_BASE..=299 => {
                let offset = code - PHASING_BASE;
                let read = metric.read_mut(offset / 2 + 1);
                if offset % 2 == 0 {
                    read.percent_phasing = Some(value);
                } else {
                    read.percent_prephasing = Some(value);
                }
            }
            ALIGNED_BASE..=399 => {
                metric.read_mut(code - ALIGNED_BASE + 1).percent_aligned = Some(value);
            }
            _ => debug!("Skipping tile metric code {} for lane {} tile {}", code, lane, tile),
        }
        Ok(metric)
    }

    fn insert(set: &mut MetricSet<Self>, record: Self) {
        // An entry with an unknown code leaves nothing to merge
        if record.is_empty() {
            return;
        }
        set.merge_or_push(record, |existing, new| existing.merge(new));
    }

    fn encode_record(&self, _version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        let tile = narrow_tile(self.tile)?;
        if self.is_empty() {
            return Err(super::invalid_data(format!(
                "tile {} in lane {} carries no measurement",
                self.tile, self.lane
            )));
        }
        let fields = [
            (CLUSTER_DENSITY, self.cluster_density),
            (CLUSTER_DENSITY_PF, self.cluster_density_pf),
            (CLUSTER_COUNT, self.cluster_count),
            (CLUSTER_COUNT_PF, self.cluster_count_pf),
        ];
        for (code, value) in fields {
            if let Some(value) = value {
                write_entry(out, self.lane, tile, code, value)?;
            }
        }
        for read in &self.reads {
            if read.read == 0 || read.read > (ALIGNED_END - ALIGNED_BASE) {
                return Err(super::invalid_data(format!(
                    "read {} cannot be expressed as a tile metric code",
                    read.read
                )));
            }
            if read.is_empty() {
                return Err(super::invalid_data(format!("read {} carries no measurement", read.read)));
            }
            let phasing = PHASING_BASE + (read.read - 1) * 2;
            if phasing > 299 && (read.percent_phasing.is_some() || read.percent_prephasing.is_some()) {
                return Err(super::invalid_data(format!(
                    "read {} cannot carry phasing codes",
                    read.read
                )));
            }
            if let Some(value) = read.percent_phasing {
                write_entry(out, self.lane, tile, phasing, value)?;
            }
            if let Some(value) = read.percent_prephasing {
                write_entry(out, self.lane, tile, phasing + 1, value)?;
            }
            if let Some(value) = read.percent_aligned {
                write_entry(out, self.lane, tile, ALIGNED_BASE + read.read - 1, value)?;
            }
        }
        Ok(())
    }
}
