//! Extraction metrics
//!
//! Version 2 record (38 bytes): lane u16, tile u16, cycle u16, four f32 FWHM
//! values, four u16 intensities, then the acquisition time as a legacy u64
//! tick value (see [`crate::time`]).

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::metrics::ExtractionMetric;
use crate::time::LegacyTimestamp;

impl MetricFormat for ExtractionMetric {
    const NAME: &'static str = "ExtractionMetricsOut";
    const VERSIONS: &'static [u8] = &[2];
    const LATEST_VERSION: u8 = 2;

    fn record_size(_version: u8, _header: &()) -> Option<usize> {
        Some(38)
    }

    fn decode_record(_version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, cycle) = read_lane_tile_cycle(cursor)?;
        let mut fwhm = [0f32; 4];
        cursor.read_f32_into::<LittleEndian>(&mut fwhm)?;
        let mut max_intensity = [0u16; 4];
        cursor.read_u16_into::<LittleEndian>(&mut max_intensity)?;
        let date_time = LegacyTimestamp(cursor.read_u64::<LittleEndian>()?);
        Ok(ExtractionMetric {
            lane,
            tile,
            cycle,
            fwhm,
            max_intensity,
            date_time,
        })
    }

    fn encode_record(&self, _version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        write_lane_tile_cycle(out, self.lane, self.tile, self.cycle)?;
        for value in self.fwhm {
            out.write_f32::<LittleEndian>(value)?;
        }
        for value in self.max_intensity {
            out.write_u16::<LittleEndian>(value)?;
        }
        out.write_u64::<LittleEndian>(self.date_time.raw())
    }
}
