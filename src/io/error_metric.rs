//! Error metrics
//!
//! Version 3 record (30 bytes): lane u16, tile u16, cycle u16, error rate f32,
//! then five u32 counts of reads with 0 to 4 mismatches.

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::metrics::ErrorMetric;

impl MetricFormat for ErrorMetric {
    const NAME: &'static str = "ErrorMetricsOut";
    const VERSIONS: &'static [u8] = &[3];
    const LATEST_VERSION: u8 = 3;

    fn record_size(_version: u8, _header: &()) -> Option<usize> {
        Some(30)
    }

    fn decode_record(_version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, cycle) = read_lane_tile_cycle(cursor)?;
        let error_rate = cursor.read_f32::<LittleEndian>()?;
        let mut mismatch_counts = [0u32; 5];
        cursor.read_u32_into::<LittleEndian>(&mut mismatch_counts)?;
        Ok(ErrorMetric::new(lane, tile, cycle, error_rate, mismatch_counts))
    }

    fn encode_record(&self, _version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        write_lane_tile_cycle(out, self.lane, self.tile, self.cycle)?;
        out.write_f32::<LittleEndian>(self.error_rate)?;
        for count in self.mismatch_counts {
            out.write_u32::<LittleEndian>(count)?;
        }
        Ok(())
    }
}
