//! Collapsed q-score metrics
//!
//! Version 2 record (22 bytes): lane u16, tile u16, cycle u16, then u32 Q20
//! count, Q30 count, total count and median q-score.

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::metrics::QCollapsedMetric;

impl MetricFormat for QCollapsedMetric {
    const NAME: &'static str = "QMetrics2030Out";
    const VERSIONS: &'static [u8] = &[2];
    const LATEST_VERSION: u8 = 2;

    fn record_size(_version: u8, _header: &()) -> Option<usize> {
        Some(22)
    }

    fn decode_record(_version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, cycle) = read_lane_tile_cycle(cursor)?;
        let q20 = cursor.read_u32::<LittleEndian>()?;
        let q30 = cursor.read_u32::<LittleEndian>()?;
        let total = cursor.read_u32::<LittleEndian>()?;
        let median_qscore = cursor.read_u32::<LittleEndian>()?;
        Ok(QCollapsedMetric::new(lane, tile, cycle, q20, q30, total, median_qscore))
    }

    fn encode_record(&self, _version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        write_lane_tile_cycle(out, self.lane, self.tile, self.cycle)?;
        out.write_u32::<LittleEndian>(self.q20)?;
        out.write_u32::<LittleEndian>(self.q30)?;
        out.write_u32::<LittleEndian>(self.total)?;
        out.write_u32::<LittleEndian>(self.median_qscore)
    }
}
