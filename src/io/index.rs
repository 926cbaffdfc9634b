//! Index (demultiplexing) metrics
//!
//! Version 1 has no record size byte; each on-disk record is variable length:
//!
//! ```text
//! lane u16, tile u16, read u16,
//! index sequence (u16 length + bytes),
//! cluster count u32,
//! sample id (u16 length + bytes),
//! sample project (u16 length + bytes)
//! ```
//!
//! One on-disk record carries a single index; records sharing a lane, tile
//! and read are merged into one [`IndexMetric`].

use std::io::{self, Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{invalid_data, read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::metrics::{IndexInfo, IndexMetric, MetricSet};

fn read_string(cursor: &mut Cursor<&[u8]>) -> io::Result<String> {
    let len = cursor.read_u16::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| invalid_data(format!("string is not UTF-8: {}", e)))
}

fn write_string(out: &mut Vec<u8>, value: &str) -> io::Result<()> {
    let len = u16::try_from(value.len())
        .map_err(|_| invalid_data(format!("string of {} bytes is too long", value.len())))?;
    out.write_u16::<LittleEndian>(len)?;
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

impl MetricFormat for IndexMetric {
    const NAME: &'static str = "IndexMetricsOut";
    const VERSIONS: &'static [u8] = &[1];
    const LATEST_VERSION: u8 = 1;

    fn record_size(_version: u8, _header: &()) -> Option<usize> {
        None
    }

    fn decode_record(_version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, read) = read_lane_tile_cycle(cursor)?;
        let index_sequence = read_string(cursor)?;
        let cluster_count = cursor.read_u32::<LittleEndian>()?;
        let sample_id = read_string(cursor)?;
        let sample_project = read_string(cursor)?;
        Ok(IndexMetric::new(
            lane,
            tile,
            read,
            vec![IndexInfo::new(index_sequence, sample_id, sample_project, cluster_count)],
        ))
    }

    fn insert(set: &mut MetricSet<Self>, record: Self) {
        set.merge_or_push(record, |existing, new| existing.indices.extend(new.indices));
    }

    fn encode_record(&self, _version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        if self.indices.is_empty() {
            return Err(invalid_data(format!(
                "lane {} tile {} read {} has no index to write",
                self.lane, self.tile, self.read
            )));
        }
        for info in &self.indices {
            write_lane_tile_cycle(out, self.lane, self.tile, self.read)?;
            write_string(out, &info.index_sequence)?;
            out.write_u32::<LittleEndian>(info.cluster_count)?;
            write_string(out, &info.sample_id)?;
            write_string(out, &info.sample_project)?;
        }
        Ok(())
    }
}
