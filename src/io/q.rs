//! Q-score histogram metrics
//!
//! * Version 4: no extra header, 50 u32 counts per record (206 bytes).
//! * Version 5: binning header, 50 u32 counts per record (206 bytes).
//! * Version 6: binning header, one u32 count per bin (6 + 4 * bins bytes).
//!
//! The binning header is a `has_bins` byte; when set, a bin count byte
//! follows and then the lower bounds, upper bounds and values of every bin,
//! one byte each.

use std::io::{self, Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{invalid_data, read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::metrics::{QMetric, QScoreBin, QScoreHeader, MAX_Q_BINS};

/// Histogram slots stored per record for a version and header
fn histogram_len(version: u8, header: &QScoreHeader) -> usize {
    if version >= 6 && header.is_binned() {
        header.bins.len()
    } else {
        MAX_Q_BINS
    }
}

impl MetricFormat for QMetric {
    const NAME: &'static str = "QMetricsOut";
    const VERSIONS: &'static [u8] = &[4, 5, 6];
    const LATEST_VERSION: u8 = 6;

    fn record_size(version: u8, header: &QScoreHeader) -> Option<usize> {
        Some(6 + 4 * histogram_len(version, header))
    }

    fn read_header(version: u8, cursor: &mut Cursor<&[u8]>) -> io::Result<QScoreHeader> {
        if version < 5 {
            return Ok(QScoreHeader::default());
        }
        let has_bins = cursor.read_u8()?;
        if has_bins == 0 {
            return Ok(QScoreHeader::default());
        }
        let count = cursor.read_u8()? as usize;
        if count == 0 || count > MAX_Q_BINS {
            return Err(invalid_data(format!("{} q-score bins", count)));
        }
        let mut lower = vec![0u8; count];
        let mut upper = vec![0u8; count];
        let mut value = vec![0u8; count];
        cursor.read_exact(&mut lower)?;
        cursor.read_exact(&mut upper)?;
        cursor.read_exact(&mut value)?;
        let bins = (0..count)
            .map(|i| QScoreBin::new(lower[i], upper[i], value[i]))
            .collect();
        Ok(QScoreHeader::binned(bins))
    }

    fn write_header(version: u8, header: &QScoreHeader, out: &mut Vec<u8>) -> io::Result<()> {
        if version < 5 {
            return Ok(());
        }
        if !header.is_binned() {
            out.write_u8(0)?;
            return Ok(());
        }
        let count = u8::try_from(header.bins.len())
            .ok()
            .filter(|&c| c as usize <= MAX_Q_BINS)
            .ok_or_else(|| invalid_data(format!("{} q-score bins", header.bins.len())))?;
        out.write_u8(1)?;
        out.write_u8(count)?;
        out.extend(header.bins.iter().map(|b| b.lower));
        out.extend(header.bins.iter().map(|b| b.upper));
        out.extend(header.bins.iter().map(|b| b.value));
        Ok(())
    }

    fn decode_record(version: u8, header: &QScoreHeader, cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, cycle) = read_lane_tile_cycle(cursor)?;
        let mut histogram = vec![0u32; histogram_len(version, header)];
        cursor.read_u32_into::<LittleEndian>(&mut histogram)?;
        Ok(QMetric::new(lane, tile, cycle, histogram))
    }

    fn encode_record(&self, version: u8, header: &QScoreHeader, out: &mut Vec<u8>) -> io::Result<()> {
        let expected = histogram_len(version, header);
        if self.histogram.len() != expected {
            return Err(invalid_data(format!(
                "histogram has {} slots, version {} stores {}",
                self.histogram.len(),
                version,
                expected
            )));
        }
        write_lane_tile_cycle(out, self.lane, self.tile, self.cycle)?;
        for &count in &self.histogram {
            out.write_u32::<LittleEndian>(count)?;
        }
        Ok(())
    }
}
