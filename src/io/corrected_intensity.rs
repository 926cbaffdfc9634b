//! Corrected intensity metrics
//!
//! Version 2 record (48 bytes): lane, tile, cycle (u16), average cycle
//! intensity u16, four u16 corrected intensities over all clusters, four u16
//! corrected intensities over called clusters, five u32 call counts
//! (no-call, A, C, G, T) and an f32 signal to noise ratio.
//!
//! Version 3 record (34 bytes) keeps only the called intensities and the
//! call counts; the remaining fields decode as zero.

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{read_lane_tile_cycle, write_lane_tile_cycle, MetricFormat};
use crate::constants::{NUM_OF_BASES, NUM_OF_BASES_AND_NC};
use crate::metrics::CorrectedIntensityMetric;

fn write_u16s(out: &mut Vec<u8>, values: &[u16]) -> io::Result<()> {
    for &value in values {
        out.write_u16::<LittleEndian>(value)?;
    }
    Ok(())
}

impl MetricFormat for CorrectedIntensityMetric {
    const NAME: &'static str = "CorrectedIntMetricsOut";
    const VERSIONS: &'static [u8] = &[2, 3];
    const LATEST_VERSION: u8 = 3;

    fn record_size(version: u8, _header: &()) -> Option<usize> {
        match version {
            2 => Some(48),
            _ => Some(34),
        }
    }

    fn decode_record(version: u8, _header: &(), cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let (lane, tile, cycle) = read_lane_tile_cycle(cursor)?;
        let mut metric = CorrectedIntensityMetric {
            lane,
            tile,
            cycle,
            ..CorrectedIntensityMetric::default()
        };
        if version == 2 {
            metric.average_cycle_intensity = cursor.read_u16::<LittleEndian>()?;
            cursor.read_u16_into::<LittleEndian>(&mut metric.corrected_int_all)?;
        }
        let mut called = [0u16; NUM_OF_BASES];
        cursor.read_u16_into::<LittleEndian>(&mut called)?;
        let mut counts = [0u32; NUM_OF_BASES_AND_NC];
        cursor.read_u32_into::<LittleEndian>(&mut counts)?;
        metric.corrected_int_called = called;
        metric.called_counts = counts;
        if version == 2 {
            metric.signal_to_noise = cursor.read_f32::<LittleEndian>()?;
        }
        Ok(metric)
    }

    fn encode_record(&self, version: u8, _header: &(), out: &mut Vec<u8>) -> io::Result<()> {
        write_lane_tile_cycle(out, self.lane, self.tile, self.cycle)?;
        if version == 2 {
            out.write_u16::<LittleEndian>(self.average_cycle_intensity)?;
            write_u16s(out, &self.corrected_int_all)?;
        }
        write_u16s(out, &self.corrected_int_called)?;
        for count in self.called_counts {
            out.write_u32::<LittleEndian>(count)?;
        }
        if version == 2 {
            out.write_f32::<LittleEndian>(self.signal_to_noise)?;
        }
        Ok(())
    }
}
