//! # Binary metric file codec
//!
//! Every metric file starts with a one byte version tag. Fixed-layout
//! families follow it with a one byte record size and, for some versions, an
//! extra header (q-score binning). Records follow back to back, little-endian,
//! until the end of the stream.
//!
//! ```text
//! [version u8][record_size u8][extra header ...][record 0][record 1]...
//! ```
//!
//! Decoding is all-or-nothing: a stream whose body is not an exact multiple
//! of the record size, or whose header disagrees with the version's layout,
//! fails with [`InteropError::MalformedRecord`] and nothing is stored in the
//! target set.
//!
//! ## Example
//!
//! ```rust
//! use interop::io::{read_metrics, write_metrics};
//! use interop::metrics::{ErrorMetric, MetricSet};
//!
//! let set = MetricSet::from_records(3, (), vec![ErrorMetric::new(1, 1101, 1, 0.45, [9, 1, 0, 0, 0])]);
//! let bytes = write_metrics(&set, 3)?;
//!
//! let mut decoded = MetricSet::<ErrorMetric>::new();
//! read_metrics(&bytes, &mut decoded)?;
//! assert_eq!(decoded, set);
//! # Ok::<(), interop::InteropError>(())
//! ```

mod corrected_intensity;
mod error_metric;
mod extraction;
mod index;
mod q;
mod q_collapsed;
mod tile;


use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::{InteropError, Result};
use crate::metrics::{MetricRecord, MetricSet};

/// Byte layout of one metric family, per format version
pub trait MetricFormat: MetricRecord {
    /// Name used in error messages and logs (e.g. "ErrorMetricsOut")
    const NAME: &'static str;

    /// Versions this crate reads and writes
    const VERSIONS: &'static [u8];

    /// Version written when the caller has no preference
    const LATEST_VERSION: u8;

    /// Size of one on-disk record, `None` for variable-length layouts
    ///
    /// Variable-length layouts carry no record size byte in their header.
    fn record_size(version: u8, header: &Self::Header) -> Option<usize>;

    /// Read the version-specific header that follows the record size byte
    fn read_header(_version: u8, _cursor: &mut Cursor<&[u8]>) -> io::Result<Self::Header> {
        Ok(Self::Header::default())
    }

    /// Write the version-specific header that follows the record size byte
    fn write_header(_version: u8, _header: &Self::Header, _out: &mut Vec<u8>) -> io::Result<()> {
        Ok(())
    }

    /// Decode one on-disk record
    fn decode_record(version: u8, header: &Self::Header, cursor: &mut Cursor<&[u8]>) -> io::Result<Self>;

    /// Store a decoded record; families that spread one record over several
    /// on-disk entries merge here
    fn insert(set: &mut MetricSet<Self>, record: Self) {
        set.push(record);
    }

    /// Encode this record as one or more on-disk records
    fn encode_record(&self, version: u8, header: &Self::Header, out: &mut Vec<u8>) -> io::Result<()>;
}

/// Decode a metric stream into `set`
///
/// `set` is replaced only when the whole stream decodes; on error it is left
/// exactly as it was.
pub fn read_metrics<T: MetricFormat>(bytes: &[u8], set: &mut MetricSet<T>) -> Result<()> {
    *set = decode_metrics(bytes)?;
    Ok(())
}

/// Decode a metric stream into a new set
pub fn decode_metrics<T: MetricFormat>(bytes: &[u8]) -> Result<MetricSet<T>> {
    let Some(&version) = bytes.first() else {
        return Err(InteropError::malformed(T::NAME, "empty stream"));
    };
    if !T::VERSIONS.contains(&version) {
        return Err(InteropError::UnsupportedFormatVersion {
            metric: T::NAME,
            version,
        });
    }

    let mut cursor = Cursor::new(bytes);
    cursor.set_position(1);

    // Variable-length layouts have no record size byte; size them with the default header
    let declared_size = match T::record_size(version, &T::Header::default()) {
        Some(_) => Some(
            cursor
                .read_u8()
                .map_err(|_| InteropError::malformed(T::NAME, "missing record size"))? as usize,
        ),
        None => None,
    };
    let header = T::read_header(version, &mut cursor)
        .map_err(|e| InteropError::malformed(T::NAME, format!("bad header: {}", e)))?;
    let header_len = cursor.position() as usize;
    let mut set = MetricSet::with_header(version, header.clone());

    match (T::record_size(version, &header), declared_size) {
        (Some(expected), Some(declared)) => {
            if declared != expected {
                return Err(InteropError::malformed(
                    T::NAME,
                    format!(
                        "record size {} does not match version {} layout ({})",
                        declared, version, expected
                    ),
                ));
            }
            let body = bytes.len() - header_len;
            if body % expected != 0 {
                return Err(InteropError::malformed(
                    T::NAME,
                    format!(
                        "{} bytes after the {} byte header is not a multiple of the {} byte record size",
                        body, header_len, expected
                    ),
                ));
            }
            for n in 0..body / expected {
                let record = T::decode_record(version, &header, &mut cursor)
                    .map_err(|e| InteropError::malformed(T::NAME, format!("record {}: {}", n, e)))?;
                T::insert(&mut set, record);
            }
        }
        (None, None) => {
            let mut n = 0usize;
            while (cursor.position() as usize) < bytes.len() {
                let record = T::decode_record(version, &header, &mut cursor)
                    .map_err(|e| InteropError::malformed(T::NAME, format!("record {}: {}", n, e)))?;
                T::insert(&mut set, record);
                n += 1;
            }
        }
        _ => {
            return Err(InteropError::malformed(
                T::NAME,
                "header changes the layout between fixed and variable length",
            ))
        }
    }

    debug!(
        "Decoded {} {} records (version {}, {} bytes)",
        set.len(),
        T::NAME,
        version,
        bytes.len()
    );
    Ok(set)
}

/// Encode a metric set in the given format version
pub fn write_metrics<T: MetricFormat>(set: &MetricSet<T>, version: u8) -> Result<Vec<u8>> {
    if !T::VERSIONS.contains(&version) {
        return Err(InteropError::UnsupportedFormatVersion {
            metric: T::NAME,
            version,
        });
    }
    let header = set.header();
    let mut out = Vec::new();
    out.push(version);
    if let Some(size) = T::record_size(version, header) {
        let size = u8::try_from(size).map_err(|_| {
            InteropError::malformed(T::NAME, format!("record size {} does not fit the header", size))
        })?;
        out.push(size);
    }
    T::write_header(version, header, &mut out)
        .map_err(|e| InteropError::malformed(T::NAME, format!("bad header: {}", e)))?;
    for (n, record) in set.iter().enumerate() {
        record
            .encode_record(version, header, &mut out)
            .map_err(|e| InteropError::malformed(T::NAME, format!("record {}: {}", n, e)))?;
    }
    debug!(
        "Encoded {} {} records (version {}, {} bytes)",
        set.len(),
        T::NAME,
        version,
        out.len()
    );
    Ok(out)
}

/// Encode a metric set in its own version, or the latest one if it has none
pub fn write_metrics_default<T: MetricFormat>(set: &MetricSet<T>) -> Result<Vec<u8>> {
    let version = if T::VERSIONS.contains(&set.version()) {
        set.version()
    } else {
        T::LATEST_VERSION
    };
    write_metrics(set, version)
}

fn read_lane_tile_cycle(cursor: &mut Cursor<&[u8]>) -> io::Result<(u16, u32, u16)> {
    let lane = cursor.read_u16::<LittleEndian>()?;
    let tile = cursor.read_u16::<LittleEndian>()? as u32;
    let cycle = cursor.read_u16::<LittleEndian>()?;
    Ok((lane, tile, cycle))
}

fn write_lane_tile_cycle(out: &mut Vec<u8>, lane: u16, tile: u32, cycle: u16) -> io::Result<()> {
    out.write_u16::<LittleEndian>(lane)?;
    out.write_u16::<LittleEndian>(narrow_tile(tile)?)?;
    out.write_u16::<LittleEndian>(cycle)
}

fn narrow_tile(tile: u32) -> io::Result<u16> {
    u16::try_from(tile).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("tile {} does not fit a 16-bit tile field", tile),
        )
    })
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
