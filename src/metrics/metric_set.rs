use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{MetricId, MetricRecord};

/// Insertion-ordered collection of one record type
///
/// A set also remembers the format version it was decoded from and the
/// type-specific header (q-score binning for [`super::QMetric`]).
#[derive(Clone)]
pub struct MetricSet<T: MetricRecord> {
    version: u8,
    header: T::Header,
    records: Vec<T>,
    index: HashMap<MetricId, usize>,
}

impl<T: MetricRecord> Default for MetricSet<T> {
    fn default() -> Self {
        Self {
            version: 0,
            header: T::Header::default(),
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: MetricRecord> MetricSet<T> {
    /// Create an empty set with no version
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set for a format version and header
    pub fn with_header(version: u8, header: T::Header) -> Self {
        Self {
            version,
            header,
            ..Self::default()
        }
    }

    /// Build a set from records, keeping their order
    pub fn from_records(version: u8, header: T::Header, records: impl IntoIterator<Item = T>) -> Self {
        let mut set = Self::with_header(version, header);
        for record in records {
            set.push(record);
        }
        set
    }

    /// Format version (0 if the set was not decoded from a file)
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Set the format version
    pub fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    /// Type-specific header
    pub fn header(&self) -> &T::Header {
        &self.header
    }

    /// Replace the header
    pub fn set_header(&mut self, header: T::Header) {
        self.header = header;
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Records as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Append a record
    ///
    /// A later record with an id already present is kept, but lookups by id
    /// keep returning the first one.
    pub fn push(&mut self, record: T) {
        let id = record.id();
        self.index.entry(id).or_insert(self.records.len());
        self.records.push(record);
    }

    /// Record with the given id
    pub fn get(&self, id: MetricId) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    /// Mutable record with the given id
    pub fn get_mut(&mut self, id: MetricId) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&i) => self.records.get_mut(i),
            None => None,
        }
    }

    /// Merge `record` into the record with the same id, or append it
    pub fn merge_or_push(&mut self, record: T, merge: impl FnOnce(&mut T, T)) {
        match self.index.get(&record.id()) {
            Some(&i) => merge(&mut self.records[i], record),
            None => self.push(record),
        }
    }

    /// Remove every record, keeping version and header
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Sorted, distinct tile numbers observed for a lane
    pub fn tile_numbers_for_lane(&self, lane: u16) -> Vec<u32> {
        self.records
            .iter()
            .filter(|r| r.lane() == lane)
            .map(|r| r.tile())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, distinct lanes observed in the set
    pub fn lanes(&self) -> Vec<u16> {
        self.records
            .iter()
            .map(|r| r.lane())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Largest cycle (or read for read-scoped records) observed
    pub fn max_cycle(&self) -> u16 {
        self.records.iter().map(|r| r.cycle()).max().unwrap_or(0)
    }
}

impl<T: MetricRecord + PartialEq> PartialEq for MetricSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.header == other.header && self.records == other.records
    }
}

impl<T: MetricRecord> fmt::Debug for MetricSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSet")
            .field("version", &self.version)
            .field("header", &self.header)
            .field("records", &self.records)
            .finish()
    }
}

impl<'a, T: MetricRecord> IntoIterator for &'a MetricSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T: MetricRecord> Extend<T> for MetricSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}
