use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::MetricGroup;

/// Clusters assigned to one sample index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Index sequence (e.g. "ATCACG-GCTAGC")
    pub index_sequence: String,
    /// Sample id
    pub sample_id: String,
    /// Sample project
    pub sample_project: String,
    /// Number of clusters assigned to the index
    pub cluster_count: u32,
}

impl IndexInfo {
    /// Create an index entry
    pub fn new(
        index_sequence: impl Into<String>,
        sample_id: impl Into<String>,
        sample_project: impl Into<String>,
        cluster_count: u32,
    ) -> Self {
        Self {
            index_sequence: index_sequence.into(),
            sample_id: sample_id.into(),
            sample_project: sample_project.into(),
            cluster_count,
        }
    }
}

/// Demultiplexing counts of one tile in one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Read number (1-based)
    pub read: u16,
    /// Per-index counts in file order
    pub indices: Vec<IndexInfo>,
}

impl IndexMetric {
    /// Create an index metric
    pub fn new(lane: u16, tile: u32, read: u16, indices: Vec<IndexInfo>) -> Self {
        Self {
            lane,
            tile,
            read,
            indices,
        }
    }

    /// Total clusters assigned to any index
    pub fn total_clusters(&self) -> u64 {
        self.indices.iter().map(|i| i.cluster_count as u64).sum()
    }
}

impl MetricRecord for IndexMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::Index;

    fn lane(&self) -> u16 {
        self.lane
    }

    fn tile(&self) -> u32 {
        self.tile
    }

    fn cycle(&self) -> u16 {
        self.read
    }
}
