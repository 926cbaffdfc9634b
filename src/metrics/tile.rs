use serde::{Deserialize, Serialize};

use super::MetricRecord;
use crate::constants::MetricGroup;

/// Per-read figures reported for a tile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileReadMetric {
    /// Read number (1-based)
    pub read: u16,
    /// Percentage of clusters aligned to the control genome
    pub percent_aligned: Option<f32>,
    /// Percent phasing
    pub percent_phasing: Option<f32>,
    /// Percent prephasing
    pub percent_prephasing: Option<f32>,
}

impl TileReadMetric {
    /// Create an empty read entry
    pub fn new(read: u16) -> Self {
        Self {
            read,
            ..Self::default()
        }
    }

    /// True if the entry carries no figure at all
    pub fn is_empty(&self) -> bool {
        self.percent_aligned.is_none() && self.percent_phasing.is_none() && self.percent_prephasing.is_none()
    }

    fn merge(&mut self, other: &TileReadMetric) {
        self.percent_aligned = other.percent_aligned.or(self.percent_aligned);
        self.percent_phasing = other.percent_phasing.or(self.percent_phasing);
        self.percent_prephasing = other.percent_prephasing.or(self.percent_prephasing);
    }
}

/// Cluster density and count figures for one tile
///
/// Every measurement is optional: tile metric files list measurements one
/// code at a time and a file may omit any of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileMetric {
    /// Lane number (1-based)
    pub lane: u16,
    /// Tile number
    pub tile: u32,
    /// Cluster density (clusters per mm²)
    pub cluster_density: Option<f32>,
    /// Density of clusters passing filter (clusters per mm²)
    pub cluster_density_pf: Option<f32>,
    /// Number of clusters
    pub cluster_count: Option<f32>,
    /// Number of clusters passing filter
    pub cluster_count_pf: Option<f32>,
    /// Per-read figures, ordered by read number
    pub reads: Vec<TileReadMetric>,
}

impl TileMetric {
    /// Create a tile metric with density and count figures
    pub fn new(
        lane: u16,
        tile: u32,
        cluster_density: f32,
        cluster_density_pf: f32,
        cluster_count: f32,
        cluster_count_pf: f32,
    ) -> Self {
        Self {
            lane,
            tile,
            cluster_density: Some(cluster_density),
            cluster_density_pf: Some(cluster_density_pf),
            cluster_count: Some(cluster_count),
            cluster_count_pf: Some(cluster_count_pf),
            reads: Vec::new(),
        }
    }

    /// Create a tile metric with no measurements
    pub fn empty(lane: u16, tile: u32) -> Self {
        Self {
            lane,
            tile,
            ..Self::default()
        }
    }

    /// Add (or replace) the figures for one read
    pub fn with_read(mut self, read: TileReadMetric) -> Self {
        self.read_mut(read.read).merge(&read);
        self
    }

    /// Figures for a read, if reported
    pub fn read(&self, read: u16) -> Option<&TileReadMetric> {
        self.reads.iter().find(|r| r.read == read)
    }

    /// Figures for a read, inserting an empty entry in read order if missing
    pub fn read_mut(&mut self, read: u16) -> &mut TileReadMetric {
        let pos = match self.reads.binary_search_by_key(&read, |r| r.read) {
            Ok(pos) => pos,
            Err(pos) => {
                self.reads.insert(pos, TileReadMetric::new(read));
                pos
            }
        };
        &mut self.reads[pos]
    }

    /// Percentage of clusters passing filter
    pub fn percent_pf(&self) -> Option<f32> {
        match (self.cluster_count, self.cluster_count_pf) {
            (Some(total), Some(pf)) if total > 0.0 => Some(pf / total * 100.0),
            _ => None,
        }
    }

    /// Clusters passing filter that aligned to the control in `read`
    pub fn aligned_read_count(&self, read: u16) -> Option<f32> {
        let aligned = self.read(read)?.percent_aligned?;
        Some(self.cluster_count_pf? * aligned / 100.0)
    }

    /// True if no lane-level or per-read measurement is present
    pub fn is_empty(&self) -> bool {
        self.cluster_density.is_none()
            && self.cluster_density_pf.is_none()
            && self.cluster_count.is_none()
            && self.cluster_count_pf.is_none()
            && self.reads.iter().all(TileReadMetric::is_empty)
    }

    /// Fold the measurements of `other` (same lane and tile) into this record
    pub fn merge(&mut self, other: TileMetric) {
        self.cluster_density = other.cluster_density.or(self.cluster_density);
        self.cluster_density_pf = other.cluster_density_pf.or(self.cluster_density_pf);
        self.cluster_count = other.cluster_count.or(self.cluster_count);
        self.cluster_count_pf = other.cluster_count_pf.or(self.cluster_count_pf);
        for read in &other.reads {
            self.read_mut(read.read).merge(read);
        }
    }
}

impl MetricRecord for TileMetric {
    type Header = ();
    const GROUP: MetricGroup = MetricGroup::Tile;

    fn lane(&self) -> u16 {
        self.lane
    }

    fn tile(&self) -> u32 {
        self.tile
    }
}
