//! Run layout: read structure, flow cell geometry and imaging channels
//!
//! The layout normally comes from the run's configuration files; this crate
//! only consumes it. It derives serde traits so it can be supplied as TOML or
//! JSON.

use serde::{Deserialize, Serialize};

use crate::error::{InteropError, Result};

/// Expected channel order for four-channel chemistry
pub const FOUR_CHANNEL_NAMES: [&str; 4] = ["A", "C", "G", "T"];

/// Expected channel order for two-channel chemistry
pub const TWO_CHANNEL_NAMES: [&str; 2] = ["Red", "Green"];

/// One sequencing read: a contiguous range of cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadInfo {
    /// Read number (1-based)
    pub number: u16,
    /// First cycle of the read (absolute, 1-based)
    pub first_cycle: u16,
    /// Last cycle of the read (absolute, inclusive)
    pub last_cycle: u16,
    /// True for index reads
    #[serde(default)]
    pub is_index: bool,
}

impl ReadInfo {
    /// Create a non-index read
    pub fn new(number: u16, first_cycle: u16, last_cycle: u16) -> Self {
        Self {
            number,
            first_cycle,
            last_cycle,
            is_index: false,
        }
    }

    /// Mark the read as an index read
    pub fn index(mut self) -> Self {
        self.is_index = true;
        self
    }

    /// Number of cycles in the read
    pub fn total_cycles(&self) -> usize {
        if self.last_cycle < self.first_cycle {
            0
        } else {
            (self.last_cycle - self.first_cycle) as usize + 1
        }
    }

    /// True if the absolute cycle belongs to this read
    pub fn contains(&self, cycle: u16) -> bool {
        cycle >= self.first_cycle && cycle <= self.last_cycle
    }
}

/// Physical geometry of the flow cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowcellLayout {
    /// Number of lanes
    pub lane_count: u16,
    /// Number of imaged surfaces
    #[serde(default = "default_surface_count")]
    pub surface_count: u16,
    /// Number of swaths per surface
    #[serde(default = "default_one")]
    pub swath_count: u16,
    /// Number of tiles per swath
    #[serde(default = "default_one")]
    pub tile_count: u16,
}

fn default_surface_count() -> u16 {
    2
}

fn default_one() -> u16 {
    1
}

impl FlowcellLayout {
    /// Create a flow cell layout
    pub fn new(lane_count: u16, surface_count: u16, swath_count: u16, tile_count: u16) -> Self {
        Self {
            lane_count,
            surface_count,
            swath_count,
            tile_count,
        }
    }

    /// Expected number of tiles in one lane
    pub fn tiles_per_lane(&self) -> usize {
        self.surface_count as usize * self.swath_count as usize * self.tile_count as usize
    }

    /// Position of a four-digit tile number (surface, swath, two-digit tile)
    /// within its lane, surfaces outermost; `None` if the tile lies outside
    /// this geometry
    pub fn tile_slot(&self, tile: u32) -> Option<usize> {
        let surface = tile / 1000;
        let swath = tile / 100 % 10;
        let number = tile % 100;
        if surface == 0 || swath == 0 || number == 0 {
            return None;
        }
        if surface > self.surface_count as u32 || swath > self.swath_count as u32 || number > self.tile_count as u32 {
            return None;
        }
        let slot = ((surface - 1) * self.swath_count as u32 + (swath - 1)) * self.tile_count as u32 + (number - 1);
        Some(slot as usize)
    }
}

impl Default for FlowcellLayout {
    fn default() -> Self {
        Self::new(1, 2, 1, 1)
    }
}

/// Everything the summary engine needs to know about a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLayout {
    /// Reads, ordered by first cycle
    pub reads: Vec<ReadInfo>,
    /// Flow cell geometry
    pub flowcell: FlowcellLayout,
    /// Imaging channel names in acquisition order
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
}

fn default_channels() -> Vec<String> {
    FOUR_CHANNEL_NAMES.iter().map(|c| c.to_string()).collect()
}

impl Default for RunLayout {
    fn default() -> Self {
        Self {
            reads: Vec::new(),
            flowcell: FlowcellLayout::default(),
            channels: default_channels(),
        }
    }
}

impl RunLayout {
    /// Create a four-channel run layout
    pub fn new(reads: Vec<ReadInfo>, flowcell: FlowcellLayout) -> Self {
        Self {
            reads,
            flowcell,
            channels: default_channels(),
        }
    }

    /// Replace the channel names
    pub fn with_channels<S: Into<String>>(mut self, channels: impl IntoIterator<Item = S>) -> Self {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Number of lanes on the flow cell
    pub fn lane_count(&self) -> usize {
        self.flowcell.lane_count as usize
    }

    /// Last cycle of the run
    pub fn total_cycles(&self) -> usize {
        self.reads
            .iter()
            .map(|r| r.last_cycle as usize)
            .max()
            .unwrap_or(0)
    }

    /// Position of each expected channel in the acquisition order
    ///
    /// Element `i` of the result is the index, within [`RunLayout::channels`],
    /// of the `i`-th channel of the chemistry's expected order.
    pub fn expected_to_actual_channels(&self) -> Result<Vec<usize>> {
        expected_to_actual_channel_map(&self.channels)
    }
}

/// Map the expected channel order onto the actual acquisition order
pub fn expected_to_actual_channel_map<S: AsRef<str>>(channels: &[S]) -> Result<Vec<usize>> {
    let expected: &[&str] = match channels.len() {
        4 => &FOUR_CHANNEL_NAMES,
        2 => &TWO_CHANNEL_NAMES,
        0 => {
            return Err(InteropError::InvalidChannelConfiguration(
                "no channels configured".to_string(),
            ))
        }
        n => {
            return Err(InteropError::InvalidChannelConfiguration(format!(
                "expected 2 or 4 channels, found {}",
                n
            )))
        }
    };

    expected
        .iter()
        .map(|name| {
            let mut matches = channels
                .iter()
                .enumerate()
                .filter(|(_, actual)| actual.as_ref().trim().eq_ignore_ascii_case(name));
            match (matches.next(), matches.next()) {
                (Some((index, _)), None) => Ok(index),
                (Some(_), Some(_)) => Err(InteropError::InvalidChannelConfiguration(format!(
                    "channel {} listed more than once",
                    name
                ))),
                (None, _) => Err(InteropError::InvalidChannelConfiguration(format!(
                    "expected channel {} not found in [{}]",
                    name,
                    channels
                        .iter()
                        .map(|c| c.as_ref())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))),
            }
        })
        .collect()
}
