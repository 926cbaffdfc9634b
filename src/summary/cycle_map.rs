use crate::error::{InteropError, Result};
use crate::run::ReadInfo;

/// Position of an absolute cycle within the run's reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCycle {
    /// Position of the read in the run layout
    pub read_index: usize,
    /// Cycle within the read (1-based)
    pub cycle_within_read: u16,
}

/// Lookup from absolute cycle to read
///
/// Every cycle of every read maps to exactly one read; cycles outside all
/// reads map to nothing.
#[derive(Debug, Clone, Default)]
pub struct CycleToRead {
    cycles: Vec<Option<ReadCycle>>,
}

impl CycleToRead {
    /// Build the lookup, failing if reads overlap or are inverted
    pub fn new(reads: &[ReadInfo]) -> Result<Self> {
        let total = reads.iter().map(|r| r.last_cycle as usize).max().unwrap_or(0);
        let mut cycles = vec![None; total];
        for (read_index, read) in reads.iter().enumerate() {
            if read.first_cycle == 0 || read.last_cycle < read.first_cycle {
                return Err(InteropError::IndexOutOfRange {
                    kind: "cycle",
                    index: read.first_cycle as usize,
                    limit: read.last_cycle as usize,
                });
            }
            for cycle in read.first_cycle..=read.last_cycle {
                let slot = &mut cycles[cycle as usize - 1];
                if slot.is_some() {
                    return Err(InteropError::IndexOutOfRange {
                        kind: "cycle",
                        index: cycle as usize,
                        limit: read.first_cycle as usize,
                    });
                }
                *slot = Some(ReadCycle {
                    read_index,
                    cycle_within_read: cycle - read.first_cycle + 1,
                });
            }
        }
        Ok(Self { cycles })
    }

    /// Read position of an absolute cycle
    pub fn get(&self, cycle: u16) -> Option<ReadCycle> {
        let index = (cycle as usize).checked_sub(1)?;
        self.cycles.get(index).copied().flatten()
    }

    /// Last mapped cycle
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// True if no read has any cycle
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}
