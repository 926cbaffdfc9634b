//! Error type shared by the codec, the summary engine and chart data

/// Errors raised while decoding metric files or summarizing a run
///
/// Every error is fatal for the call that produced it: the codec never hands
/// back a partially filled metric set and the summary engine never hands back
/// a partially built summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteropError {
    /// The version tag at the start of a metric stream is not one we can read or write
    #[error("Unsupported {metric} format version: {version}")]
    UnsupportedFormatVersion {
        /// Name of the metric stream
        metric: &'static str,
        /// Version tag found in (or requested for) the stream
        version: u8,
    },

    /// The stream is truncated, misaligned or disagrees with its own header
    #[error("Malformed {metric} record: {reason}")]
    MalformedRecord {
        /// Name of the metric stream
        metric: &'static str,
        /// What was wrong with the bytes
        reason: String,
    },

    /// A read, lane or cycle index falls outside the configured run layout
    #[error("{kind} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        /// What kind of index overflowed ("lane", "read", "cycle")
        kind: &'static str,
        /// Offending index
        index: usize,
        /// Largest accepted index
        limit: usize,
    },

    /// The run's channel names cannot be mapped onto the expected channel order
    #[error("Invalid channel configuration: {0}")]
    InvalidChannelConfiguration(String),
}

impl InteropError {
    pub(crate) fn malformed(metric: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            metric,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InteropError>;
