//! Enumerations shared by the record model, the summary engine and chart data
//!
//! Each enumeration carries an explicit `Unknown` variant. Display names and
//! group ownership live in static tables so a name or numeric code can be
//! resolved back to its variant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Code returned for the `Unknown` variant of every enumeration
pub const UNKNOWN_CODE: u8 = 0xff;

/// Metric file families (one metric file per group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricGroup {
    /// Corrected intensity metrics
    CorrectedInt,
    /// Error metrics
    Error,
    /// Extraction metrics
    Extraction,
    /// Image metrics
    Image,
    /// Index metrics
    Index,
    /// Q-score metrics
    Q,
    /// Tile metrics
    Tile,
    /// Q-score metrics summed by lane
    QByLane,
    /// Collapsed q-score metrics
    QCollapsed,
    /// Sentinel for an unrecognised group
    Unknown,
}

const METRIC_GROUP_TABLE: &[(MetricGroup, &str)] = &[
    (MetricGroup::CorrectedInt, "CorrectedInt"),
    (MetricGroup::Error, "Error"),
    (MetricGroup::Extraction, "Extraction"),
    (MetricGroup::Image, "Image"),
    (MetricGroup::Index, "Index"),
    (MetricGroup::Q, "Q"),
    (MetricGroup::Tile, "Tile"),
    (MetricGroup::QByLane, "QByLane"),
    (MetricGroup::QCollapsed, "QCollapsed"),
];

impl MetricGroup {
    /// Group name, "UnknownMetricGroup" for the sentinel
    pub fn name(self) -> &'static str {
        METRIC_GROUP_TABLE
            .iter()
            .find(|(group, _)| *group == self)
            .map(|(_, name)| *name)
            .unwrap_or("UnknownMetricGroup")
    }

    /// Resolve a group by name
    pub fn from_name(name: &str) -> Self {
        METRIC_GROUP_TABLE
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(group, _)| *group)
            .unwrap_or(MetricGroup::Unknown)
    }

    /// Numeric code (position in the table)
    pub fn code(self) -> u8 {
        METRIC_GROUP_TABLE
            .iter()
            .position(|(group, _)| *group == self)
            .map(|i| i as u8)
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Resolve a group by numeric code
    pub fn from_code(code: u8) -> Self {
        METRIC_GROUP_TABLE
            .get(code as usize)
            .map(|(group, _)| *group)
            .unwrap_or(MetricGroup::Unknown)
    }
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Individual measurements that can be summarized or plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// Max intensity per channel
    Intensity,
    /// Focus quality (full width at half maximum) per channel
    Fwhm,
    /// Percentage of called bases per base
    PercentBase,
    /// Percentage of bases at or above Q20
    PercentQ20,
    /// Percentage of bases at or above Q30
    PercentQ30,
    /// Percentage of bases at or above Q20, accumulated over cycles
    AccumPercentQ20,
    /// Percentage of bases at or above Q30, accumulated over cycles
    AccumPercentQ30,
    /// Median q-score
    QScore,
    /// Cluster density
    Clusters,
    /// Cluster density passing filter
    ClustersPf,
    /// Cluster count
    ClusterCount,
    /// Cluster count passing filter
    ClusterCountPf,
    /// Clusters passing filter that aligned to the control, per read
    AlignedReadCount,
    /// Alignment error rate
    ErrorRate,
    /// Percent phasing
    PercentPhasing,
    /// Percent prephasing
    PercentPrephasing,
    /// Percent aligned to the control
    PercentAligned,
    /// Corrected intensity over all clusters
    CorrectedIntensity,
    /// Corrected intensity over called clusters
    CalledIntensity,
    /// Signal to noise ratio
    SignalToNoise,
    /// Sentinel for an unrecognised metric type
    Unknown,
}

const METRIC_TYPE_TABLE: &[(MetricType, &str, MetricGroup)] = &[
    (MetricType::Intensity, "Intensity", MetricGroup::Extraction),
    (MetricType::Fwhm, "FWHM", MetricGroup::Extraction),
    (MetricType::PercentBase, "% Base", MetricGroup::CorrectedInt),
    (MetricType::PercentQ20, "% >=Q20", MetricGroup::Q),
    (MetricType::PercentQ30, "% >=Q30", MetricGroup::Q),
    (MetricType::AccumPercentQ20, "% >=Q20 (Accum)", MetricGroup::Q),
    (MetricType::AccumPercentQ30, "% >=Q30 (Accum)", MetricGroup::Q),
    (MetricType::QScore, "Median QScore", MetricGroup::Q),
    (MetricType::Clusters, "Density", MetricGroup::Tile),
    (MetricType::ClustersPf, "Density PF", MetricGroup::Tile),
    (MetricType::ClusterCount, "Clusters", MetricGroup::Tile),
    (MetricType::ClusterCountPf, "Clusters PF", MetricGroup::Tile),
    (MetricType::AlignedReadCount, "Aligned Read Count", MetricGroup::Tile),
    (MetricType::ErrorRate, "Error Rate", MetricGroup::Error),
    (MetricType::PercentPhasing, "% Phasing", MetricGroup::Tile),
    (MetricType::PercentPrephasing, "% Prephasing", MetricGroup::Tile),
    (MetricType::PercentAligned, "% Aligned", MetricGroup::Tile),
    (MetricType::CorrectedIntensity, "Corrected Int", MetricGroup::CorrectedInt),
    (MetricType::CalledIntensity, "Called Int", MetricGroup::CorrectedInt),
    (MetricType::SignalToNoise, "Signal To Noise", MetricGroup::CorrectedInt),
];

impl MetricType {
    /// Every known metric type, in code order
    pub fn all() -> impl Iterator<Item = MetricType> {
        METRIC_TYPE_TABLE.iter().map(|(t, _, _)| *t)
    }

    fn entry(self) -> Option<&'static (MetricType, &'static str, MetricGroup)> {
        METRIC_TYPE_TABLE.iter().find(|(t, _, _)| *t == self)
    }

    /// Display name, e.g. "% >=Q30"
    pub fn name(self) -> &'static str {
        self.entry().map(|(_, name, _)| *name).unwrap_or("!!!!BAD!!!!")
    }

    /// Metric group (file family) that provides this metric type
    pub fn group(self) -> MetricGroup {
        self.entry()
            .map(|(_, _, group)| *group)
            .unwrap_or(MetricGroup::Unknown)
    }

    /// Resolve a metric type by display name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        METRIC_TYPE_TABLE
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(t, _, _)| *t)
            .unwrap_or(MetricType::Unknown)
    }

    /// Numeric code (position in the table)
    pub fn code(self) -> u8 {
        METRIC_TYPE_TABLE
            .iter()
            .position(|(t, _, _)| *t == self)
            .map(|i| i as u8)
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Resolve a metric type by numeric code
    pub fn from_code(code: u8) -> Self {
        METRIC_TYPE_TABLE
            .get(code as usize)
            .map(|(t, _, _)| *t)
            .unwrap_or(MetricType::Unknown)
    }

    /// True for metric types reported once per channel
    pub fn is_channel_metric(self) -> bool {
        matches!(self, MetricType::Intensity | MetricType::Fwhm)
    }

    /// True for metric types reported once per base
    pub fn is_base_metric(self) -> bool {
        matches!(
            self,
            MetricType::PercentBase | MetricType::CorrectedIntensity | MetricType::CalledIntensity
        )
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DNA bases in the order used by base-indexed record arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnaBase {
    /// No call
    NoCall,
    /// Adenine
    A,
    /// Cytosine
    C,
    /// Guanine
    G,
    /// Thymine
    T,
    /// Sentinel for an unrecognised base
    Unknown,
}

/// Number of called bases (A, C, G, T)
pub const NUM_OF_BASES: usize = 4;

/// Number of bases including the no-call slot
pub const NUM_OF_BASES_AND_NC: usize = 5;

const DNA_BASE_TABLE: &[(DnaBase, &str, i8)] = &[
    (DnaBase::NoCall, "NC", -1),
    (DnaBase::A, "A", 0),
    (DnaBase::C, "C", 1),
    (DnaBase::G, "G", 2),
    (DnaBase::T, "T", 3),
];

impl DnaBase {
    /// The four called bases in array order
    pub const CALLED: [DnaBase; NUM_OF_BASES] = [DnaBase::A, DnaBase::C, DnaBase::G, DnaBase::T];

    /// Base letter, "?" for the sentinel
    pub fn name(self) -> &'static str {
        DNA_BASE_TABLE
            .iter()
            .find(|(b, _, _)| *b == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("?")
    }

    /// Code used by base-indexed arrays: -1 for no call, 0..=3 for A, C, G, T, `i8::MIN` otherwise
    pub fn code(self) -> i8 {
        DNA_BASE_TABLE
            .iter()
            .find(|(b, _, _)| *b == self)
            .map(|(_, _, code)| *code)
            .unwrap_or(i8::MIN)
    }

    /// Resolve a base by array code
    pub fn from_code(code: i8) -> Self {
        DNA_BASE_TABLE
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(b, _, _)| *b)
            .unwrap_or(DnaBase::Unknown)
    }

    /// Resolve a base by letter
    pub fn from_name(name: &str) -> Self {
        DNA_BASE_TABLE
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(b, _, _)| *b)
            .unwrap_or(DnaBase::Unknown)
    }
}

impl fmt::Display for DnaBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flow cell surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Top surface
    Top,
    /// Bottom surface
    Bottom,
    /// Sentinel for an unrecognised surface
    Unknown,
}

impl SurfaceType {
    /// Surface number as used in tile ids (1 = top, 2 = bottom)
    pub fn code(self) -> u8 {
        match self {
            SurfaceType::Top => 1,
            SurfaceType::Bottom => 2,
            SurfaceType::Unknown => UNKNOWN_CODE,
        }
    }

    /// Resolve a surface by number
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => SurfaceType::Top,
            2 => SurfaceType::Bottom,
            _ => SurfaceType::Unknown,
        }
    }

    /// Surface encoded in a four-digit tile number (e.g. 1114 is on the top surface)
    pub fn from_tile(tile: u32) -> Self {
        Self::from_code((tile / 1000) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_type_name_round_trip() {
        for metric_type in MetricType::all() {
            assert_eq!(MetricType::from_name(metric_type.name()), metric_type);
            assert_eq!(MetricType::from_code(metric_type.code()), metric_type);
            assert_ne!(metric_type.group(), MetricGroup::Unknown);
        }
    }

    #[test]
    fn test_metric_type_unknown() {
        assert_eq!(MetricType::from_name("Not a metric"), MetricType::Unknown);
        assert_eq!(MetricType::Unknown.code(), UNKNOWN_CODE);
        assert_eq!(MetricType::from_code(UNKNOWN_CODE), MetricType::Unknown);
        assert_eq!(MetricType::Unknown.group(), MetricGroup::Unknown);
        assert_eq!(MetricType::Unknown.name(), "!!!!BAD!!!!");
    }

    #[test]
    fn test_metric_type_groups() {
        assert_eq!(MetricType::Intensity.group(), MetricGroup::Extraction);
        assert_eq!(MetricType::PercentQ30.group(), MetricGroup::Q);
        assert_eq!(MetricType::ErrorRate.group(), MetricGroup::Error);
        assert_eq!(MetricType::ClusterCountPf.group(), MetricGroup::Tile);
        assert_eq!(MetricType::AlignedReadCount.group(), MetricGroup::Tile);
        assert_eq!(MetricType::from_name("Aligned Read Count"), MetricType::AlignedReadCount);
        assert_eq!(MetricType::AlignedReadCount.code(), MetricType::ClusterCountPf.code() + 1);
        assert_eq!(MetricType::from_name("% >=q30"), MetricType::PercentQ30);
    }

    #[test]
    fn test_metric_group_round_trip() {
        for (group, name) in METRIC_GROUP_TABLE {
            assert_eq!(MetricGroup::from_name(name), *group);
            assert_eq!(MetricGroup::from_code(group.code()), *group);
        }
        assert_eq!(MetricGroup::from_name("bogus"), MetricGroup::Unknown);
        assert_eq!(MetricGroup::Unknown.code(), UNKNOWN_CODE);
    }

    #[test]
    fn test_dna_base_codes() {
        assert_eq!(DnaBase::NoCall.code(), -1);
        assert_eq!(DnaBase::from_code(3), DnaBase::T);
        assert_eq!(DnaBase::from_code(9), DnaBase::Unknown);
        for base in DnaBase::CALLED {
            assert_eq!(DnaBase::from_name(base.name()), base);
        }
    }

    #[test]
    fn test_surface_from_tile() {
        assert_eq!(SurfaceType::from_tile(1114), SurfaceType::Top);
        assert_eq!(SurfaceType::from_tile(2216), SurfaceType::Bottom);
        assert_eq!(SurfaceType::from_tile(12), SurfaceType::Unknown);
    }
}
