// src/config.rs

/// Reference length (in bases) of every influenza A segment the analysis knows about.
/// HA and NA are listed per subtype since the segment names carry the subtype.
pub const SEGMENT_LENGTHS: &[(&str, u32)] = &[
    ("PB2", 2341),
    ("PB1", 2341),
    ("PA", 2233),
    ("HA_H3", 1778),
    ("HA_H1", 1778),
    ("NP", 1565),
    ("NA_N2", 1413),
    ("NA_N1", 1413),
    ("MP", 1027),
    ("NS", 890),
];

/// Subtypes we expect to see in primary data. Anything else only raises a warning.
pub const KNOWN_SUBTYPES: &[&str] = &["H1N1", "H3N2", "H1N2"];

/// Thresholds and lookup tables used by the five flag evaluators.
///
/// One instance is built at startup and shared by reference with every sample.
#[derive(Debug, Clone)]
pub struct ContaminationConfig {
    /// Fraction of a segment's length allowed to carry minority variants (flag 1).
    pub max_variant_percentage: f64,
    /// Variants above this frequency count as high frequency (flag 2).
    pub max_freq: f64,
    /// Max proportion of high frequency variants out of all variants (flag 3).
    pub max_freq_prop: f64,
    /// Max size of secondary data relative to primary data (flag 4).
    pub max_secondary_size: f64,
    /// Number of raised flags at which a sample is reported as flagged.
    pub max_flags: usize,
    pub segment_lengths: Vec<(String, u32)>,
    pub known_subtypes: Vec<String>,
}

impl Default for ContaminationConfig {
    fn default() -> Self {
        Self {
            max_variant_percentage: 0.0028,
            max_freq: 0.02,
            max_freq_prop: 0.10,
            max_secondary_size: 0.10,
            max_flags: 2,
            segment_lengths: SEGMENT_LENGTHS
                .iter()
                .map(|(name, len)| (name.to_string(), *len))
                .collect(),
            known_subtypes: KNOWN_SUBTYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ContaminationConfig {
    /// Reference length of `segment`, if the segment is in the table.
    pub fn segment_length(&self, segment: &str) -> Option<u32> {
        self.segment_lengths
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, len)| *len)
    }

    /// How many minority variants `segment` may carry before it is flagged:
    /// `floor(reference_length * max_variant_percentage)`.
    pub fn max_variant_count(&self, segment: &str) -> Option<usize> {
        self.segment_length(segment)
            .map(|len| (f64::from(len) * self.max_variant_percentage).floor() as usize)
    }

    pub fn is_known_subtype(&self, subtype: &str) -> bool {
        self.known_subtypes.iter().any(|s| s == subtype)
    }
}
