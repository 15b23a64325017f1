// src/flags/mod.rs

pub mod variant_count;
pub mod variant_frequency;
pub mod frequency_proportion;
pub mod secondary_size;
pub mod secondary_assembly;

pub use variant_count::count_variants;
pub use variant_frequency::check_frequencies;
pub use frequency_proportion::check_proportions;
pub use secondary_size::{secondary_size, SecondarySize};
pub use secondary_assembly::{secondary_assembly, summarize_secondary, SecondaryAssembly};

/// Outcome of one of the segment-level flags (1 to 3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentFlagOutcome {
    pub raised: bool,
    /// Segments that triggered the flag, in canonical segment order
    pub segments: Vec<String>,
}

impl SegmentFlagOutcome {
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self {
            raised: !segments.is_empty(),
            segments,
        }
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }
}
