// src/flags/variant_frequency.rs

use crate::config::ContaminationConfig;
use crate::error::Result;
use crate::tables::parse_variants;
use crate::types::{Sample, SegmentStates};
use super::SegmentFlagOutcome;

/// Flag 2: collects the frequency of every variant in every segment that has
/// variant data and counts those above `max_freq`.
///
/// A segment triggers only if flag 1 already flagged it for count and it has at
/// least one high frequency variant. Only run this when flag 1 was raised.
pub fn check_frequencies(
    sample: &Sample,
    config: &ContaminationConfig,
    flagged_for_count: &SegmentFlagOutcome,
    states: &mut SegmentStates,
) -> Result<SegmentFlagOutcome> {
    let mut flagged = Vec::new();

    for segment in &sample.segments {
        let Some(state) = states.get_mut(segment) else {
            continue;
        };
        let path = sample.variant_table_path(segment);
        let Some(records) = parse_variants(&path)? else {
            continue;
        };

        state.frequencies = records.iter().map(|r| r.frequency).collect();
        state.high_freq_count = state
            .frequencies
            .iter()
            .filter(|&&f| f > config.max_freq)
            .count();

        if state.high_freq_count > 0 && flagged_for_count.contains(segment) {
            log::info!(
                "{}: {segment} has {} variants with frequency > {}",
                sample.name,
                state.high_freq_count,
                config.max_freq
            );
            flagged.push(segment.clone());
        }
    }

    Ok(SegmentFlagOutcome::from_segments(flagged))
}
