// src/flags/variant_count.rs

use crate::config::ContaminationConfig;
use crate::error::Result;
use crate::tables::parse_variants;
use crate::types::{Sample, SegmentStates};
use super::SegmentFlagOutcome;

/// Flag 1: counts the minority variants of every segment and flags segments
/// carrying more than `floor(reference_length * max_variant_percentage)`.
///
/// Segments without a variant table are left out of `states`.
pub fn count_variants(
    sample: &Sample,
    config: &ContaminationConfig,
    states: &mut SegmentStates,
) -> Result<SegmentFlagOutcome> {
    let mut flagged = Vec::new();

    for segment in &sample.segments {
        let path = sample.variant_table_path(segment);
        let Some(records) = parse_variants(&path)? else {
            log::debug!("{}: no variant table for {segment}", sample.name);
            continue;
        };

        let count = records.len();
        states.entry(segment.clone()).or_default().variant_count = count;

        match config.max_variant_count(segment) {
            Some(max_count) if count > max_count => {
                log::info!("{}: {segment} has {count} minority variants (max {max_count})", sample.name);
                flagged.push(segment.clone());
            }
            Some(_) => {}
            None => log::warn!("{}: no reference length for {segment}; not checked", sample.name),
        }
    }

    Ok(SegmentFlagOutcome::from_segments(flagged))
}
