// src/flags/secondary_size.rs

use crate::config::ContaminationConfig;
use crate::error::Result;
use crate::tables::parse_read_counts;
use crate::types::Sample;

/// Flag 4: total read patterns in primary and secondary data.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondarySize {
    pub primary_patterns: u64,
    pub secondary_patterns: u64,
    /// `secondary / primary`; `None` when there are no primary patterns
    pub ratio: Option<f64>,
    pub raised: bool,
}

/// Sums pattern counts of data groups 4 and 5 and raises the flag when
/// secondary data is more than `max_secondary_size` of primary data.
pub fn secondary_size(sample: &Sample, config: &ContaminationConfig) -> Result<SecondarySize> {
    let records = parse_read_counts(&sample.read_counts_path())?;

    let primary_patterns: u64 = records
        .iter()
        .filter(|r| r.is_primary())
        .map(|r| r.pattern_count)
        .sum();
    let secondary_patterns: u64 = records
        .iter()
        .filter(|r| r.is_secondary())
        .map(|r| r.pattern_count)
        .sum();

    let ratio = if primary_patterns == 0 {
        log::warn!("{}: no primary read patterns; secondary size not computed", sample.name);
        None
    } else {
        Some(secondary_patterns as f64 / primary_patterns as f64)
    };
    let raised = ratio.is_some_and(|size| size > config.max_secondary_size);

    Ok(SecondarySize {
        primary_patterns,
        secondary_patterns,
        ratio,
        raised,
    })
}
