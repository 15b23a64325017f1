// src/flags/frequency_proportion.rs

use crate::config::ContaminationConfig;
use crate::types::{round2, SegmentStates};
use super::SegmentFlagOutcome;

/// Flag 3: proportion of high frequency variants among all variants, rounded
/// to two decimals, for the segments flag 2 triggered on.
///
/// Segments outside the flag 2 set are never evaluated.
pub fn check_proportions(
    config: &ContaminationConfig,
    flagged_for_freq: &SegmentFlagOutcome,
    states: &mut SegmentStates,
) -> SegmentFlagOutcome {
    let mut flagged = Vec::new();

    for segment in &flagged_for_freq.segments {
        let Some(state) = states.get_mut(segment) else {
            continue;
        };
        let total = state.frequencies.len();
        if total == 0 {
            continue;
        }

        let proportion = round2(state.high_freq_count as f64 / total as f64);
        state.proportion = Some(proportion);

        if proportion > config.max_freq_prop {
            log::info!("{segment}: {proportion} of variants are high frequency");
            flagged.push(segment.clone());
        }
    }

    SegmentFlagOutcome::from_segments(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentFlagState;

    fn state(high: usize, total: usize) -> SegmentFlagState {
        SegmentFlagState {
            variant_count: total,
            frequencies: (0..total).map(|i| if i < high { 0.5 } else { 0.01 }).collect(),
            high_freq_count: high,
            proportion: None,
        }
    }

    #[test]
    fn test_proportion_rounded_and_flagged() {
        let mut states = SegmentStates::default();
        states.insert("NS".to_string(), state(3, 12));
        states.insert("MP".to_string(), state(1, 12));
        let flag2 = SegmentFlagOutcome::from_segments(vec!["NS".to_string(), "MP".to_string()]);

        let flag3 = check_proportions(&ContaminationConfig::default(), &flag2, &mut states);

        assert!(flag3.raised);
        assert_eq!(flag3.segments, vec!["NS"]);
        assert_eq!(states["NS"].proportion, Some(0.25));
        // 1/12 = 0.083 -> 0.08, below 0.10
        assert_eq!(states["MP"].proportion, Some(0.08));
    }

    #[test]
    fn test_segments_outside_flag2_are_skipped() {
        let mut states = SegmentStates::default();
        states.insert("PB2".to_string(), state(5, 6));
        let flag3 = check_proportions(
            &ContaminationConfig::default(),
            &SegmentFlagOutcome::default(),
            &mut states,
        );
        assert!(!flag3.raised);
        assert_eq!(states["PB2"].proportion, None);
    }

    #[test]
    fn test_one_in_eight_rounds_down_to_threshold() {
        // 1/8 = 0.125 rounds to 0.12, which does not exceed 0.12
        let mut states = SegmentStates::default();
        states.insert("MP".to_string(), state(1, 8));
        let flag2 = SegmentFlagOutcome::from_segments(vec!["MP".to_string()]);
        let config = ContaminationConfig {
            max_freq_prop: 0.12,
            ..Default::default()
        };

        let flag3 = check_proportions(&config, &flag2, &mut states);

        assert_eq!(states["MP"].proportion, Some(0.12));
        assert!(!flag3.raised);
    }
}
