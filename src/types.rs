// src/types.rs

use ahash::AHashMap;
use std::path::{Path, PathBuf};

/// Name of the per-sample report written inside every sample folder.
pub const SAMPLE_REPORT_SUFFIX: &str = "_contaminationReport.txt";

/// One IRMA output folder, classified by its primary data.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub path: PathBuf,
    /// Primary influenza genus, e.g. "A"
    pub genus: String,
    /// HA subtype + NA subtype, e.g. "H3N2"
    pub subtype: String,
    /// `[PB2, PB1, PA, HA_xx, NP, NA_xx, MP, NS]`
    pub segments: Vec<String>,
    pub known_subtype: bool,
}

impl Sample {
    pub fn tables_dir(&self) -> PathBuf {
        self.path.join("tables")
    }

    pub fn read_counts_path(&self) -> PathBuf {
        read_counts_path(&self.path)
    }

    /// `tables/<genus>_<segment>-variants.txt`
    pub fn variant_table_path(&self, segment: &str) -> PathBuf {
        self.tables_dir()
            .join(format!("{}_{}-variants.txt", self.genus, segment))
    }

    pub fn report_path(&self) -> PathBuf {
        sample_report_path(&self.path, &self.name)
    }
}

/// `<sample>/<name>_contaminationReport.txt`
pub fn sample_report_path(sample_path: &Path, name: &str) -> PathBuf {
    sample_path.join(format!("{name}{SAMPLE_REPORT_SUFFIX}"))
}

pub fn read_counts_path(sample_path: &Path) -> PathBuf {
    sample_path.join("tables").join("READ_COUNTS.txt")
}

/// One row of `READ_COUNTS.txt`, e.g. `4-A_HA_H3  <reads>  <patterns> ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ReadCountRecord {
    /// "4" for primary data, "5" for secondary data
    pub data_group: String,
    pub genus: String,
    /// Everything after the genus, e.g. "HA_H3" or "NS"
    pub segment: String,
    pub pattern_count: u64,
}

impl ReadCountRecord {
    pub fn is_primary(&self) -> bool {
        self.data_group == "4"
    }

    pub fn is_secondary(&self) -> bool {
        self.data_group == "5"
    }
}

/// One row of a `<genus>_<segment>-variants.txt` table. Columns other than
/// the minority frequency are `None` when absent or unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub reference_name: String,
    pub position: Option<u32>,
    pub depth: Option<u32>,
    pub consensus_base: Option<char>,
    pub minority_base: Option<char>,
    pub count: Option<u32>,
    pub frequency: f64,
    pub quality: Option<f64>,
}

/// Working state for one segment, filled in by flags 1 to 3.
#[derive(Debug, Clone, Default)]
pub struct SegmentFlagState {
    pub variant_count: usize,
    pub frequencies: Vec<f64>,
    pub high_freq_count: usize,
    pub proportion: Option<f64>,
}

/// Rounds to two decimals; exact halves go to the even neighbour (`0.125` -> `0.12`).
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // exact remainder of the multiplication, so 0.015 (just below) stays below the half
    let residual = value.mul_add(100.0, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    rounded / 100.0
}

/// Per-segment state of one sample, keyed by segment name.
pub type SegmentStates = AHashMap<String, SegmentFlagState>;

/// The five flags of a sample, in evaluation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagVector {
    pub flags: [bool; 5],
}

impl FlagVector {
    pub fn raised_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// A sample is flagged once at least `max_flags` flags are raised.
    pub fn is_flagged(&self, max_flags: usize) -> bool {
        self.raised_count() >= max_flags
    }
}

/// One row of the aggregate contamination report.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub sample: String,
    pub flags: FlagVector,
    pub flagged: bool,
}

/// Pattern counts found in secondary data, in the order they first appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryComposition {
    /// Secondary data of the primary genus, keyed by subtype/segment suffix
    pub subtypes: Vec<(String, u64)>,
    /// Other genera, each with its segments
    pub genera: Vec<(String, Vec<(String, u64)>)>,
}

impl SecondaryComposition {
    pub fn set_subtype(&mut self, subtype: &str, count: u64) {
        upsert(&mut self.subtypes, subtype, count);
    }

    pub fn set_genus_segment(&mut self, genus: &str, segment: &str, count: u64) {
        match self.genera.iter_mut().find(|(g, _)| g == genus) {
            Some((_, segments)) => upsert(segments, segment, count),
            None => self
                .genera
                .push((genus.to_string(), vec![(segment.to_string(), count)])),
        }
    }
}

// Later rows overwrite earlier ones but keep their first-seen position
fn upsert(entries: &mut Vec<(String, u64)>, key: &str, count: u64) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = count,
        None => entries.push((key.to_string(), count)),
    }
}
