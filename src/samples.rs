// src/samples.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::config::ContaminationConfig;
use crate::error::{ContaminationError, Result};
use crate::tables::parse_read_counts;
use crate::types::{read_counts_path, Sample};

/// Lists the immediate subdirectories of `root`, sorted by name.
/// Whether a directory is a sample folder is decided later by [`is_sample_folder`].
pub fn discover_samples(root: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| ContaminationError::io(root, e))?;

    let mut dirs: Vec<String> = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.is_dir() {
                Some(path.file_name()?.to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// An IRMA output folder has both a `tables` and a `secondary` directory.
pub fn is_sample_folder(path: &Path) -> bool {
    path.join("tables").exists() && path.join("secondary").exists()
}

/// Finds the primary genus and HA/NA subtypes of a sample from its read counts
/// and builds the canonical segment order.
///
/// Returns an error if primary data holds no genus, more than one genus, or
/// lacks an HA or NA segment.
pub fn classify_primary(path: &Path, name: &str, config: &ContaminationConfig) -> Result<Sample> {
    let records = parse_read_counts(&read_counts_path(path))?;

    let mut genera = BTreeSet::new();
    let mut ha_segment: Option<String> = None;
    let mut na_segment: Option<String> = None;

    for record in records.iter().filter(|r| r.is_primary()) {
        genera.insert(record.genus.clone());
        if record.segment.starts_with("HA") {
            ha_segment = Some(record.segment.clone());
        } else if record.segment.starts_with("NA") {
            na_segment = Some(record.segment.clone());
        }
    }

    if genera.is_empty() {
        return Err(ContaminationError::NoPrimaryGenus {
            sample: name.to_string(),
        });
    }
    if genera.len() > 1 {
        return Err(ContaminationError::MultiplePrimaryGenera {
            sample: name.to_string(),
            genera: genera.into_iter().collect(),
        });
    }
    let genus = genera.into_iter().next().unwrap_or_default();

    let missing = |segment: &str| ContaminationError::MissingPrimarySegment {
        sample: name.to_string(),
        segment: segment.to_string(),
    };
    let ha = ha_segment.ok_or_else(|| missing("HA"))?;
    let na = na_segment.ok_or_else(|| missing("NA"))?;

    let subtype = format!("{}{}", subtype_suffix(&ha), subtype_suffix(&na));
    let known_subtype = config.is_known_subtype(&subtype);
    if !known_subtype {
        log::warn!("{name}: {subtype} is an unknown subtype");
    }

    let segments = ["PB2", "PB1", "PA", ha.as_str(), "NP", na.as_str(), "MP", "NS"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    log::info!("{name}: primary data is influenza {genus} ({subtype})");

    Ok(Sample {
        name: name.to_string(),
        path: path.to_path_buf(),
        genus,
        subtype,
        segments,
        known_subtype,
    })
}

// "HA_H3" -> "H3"
fn subtype_suffix(segment: &str) -> &str {
    segment.split('_').nth(1).unwrap_or("")
}
