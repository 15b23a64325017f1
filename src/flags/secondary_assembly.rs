// src/flags/secondary_assembly.rs

use crate::error::Result;
use crate::tables::parse_read_counts;
use crate::types::{Sample, SecondaryComposition};

/// Directory IRMA creates when secondary data was large enough to assemble.
pub const SECONDARY_ASSEMBLY_DIR: &str = "secondary_assembly";

/// Flag 5 together with the breakdown of the sample's secondary data.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAssembly {
    pub raised: bool,
    pub composition: SecondaryComposition,
}

/// Flag 5: raised when a `secondary_assembly` directory exists. The secondary
/// composition is summarized either way.
pub fn secondary_assembly(sample: &Sample) -> Result<SecondaryAssembly> {
    let dir = sample.path.join(SECONDARY_ASSEMBLY_DIR);
    let raised = dir.is_dir();
    if raised {
        log::info!("{}: a secondary assembly was made", sample.name);
    }

    Ok(SecondaryAssembly {
        raised,
        composition: summarize_secondary(sample)?,
    })
}

/// Pattern counts of secondary data (group 5), split into subtypes of the
/// primary genus and segments of other genera.
pub fn summarize_secondary(sample: &Sample) -> Result<SecondaryComposition> {
    let records = parse_read_counts(&sample.read_counts_path())?;
    let mut composition = SecondaryComposition::default();

    for record in records.iter().filter(|r| r.is_secondary()) {
        if record.genus == sample.genus {
            // "A_HA_H1" -> "H1", "A_MP" -> "MP"
            let subtype = record
                .segment
                .rsplit('_')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(record.genus.as_str());
            composition.set_subtype(subtype, record.pattern_count);
        } else {
            let segment = record.segment.split('_').next().unwrap_or_default();
            composition.set_genus_segment(&record.genus, segment, record.pattern_count);
        }
    }
    Ok(composition)
}
