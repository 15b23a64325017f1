// src/report.rs

use std::fmt::{self, Write as FmtWrite};
use std::fs::{File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::config::ContaminationConfig;
use crate::error::{ContaminationError, Result};
use crate::flags::{SecondaryAssembly, SecondarySize, SegmentFlagOutcome};
use crate::types::{round2, Sample, SampleSummary, SegmentStates};

/// Aggregate report written to the root directory.
pub const AGGREGATE_REPORT: &str = "contaminationReport.txt";

const BANNER: &str = "#####################################";

pub fn aggregate_report_path(root: &Path) -> PathBuf {
    root.join(AGGREGATE_REPORT)
}

/// Creates (or truncates) `path` and writes `text` to it.
pub fn create_with(path: &Path, text: &str) -> Result<()> {
    let mut file = File::create(path).map_err(|e| ContaminationError::io(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| ContaminationError::io(path, e))
}

/// Appends `text` to `path`; the file is opened and closed for this write only.
pub fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| ContaminationError::io(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| ContaminationError::io(path, e))
}

// -----------------------
// Aggregate report
// -----------------------

/// Writes the header of the aggregate report, replacing any previous report.
pub fn init_aggregate_report(root: &Path) -> Result<()> {
    let header = aggregate_line(
        "Sample",
        "Flagged",
        ["(1)Count", "(2)Freq", "(3)Prop", "(4)Reads", "(5)Assembly"],
    );
    create_with(&aggregate_report_path(root), &header)
}

/// One aggregate row: `Sample Flagged | flag1 .. flag5` with `True`/`False` text.
pub fn render_summary_row(summary: &SampleSummary) -> String {
    let f = summary.flags.flags.map(py_bool);
    aggregate_line(&summary.sample, py_bool(summary.flagged), f)
}

pub fn append_summaries(root: &Path, summaries: &[SampleSummary]) -> Result<()> {
    let rows: String = summaries.iter().map(render_summary_row).collect();
    append(&aggregate_report_path(root), &rows)
}

fn aggregate_line(sample: &str, flagged: &str, flags: [&str; 5]) -> String {
    format!(
        "{:<10} {:<10} {:^3} {:^10} {:^10} {:^10} {:^10} {:^10}\n",
        sample, flagged, "|", flags[0], flags[1], flags[2], flags[3], flags[4]
    )
}

fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

// -----------------------
// Per-sample report sections
// -----------------------

fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    write(&mut out).unwrap();
    out
}

/// Primary genus and subtype, with a warning for unexpected subtypes.
pub fn render_primary_header(sample: &Sample) -> String {
    render(|out| {
        writeln!(out, "Primary data is influenza {} ({})", sample.genus, sample.subtype)?;
        if !sample.known_subtype {
            writeln!(out, "Warning: {} is an unknown subtype!", sample.subtype)?;
        }
        writeln!(out)
    })
}

/// Minority variant table: segment names (`*` on flagged segments), the
/// allowed count per segment and the observed count (`NA` without a table).
pub fn render_variant_counts(
    sample: &Sample,
    config: &ContaminationConfig,
    flag1: &SegmentFlagOutcome,
    states: &SegmentStates,
) -> String {
    render(|out| {
        write_banner(out, "#         Minority Variants         #")?;
        writeln!(out)?;

        write!(out, "{:<16}", "")?;
        for s in &sample.segments {
            if flag1.contains(s) {
                write!(out, "{:<8}", format!("{s}*"))?;
            } else {
                write!(out, "{:<8}", s)?;
            }
        }
        writeln!(out)?;

        write!(out, "{:<3} {:<12}", "", "MaxCount")?;
        for s in &sample.segments {
            match config.max_variant_count(s) {
                Some(max_count) => write!(out, "{:<8}", max_count)?,
                None => write!(out, "{:<8}", "NA")?,
            }
        }
        writeln!(out)?;

        write!(out, "{:<3} {:<12}", "(1)", "Count")?;
        for s in &sample.segments {
            match states.get(s) {
                Some(state) => write!(out, "{:<8}", state.variant_count)?,
                None => write!(out, "{:<8}", "NA")?,
            }
        }
        writeln!(out)
    })
}

/// Number of high frequency variants per segment (flag 2).
pub fn render_frequencies(
    sample: &Sample,
    config: &ContaminationConfig,
    states: &SegmentStates,
) -> String {
    render(|out| {
        writeln!(out)?;
        let label = format!("Freq>{}", py_float(config.max_freq));
        write!(out, "{:<3} {:<12}", "(2)", label)?;
        for s in &sample.segments {
            let high = states.get(s).map(|state| state.high_freq_count).unwrap_or(0);
            write!(out, "{:<8}", high)?;
        }
        writeln!(out)
    })
}

/// Proportion of high frequency variants for the segments flag 3 triggered on.
pub fn render_proportions(
    sample: &Sample,
    flag3: &SegmentFlagOutcome,
    states: &SegmentStates,
) -> String {
    render(|out| {
        write!(out, "{:<3} {:<12}", "(3)", "Proportion")?;
        for s in &sample.segments {
            let proportion = states
                .get(s)
                .and_then(|state| state.proportion)
                .filter(|_| flag3.contains(s));
            match proportion {
                Some(p) => write!(out, "{:<8}", py_float(p))?,
                None => write!(out, "{:<8}", "-")?,
            }
        }
        writeln!(out)
    })
}

/// Size of secondary data relative to primary data (flag 4).
pub fn render_secondary_size(size: &SecondarySize) -> String {
    render(|out| {
        write!(out, "\n\n\n")?;
        write_banner(out, "#        Secondary v. primary       #")?;
        writeln!(out)?;

        match size.ratio {
            Some(ratio) if ratio >= 0.01 => writeln!(
                out,
                "(4) Secondary data is {}% the size of primary data\n",
                py_float(round2(ratio * 100.0))
            )?,
            Some(_) => writeln!(out, "(4) Secondary data is <1% of the size of primary data\n")?,
            None => writeln!(
                out,
                "(4) No primary read patterns found; size of secondary data could not be computed\n"
            )?,
        }

        writeln!(out, "{:<10} {:<20}", "", "TotalReadPatterns")?;
        writeln!(out, "{:<10} {:<20}", "Primary", size.primary_patterns)?;
        write!(out, "{:<10} {:<20}\n\n\n\n", "Secondary", size.secondary_patterns)
    })
}

/// Secondary assembly note (flag 5) followed by the secondary data breakdown.
pub fn render_secondary_assembly(sample: &Sample, assembly: &SecondaryAssembly) -> String {
    render(|out| {
        write_banner(out, "#          Secondary Data           #")?;
        writeln!(out)?;
        if assembly.raised {
            writeln!(
                out,
                "(5) A secondary assembly was made! This indicates high amount of secondary data!\n"
            )?;
        } else {
            writeln!(out, "(5) No secondary assembly was made\n")?;
        }

        let composition = &assembly.composition;
        writeln!(out, "-------Subtypes of influenza {}-------", sample.genus)?;
        if composition.subtypes.is_empty() {
            writeln!(out, "None\n")?;
        } else {
            writeln!(out)?;
            writeln!(out, "{:<8} {:<8}", "Segment", "PatternCount")?;
            for (subtype, count) in &composition.subtypes {
                writeln!(out, "{:<8} {:<8}", subtype, count)?;
            }
            writeln!(out, "\n")?;
        }

        writeln!(out, "-----------Secondary genera----------\n")?;
        if composition.genera.is_empty() {
            writeln!(out, "None\n")
        } else {
            for (genus, segments) in &composition.genera {
                writeln!(out, "{:<8} {:<8} {:<8}", "Genus", "Segment", "ReadCount")?;
                for (segment, count) in segments {
                    writeln!(out, "{:<8} {:<8} {:<8}", genus, segment, count)?;
                }
            }
            writeln!(out)
        }
    })
}

fn write_banner(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{BANNER}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{BANNER}")
}

/// Formats a float the way the reports always have: `0.25`, `15.0`.
fn py_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlagVector, SecondaryComposition, SegmentFlagState};

    fn sample(known: bool) -> Sample {
        Sample {
            name: "S01".to_string(),
            path: PathBuf::from("/run/S01"),
            genus: "A".to_string(),
            subtype: if known { "H3N2" } else { "H5N2" }.to_string(),
            segments: ["PB2", "PB1", "PA", "HA_H3", "NP", "NA_N2", "MP", "NS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            known_subtype: known,
        }
    }

    #[test]
    fn test_summary_row_layout() {
        let row = render_summary_row(&SampleSummary {
            sample: "S01".to_string(),
            flags: FlagVector { flags: [true, false, false, true, false] },
            flagged: true,
        });
        assert_eq!(
            row,
            "S01        True        |     True      False      False       True      False   \n"
        );
    }

    #[test]
    fn test_primary_header_warns_on_unknown_subtype() {
        assert_eq!(
            render_primary_header(&sample(true)),
            "Primary data is influenza A (H3N2)\n\n"
        );
        assert!(render_primary_header(&sample(false))
            .contains("Warning: H5N2 is an unknown subtype!"));
    }

    #[test]
    fn test_variant_count_table() {
        let mut states = SegmentStates::default();
        states.insert("NS".to_string(), SegmentFlagState { variant_count: 3, ..Default::default() });
        states.insert("MP".to_string(), SegmentFlagState { variant_count: 1, ..Default::default() });
        let flag1 = SegmentFlagOutcome::from_segments(vec!["NS".to_string()]);

        let text = render_variant_counts(&sample(true), &ContaminationConfig::default(), &flag1, &states);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "#         Minority Variants         #");
        assert!(lines[5].starts_with("                PB2     PB1     PA      HA_H3   NP      NA_N2   MP      NS*"));
        assert_eq!(lines[6], "    MaxCount    6       6       6       4       4       3       2       2       ");
        assert_eq!(lines[7], "(1) Count       NA      NA      NA      NA      NA      NA      1       3       ");
    }

    #[test]
    fn test_frequency_and_proportion_rows() {
        let mut states = SegmentStates::default();
        states.insert(
            "NS".to_string(),
            SegmentFlagState {
                variant_count: 12,
                frequencies: vec![0.01; 12],
                high_freq_count: 3,
                proportion: Some(0.25),
            },
        );
        let s = sample(true);
        let freq = render_frequencies(&s, &ContaminationConfig::default(), &states);
        assert_eq!(freq, "\n(2) Freq>0.02   0       0       0       0       0       0       0       3       \n");

        let flag3 = SegmentFlagOutcome::from_segments(vec!["NS".to_string()]);
        let prop = render_proportions(&s, &flag3, &states);
        assert_eq!(prop, "(3) Proportion  -       -       -       -       -       -       -       0.25    \n");

        let prop = render_proportions(&s, &SegmentFlagOutcome::default(), &states);
        assert!(!prop.contains("0.25"));
    }

    #[test]
    fn test_secondary_size_text() {
        let text = render_secondary_size(&SecondarySize {
            primary_patterns: 1000,
            secondary_patterns: 150,
            ratio: Some(0.15),
            raised: true,
        });
        assert!(text.contains("(4) Secondary data is 15.0% the size of primary data\n"));
        assert!(text.contains("Primary    1000"));

        let small = render_secondary_size(&SecondarySize {
            primary_patterns: 1000,
            secondary_patterns: 5,
            ratio: Some(0.005),
            raised: false,
        });
        assert!(small.contains("<1% of the size of primary data"));

        // 5/32 -> 15.625% rounds half to even
        let half = render_secondary_size(&SecondarySize {
            primary_patterns: 3200,
            secondary_patterns: 500,
            ratio: Some(0.15625),
            raised: true,
        });
        assert!(half.contains("(4) Secondary data is 15.62% the size of primary data\n"));
    }

    #[test]
    fn test_secondary_assembly_text() {
        let mut composition = SecondaryComposition::default();
        composition.set_subtype("H1", 6);
        let text = render_secondary_assembly(
            &sample(true),
            &SecondaryAssembly { raised: false, composition },
        );
        assert!(text.contains("(5) No secondary assembly was made"));
        assert!(text.contains("-------Subtypes of influenza A-------\n\nSegment  PatternCount\nH1       6       \n"));
        assert!(text.contains("-----------Secondary genera----------\n\nNone\n"));
    }

    #[test]
    fn test_aggregate_report_files() {
        let dir = tempfile::tempdir().unwrap();
        init_aggregate_report(dir.path()).unwrap();
        append_summaries(
            dir.path(),
            &[SampleSummary {
                sample: "S01".to_string(),
                flags: FlagVector::default(),
                flagged: false,
            }],
        )
        .unwrap();
        let text = std::fs::read_to_string(aggregate_report_path(dir.path())).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Sample     Flagged     |   (1)Count"));
        assert!(lines[1].starts_with("S01        False"));
    }
}
