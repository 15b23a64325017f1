// src/tables.rs

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ContaminationError, Result};
use crate::types::{ReadCountRecord, VariantRecord};

/// First token of the header line of every IRMA variant table.
pub const VARIANT_HEADER: &str = "Reference_Name";

/// Finds the file backing a table: `path` itself, or `path.gz` if only the
/// compressed copy is present.
pub fn resolve_table(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let mut gz = path.as_os_str().to_owned();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    gz.is_file().then_some(gz)
}

/// Opens a table for line reading, transparently decompressing `.gz` files.
pub fn open_table(path: &Path) -> Result<Box<dyn BufRead>> {
    let actual = resolve_table(path).unwrap_or_else(|| path.to_path_buf());
    let f = File::open(&actual).map_err(|e| ContaminationError::io(&actual, e))?;

    let is_gz = actual
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Like [`open_table`], but a missing table is `None` instead of an error.
pub fn open_optional_table(path: &Path) -> Result<Option<Box<dyn BufRead>>> {
    match resolve_table(path) {
        Some(actual) => open_table(&actual).map(Some),
        None => Ok(None),
    }
}

/// Parses `tables/READ_COUNTS.txt`, keeping only primary ("4") and
/// secondary ("5") data rows.
///
/// The record key looks like `<group>-<genus>_<segment>[_<subtype>]`:
/// ```text
/// Record      Reads   Patterns  PairsAndWidows
/// 1-initial   250000  250000    250000
/// 4-A_HA_H3   48211   40102     48211
/// 5-B_NA      112     101       112
/// ```
pub fn parse_read_counts(path: &Path) -> Result<Vec<ReadCountRecord>> {
    let reader = open_table(path)?;
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ContaminationError::io(path, e))?;
        let fields: Vec<&str> = line.split('\t').collect();

        // Header, QC rows and anything without a group prefix
        let Some((group, rest)) = fields[0].trim().split_once('-') else {
            continue;
        };
        if group != "4" && group != "5" {
            continue;
        }

        let (genus, segment) = rest.split_once('_').unwrap_or((rest, ""));
        let pattern_count: u64 = parse_field(&fields, 2, "pattern count", path, idx + 1)?;

        records.push(ReadCountRecord {
            data_group: group.to_string(),
            genus: genus.to_string(),
            segment: segment.to_string(),
            pattern_count,
        });
    }
    Ok(records)
}

/// Reads every variant row of `reader`; header rows and blank lines are skipped.
/// `path` is only used for error messages.
pub fn read_variants<R: BufRead>(reader: R, path: &Path) -> Result<Vec<VariantRecord>> {
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ContaminationError::io(path, e))?;
        if line.starts_with(VARIANT_HEADER) || line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        // Only the minority frequency is required; the rest is kept when readable
        records.push(VariantRecord {
            reference_name: fields[0].trim().to_string(),
            position: optional_field(&fields, 1),
            depth: optional_field(&fields, 2),
            consensus_base: optional_base(&fields, 3),
            minority_base: optional_base(&fields, 4),
            count: optional_field(&fields, 6),
            frequency: parse_field(&fields, 8, "frequency", path, line_no)?,
            quality: optional_field(&fields, 10),
        });
    }
    Ok(records)
}

/// Reads a variant table from disk. A missing table yields `None`.
pub fn parse_variants(path: &Path) -> Result<Option<Vec<VariantRecord>>> {
    match open_optional_table(path)? {
        Some(reader) => read_variants(reader, path).map(Some),
        None => Ok(None),
    }
}

fn parse_field<T: FromStr>(
    fields: &[&str],
    idx: usize,
    name: &str,
    path: &Path,
    line: usize,
) -> Result<T> {
    let raw = fields
        .get(idx)
        .ok_or_else(|| ContaminationError::parse(path, line, format!("missing {name} column")))?
        .trim();
    raw.parse().map_err(|_| {
        ContaminationError::parse(path, line, format!("invalid {name} '{raw}'"))
    })
}

fn optional_field<T: FromStr>(fields: &[&str], idx: usize) -> Option<T> {
    fields.get(idx).and_then(|f| f.trim().parse().ok())
}

fn optional_base(fields: &[&str], idx: usize) -> Option<char> {
    fields.get(idx).and_then(|f| f.trim().chars().next())
}
